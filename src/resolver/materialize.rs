//! Fragment materialization: fetched text to a splice-ready subtree.
//!
//! Turning fragment text into tree content takes three passes over a
//! detached container:
//!
//! 1. parse the text with the document's fragment-parsing primitive;
//! 2. re-create every script element so execution semantics survive the
//!    later attach (markup-parsed scripts do not execute on attach in host
//!    environments, freshly created nodes do);
//! 3. identify the fragment's *top-level* directive elements: those with
//!    no directive-tagged ancestor inside the fragment. Directives nested
//!    inside other directives are left for the recursive pass that
//!    resolves their parent; collecting them here would double-count them.
//!
//! Script re-creation runs before the container's children ever reach the
//! live tree, so only the re-created nodes are attached. Materialization
//! never fails; malformed markup is handled by the parser's own recovery.

use crate::dom::{Document, NodeId, parse_fragment};

/// A detached subtree ready for splicing, plus the directive elements the
/// recursive pass must visit.
#[derive(Debug)]
pub struct Materialized {
    /// Detached container whose children are the fragment's nodes.
    pub container: NodeId,
    /// Directive elements with no directive ancestor within the fragment,
    /// in document order.
    pub nested_directives: Vec<NodeId>,
}

/// Materialize fragment text into a detached container.
pub fn materialize(
    doc: &mut Document,
    content: &str,
    directive_tag: &str,
    script_tag: &str,
) -> Materialized {
    let container = parse_fragment(doc, content);
    reactivate_scripts(doc, container, script_tag);
    let nested_directives = top_level_directives(doc, container, directive_tag);
    Materialized {
        container,
        nested_directives,
    }
}

/// Replace every script element under `container` (at any depth) with a
/// freshly created equivalent: same tag, attributes copied in order, and
/// the inline body copied when non-empty.
pub(crate) fn reactivate_scripts(doc: &mut Document, container: NodeId, script_tag: &str) {
    for original in doc.elements_by_tag(container, script_tag) {
        let Some(parent) = doc.parent(original) else {
            continue;
        };
        let fresh = doc.create_element(script_tag);
        for attr in doc.attrs(original).to_vec() {
            doc.set_attr(fresh, &attr.name, &attr.value);
        }
        let body = doc.text_content(original);
        if !body.is_empty() {
            let text = doc.create_text(&body);
            doc.append_child(fresh, text);
        }
        doc.insert_before(parent, fresh, original);
        doc.remove(original);
    }
}

/// The fragment's top-level directive set: directive elements under
/// `scope` with no directive-tagged ancestor strictly between themselves
/// and `scope`.
pub(crate) fn top_level_directives(
    doc: &Document,
    scope: NodeId,
    directive_tag: &str,
) -> Vec<NodeId> {
    doc.elements_by_tag(scope, directive_tag)
        .into_iter()
        .filter(|&node| !has_directive_ancestor_within(doc, node, scope, directive_tag))
        .collect()
}

fn has_directive_ancestor_within(
    doc: &Document,
    node: NodeId,
    scope: NodeId,
    directive_tag: &str,
) -> bool {
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        if ancestor == scope {
            return false;
        }
        if doc.is_element(ancestor, directive_tag) {
            return true;
        }
        current = doc.parent(ancestor);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_DIRECTIVE_TAG, DEFAULT_SCRIPT_TAG};
    use crate::dom::Document;

    fn materialize_default(doc: &mut Document, content: &str) -> Materialized {
        materialize(doc, content, DEFAULT_DIRECTIVE_TAG, DEFAULT_SCRIPT_TAG)
    }

    #[test]
    fn plain_fragment_has_no_nested_directives() {
        let mut doc = Document::new();
        let result = materialize_default(&mut doc, "<p>X</p><span>Y</span>");
        assert!(result.nested_directives.is_empty());
        assert_eq!(doc.inner_html(result.container), "<p>X</p><span>Y</span>");
    }

    #[test]
    fn directly_nested_directives_are_collected_in_order() {
        let mut doc = Document::new();
        let result = materialize_default(
            &mut doc,
            r#"<include src="a.html"></include><div><include src="b.html"></div>"#,
        );
        assert_eq!(result.nested_directives.len(), 2);
        let srcs: Vec<_> = result
            .nested_directives
            .iter()
            .map(|&node| doc.attr(node, "src").unwrap().to_string())
            .collect();
        assert_eq!(srcs, ["a.html", "b.html"]);
    }

    #[test]
    fn directive_inside_directive_is_excluded() {
        let mut doc = Document::new();
        let result = materialize_default(
            &mut doc,
            r#"<include src="outer.html"><include src="inner.html"></include></include>"#,
        );
        assert_eq!(result.nested_directives.len(), 1);
        let outer = result.nested_directives[0];
        assert_eq!(doc.attr(outer, "src"), Some("outer.html"));
    }

    #[test]
    fn directive_two_levels_deep_inside_directive_is_excluded() {
        let mut doc = Document::new();
        let result = materialize_default(
            &mut doc,
            r#"<include src="outer.html"><div><include src="deep.html"></div></include>"#,
        );
        assert_eq!(result.nested_directives.len(), 1);
        assert_eq!(
            doc.attr(result.nested_directives[0], "src"),
            Some("outer.html")
        );
    }

    #[test]
    fn scripts_are_recreated_as_fresh_nodes() {
        let mut doc = Document::new();
        let container = parse_fragment(&mut doc, "<script type=\"module\">console.log(1)</script>");
        let original = doc.elements_by_tag(container, "script")[0];

        reactivate_scripts(&mut doc, container, DEFAULT_SCRIPT_TAG);

        let replaced = doc.elements_by_tag(container, "script")[0];
        assert_ne!(replaced, original, "script must be a fresh node");
        assert!(!doc.is_attached(original));
        assert_eq!(doc.attr(replaced, "type"), Some("module"));
        assert_eq!(doc.text_content(replaced), "console.log(1)");
    }

    #[test]
    fn external_script_without_body_gets_no_text_child() {
        let mut doc = Document::new();
        let result = materialize_default(&mut doc, r#"<script src="app.js"></script>"#);
        let script = doc.elements_by_tag(result.container, "script")[0];
        assert_eq!(doc.attr(script, "src"), Some("app.js"));
        assert!(doc.children(script).is_empty());
    }

    #[test]
    fn scripts_nested_below_elements_are_also_recreated() {
        let mut doc = Document::new();
        let container = parse_fragment(&mut doc, "<div><section><script>a()</script></section></div>");
        let original = doc.elements_by_tag(container, "script")[0];
        reactivate_scripts(&mut doc, container, DEFAULT_SCRIPT_TAG);
        let replaced = doc.elements_by_tag(container, "script")[0];
        assert_ne!(replaced, original);
        assert_eq!(doc.text_content(replaced), "a()");
    }

    #[test]
    fn script_keeps_position_among_siblings() {
        let mut doc = Document::new();
        let result = materialize_default(&mut doc, "<p>a</p><script>s()</script><p>b</p>");
        assert_eq!(
            doc.inner_html(result.container),
            "<p>a</p><script>s()</script><p>b</p>"
        );
    }

    #[test]
    fn empty_content_materializes_to_empty_container() {
        let mut doc = Document::new();
        let result = materialize_default(&mut doc, "");
        assert!(doc.children(result.container).is_empty());
        assert!(result.nested_directives.is_empty());
    }
}
