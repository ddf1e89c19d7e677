//! Forgiving HTML fragment parsing and serialization.
//!
//! This is the document tree's fragment-parsing primitive: a single-pass
//! tokenizer and tree builder tuned for fragment content rather than whole
//! pages. It follows the recovery behavior hosts provide for `innerHTML`
//! parsing:
//!
//! - unclosed elements are closed at end of input
//! - a mismatched end tag closes up to the nearest matching open element,
//!   or is ignored when nothing matches
//! - script and style bodies are raw text, terminated only by their own
//!   end tag
//! - void elements (`br`, `img`, ...) never take children
//! - malformed markup never produces an error, only a best-effort tree
//!
//! There is deliberately no doctype handling, no quirks-mode machinery,
//! and no foster parenting; fragments are parsed in a generic container
//! context.

use super::node::{Attribute, Document, NodeId, NodeKind};

/// Elements that never have children or an end tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

pub(crate) fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub(crate) fn is_raw_text_tag(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(&tag)
}

/// Parse `input` as a standalone document. The parsed nodes become
/// children of the document root.
#[must_use]
pub fn parse_document(input: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, input);
    doc
}

/// Parse `input` into a detached container element and return it.
///
/// The container itself never appears in a live tree; the splice engine
/// moves its children out and discards it.
pub fn parse_fragment(doc: &mut Document, input: &str) -> NodeId {
    let container = doc.create_fragment_container();
    parse_into(doc, container, input);
    container
}

/// Parse `input` and append the resulting nodes as children of `scope`.
pub fn parse_into(doc: &mut Document, scope: NodeId, input: &str) {
    FragmentParser {
        doc,
        input,
        pos: 0,
        stack: vec![scope],
    }
    .run();
}

struct FragmentParser<'a> {
    doc: &'a mut Document,
    input: &'a str,
    pos: usize,
    /// Open element stack; index 0 is the parse scope and is never popped.
    stack: Vec<NodeId>,
}

impl<'a> FragmentParser<'a> {
    fn run(mut self) {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if rest.starts_with("<!--") {
                self.parse_comment();
            } else if rest.starts_with("</") {
                self.parse_end_tag();
            } else if rest.starts_with('<') && starts_tag_name(&rest[1..]) {
                self.parse_start_tag();
            } else if rest.starts_with("<!") {
                self.skip_markup_declaration();
            } else {
                self.parse_text();
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current_parent(&self) -> NodeId {
        *self.stack.last().expect("parse scope is never popped")
    }

    fn parse_comment(&mut self) {
        let body_start = self.pos + "<!--".len();
        let rest = &self.input[body_start..];
        let (body, consumed) = match rest.find("-->") {
            Some(end) => (&rest[..end], end + "-->".len()),
            None => (rest, rest.len()),
        };
        let comment = self.doc.create_comment(body);
        let parent = self.current_parent();
        self.doc.append_child(parent, comment);
        self.pos = body_start + consumed;
    }

    fn skip_markup_declaration(&mut self) {
        match self.rest().find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn parse_text(&mut self) {
        let rest = self.rest();
        let mut end = rest.len();
        let mut search_from = 0;
        while let Some(lt) = rest[search_from..].find('<') {
            let at = search_from + lt;
            let after = &rest[at + 1..];
            if starts_tag_name(after) || after.starts_with('/') || after.starts_with('!') {
                end = at;
                break;
            }
            search_from = at + 1;
        }
        let raw = &rest[..end];
        if !raw.is_empty() {
            let decoded = decode_entities(raw);
            let text = self.doc.create_text(&decoded);
            let parent = self.current_parent();
            self.doc.append_child(parent, text);
        }
        self.pos += end.max(1);
    }

    fn parse_start_tag(&mut self) {
        self.pos += 1;
        let name = self.read_tag_name();
        let (attrs, self_closing) = self.read_attributes();

        let element = self.doc.create_element(&name);
        for attr in attrs {
            if !self.doc.has_attr(element, &attr.name) {
                self.doc.set_attr(element, &attr.name, &attr.value);
            }
        }
        let parent = self.current_parent();
        self.doc.append_child(parent, element);

        if self_closing || is_void_tag(&name) {
            return;
        }
        if is_raw_text_tag(&name) {
            self.parse_raw_text(element, &name);
            return;
        }
        self.stack.push(element);
    }

    /// Consume raw text up to `</tag`, leaving the end tag itself for
    /// [`parse_end_tag`] on the next iteration.
    fn parse_raw_text(&mut self, element: NodeId, tag: &str) {
        let needle = format!("</{tag}");
        let rest = self.rest();
        let end = find_case_insensitive(rest, &needle).unwrap_or(rest.len());
        let raw = &rest[..end];
        if !raw.is_empty() {
            let text = self.doc.create_text(raw);
            self.doc.append_child(element, text);
        }
        self.pos += end;
        if end < rest.len() {
            // Consume "</tag ... >" without involving the open-element stack;
            // the raw-text element was never pushed.
            let tail = self.rest();
            match tail.find('>') {
                Some(close) => self.pos += close + 1,
                None => self.pos = self.input.len(),
            }
        }
    }

    fn parse_end_tag(&mut self) {
        self.pos += 2;
        let name = self.read_tag_name().to_ascii_lowercase();
        match self.rest().find('>') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
        if name.is_empty() {
            return;
        }
        // Close up to the nearest matching open element; ignore a stray end
        // tag entirely. Index 0 is the scope and never matches.
        let matched = self
            .stack
            .iter()
            .rposition(|&open| self.doc.is_element(open, &name));
        if let Some(index) = matched {
            if index > 0 {
                self.stack.truncate(index);
            }
        }
    }

    fn read_tag_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !is_tag_name_char(c))
            .unwrap_or(rest.len());
        let name = rest[..end].to_ascii_lowercase();
        self.pos += end;
        name
    }

    fn read_attributes(&mut self) -> (Vec<Attribute>, bool) {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return (attrs, false);
            }
            if let Some(tail) = rest.strip_prefix('/') {
                if tail.starts_with('>') {
                    self.pos += 2;
                    return (attrs, true);
                }
                // A stray slash inside the tag is ignored, as hosts do.
                self.pos += 1;
                continue;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return (attrs, false);
            }
            let name = self.read_attr_name();
            if name.is_empty() {
                self.pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            }
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()
            } else {
                String::new()
            };
            attrs.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            });
        }
    }

    fn read_attr_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..end].to_string();
        self.pos += end;
        name
    }

    fn read_attr_value(&mut self) -> String {
        let rest = self.rest();
        let mut chars = rest.chars();
        match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let (value, consumed) = match body.find(quote) {
                    Some(end) => (&body[..end], end + 2),
                    None => (body, rest.len()),
                };
                self.pos += consumed;
                decode_entities(value)
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                let value = decode_entities(&rest[..end]);
                self.pos += end;
                value
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        self.pos += end;
    }
}

fn starts_tag_name(input: &str) -> bool {
    input.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

/// Byte-wise case-insensitive substring search. The needle is ASCII, so a
/// byte match always lands on a char boundary.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Decode the named and numeric character references that appear in
/// attribute values and text runs. Unknown references pass through
/// verbatim.
fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let tail = &rest[1..];
        if let Some(semi) = tail.find(';') {
            if let Some(decoded) = resolve_entity(&tail[..semi]) {
                out.push(decoded);
                rest = &tail[semi + 1..];
                continue;
            }
        }
        out.push('&');
        rest = tail;
    }
    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn escape_text(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn escape_attr(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            other => out.push(other),
        }
    }
}

impl Document {
    /// Serialize `node` itself, including its subtree.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(node, &mut out);
        out
    }

    /// Serialize the children of `node`, in document order.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.serialize_into(child, &mut out);
        }
        out
    }

    fn serialize_into(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Document => {
                for &child in self.children(node) {
                    self.serialize_into(child, out);
                }
            }
            NodeKind::Text(text) => escape_text(text, out),
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        out.push_str("=\"");
                        escape_attr(&attr.value, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_tag(tag) {
                    return;
                }
                if is_raw_text_tag(tag) {
                    // Raw text bodies round-trip without escaping.
                    out.push_str(&self.text_content(node));
                } else {
                    for &child in self.children(node) {
                        self.serialize_into(child, out);
                    }
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}
