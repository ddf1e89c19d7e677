//! Depth budgeting, recursion policy, and sibling ordering across the two
//! entry protocols.

use html_include::dom::parse_document;
use html_include::resolver::{Resolver, ResolverConfig};
use html_include::test_utils::{StaticTransport, init_test_logging};

fn chain_transport() -> StaticTransport {
    StaticTransport::new()
        .route("a.html", r#"<p>a</p><include src="b.html" recursion></include>"#)
        .route("b.html", r#"<p>b</p><include src="c.html" recursion></include>"#)
        .route("c.html", "<p>c</p>")
}

#[tokio::test]
async fn unlimited_depth_resolves_the_whole_chain() {
    init_test_logging();
    let transport = chain_transport();
    let mut doc = parse_document(r#"<include src="a.html" recursion></include>"#);

    let stats = Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    assert_eq!(doc.inner_html(doc.root()), "<p>a</p><p>b</p><p>c</p>");
    assert_eq!(stats.spliced, 3);
    assert_eq!(transport.requests(), vec!["a.html", "b.html", "c.html"]);
}

#[tokio::test]
async fn zero_maxdepth_behaves_exactly_like_absent_maxdepth() {
    init_test_logging();
    let with_zero = {
        let transport = chain_transport();
        let mut doc = parse_document(r#"<include src="a.html" maxdepth="0" recursion></include>"#);
        Resolver::new(transport.clone()).resolve_document(&mut doc).await;
        (doc.inner_html(doc.root()), transport.requests())
    };
    let with_absent = {
        let transport = chain_transport();
        let mut doc = parse_document(r#"<include src="a.html" recursion></include>"#);
        Resolver::new(transport.clone()).resolve_document(&mut doc).await;
        (doc.inner_html(doc.root()), transport.requests())
    };
    assert_eq!(with_zero, with_absent);
}

#[tokio::test]
async fn outer_budget_limits_descendants_through_unlimited_levels() {
    // The outer maxdepth=2 admits b but blocks c, even though b itself
    // carries no bound: a blocked path stays blocked.
    init_test_logging();
    let transport = chain_transport();
    let mut doc = parse_document(r#"<include src="a.html" maxdepth="2" recursion></include>"#);

    let stats = Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    assert_eq!(doc.inner_html(doc.root()), "<p>a</p><p>b</p>");
    assert_eq!(stats.spliced, 2);
    assert_eq!(stats.deleted, 1);
    assert_eq!(transport.requests(), vec!["a.html", "b.html"]);
}

#[tokio::test]
async fn tightest_ancestor_budget_wins() {
    init_test_logging();
    let transport = StaticTransport::new()
        .route(
            "a.html",
            r#"<include src="b.html" maxdepth="9" recursion></include>"#,
        )
        .route("b.html", r#"<include src="c.html" recursion></include>"#)
        .route("c.html", "<p>c</p>");
    let mut doc = parse_document(r#"<include src="a.html" maxdepth="2" recursion></include>"#);

    let stats = Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    // a admits b (budget 2 -> 1), b admits nothing further (1 -> 0): c is
    // deleted without a fetch despite b's own generous bound.
    assert_eq!(transport.requests(), vec!["a.html", "b.html"]);
    assert_eq!(doc.inner_html(doc.root()), "");
    assert_eq!(stats.deleted, 1);
}

#[tokio::test]
async fn siblings_resolve_in_document_order_depth_first() {
    init_test_logging();
    let transport = StaticTransport::new()
        .route("first.html", r#"<include src="first-child.html" recursion></include>"#)
        .route("first-child.html", "<p>1.1</p>")
        .route("second.html", "<p>2</p>");
    let mut doc = parse_document(
        r#"<include src="first.html" recursion></include><include src="second.html"></include>"#,
    );

    Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    // The first sibling's whole subtree completes before the second
    // sibling starts.
    assert_eq!(
        transport.requests(),
        vec!["first.html", "first-child.html", "second.html"]
    );
    assert_eq!(doc.inner_html(doc.root()), "<p>1.1</p><p>2</p>");
}

#[tokio::test]
async fn fragment_introducing_a_top_level_sibling_is_handled_by_the_next_pass() {
    // Without `recursion`, the nested directive stays inert; the batch
    // loop then finds it as a new top-level directive and resolves it with
    // a fresh budget.
    init_test_logging();
    let transport = StaticTransport::new()
        .route("outer.html", r#"<include src="late.html"></include>"#)
        .route("late.html", "<p>late</p>");
    let mut doc = parse_document(r#"<include src="outer.html"></include>"#);

    let stats = Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    assert_eq!(stats.spliced, 2);
    assert_eq!(doc.inner_html(doc.root()), "<p>late</p>");
    assert_eq!(transport.requests(), vec!["outer.html", "late.html"]);
}

#[tokio::test]
async fn recursion_off_nested_directives_survive_attach_time_resolution() {
    init_test_logging();
    let transport = StaticTransport::new()
        .route("outer.html", r#"<include src="inner.html"></include>"#)
        .route("inner.html", "<p>never fetched</p>");
    let mut doc = parse_document(r#"<include src="outer.html"></include>"#);
    let directive = doc.elements_by_tag(doc.root(), "include")[0];

    let stats = Resolver::new(transport.clone())
        .resolve_attached(&mut doc, directive)
        .await;

    // The inert nested directive is intentionally left in place, not
    // deleted; only a blocked budget deletes.
    assert_eq!(stats.spliced, 1);
    assert_eq!(stats.deleted, 0);
    assert_eq!(
        doc.inner_html(doc.root()),
        r#"<include src="inner.html"></include>"#
    );
    assert_eq!(transport.requests(), vec!["outer.html"]);
}

#[tokio::test]
async fn blocked_budget_deletes_all_nested_directives_of_the_fragment() {
    init_test_logging();
    let transport = StaticTransport::new().route(
        "multi.html",
        r#"<p>kept</p><include src="x.html" recursion></include><include src="y.html"></include>"#,
    );
    let mut doc = parse_document(r#"<include src="multi.html" maxdepth="1" recursion></include>"#);

    let stats = Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    assert_eq!(doc.inner_html(doc.root()), "<p>kept</p>");
    assert_eq!(stats.spliced, 1);
    assert_eq!(stats.deleted, 2);
    assert_eq!(transport.requests(), vec!["multi.html"]);
}

#[tokio::test]
async fn deeply_nested_directive_in_one_fragment_is_reached_by_recursion_not_twice() {
    // A directive nested inside another directive of the same fragment
    // belongs to the inner resolution pass; the outer pass must not fetch
    // it a second time.
    init_test_logging();
    let transport = StaticTransport::new()
        .route(
            "a.html",
            r#"<include src="b.html" recursion><include src="c.html"></include></include>"#,
        )
        .route("b.html", "<p>b</p>")
        .route("c.html", "<p>c</p>");
    let mut doc = parse_document(r#"<include src="a.html" recursion></include>"#);

    Resolver::new(transport.clone()).resolve_document(&mut doc).await;

    // b's own children (the c directive placeholder) are discarded when b
    // is spliced; c is never fetched.
    assert_eq!(transport.requests(), vec!["a.html", "b.html"]);
    assert_eq!(doc.inner_html(doc.root()), "<p>b</p>");
}

#[tokio::test]
async fn custom_element_tag_configuration_resolves_hyphenated_directives() {
    init_test_logging();
    let transport = StaticTransport::new()
        .route("nav.html", r#"<nav></nav><html-include src="footer.html"></html-include>"#)
        .route("footer.html", "<footer></footer>");
    let mut doc = parse_document(r#"<html-include src="nav.html" recursion></html-include>"#);
    let resolver = Resolver::with_config(
        transport.clone(),
        ResolverConfig::for_directive_tag("html-include"),
    );

    let stats = resolver.resolve_document(&mut doc).await;

    assert_eq!(stats.spliced, 2);
    assert_eq!(doc.inner_html(doc.root()), "<nav></nav><footer></footer>");
}
