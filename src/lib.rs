//! html-include - Recursive HTML fragment inclusion resolver
//!
//! Resolves inclusion directives embedded in a document tree into fetched
//! fragment content, recursively, with depth limiting, cache-control, and
//! execution-preserving handling of embedded script content. It targets
//! document-assembly scenarios where a top-level document references
//! reusable fragments by URI and those fragments may themselves reference
//! further fragments.
//!
//! # Architecture Overview
//!
//! A directive is an ordinary element (by default `<include>`) whose
//! attributes configure one inclusion:
//!
//! ```html
//! <include src="partials/nav.html" mode="same-origin" cache="no-cache"
//!          recursion maxdepth="3">
//! ```
//!
//! Resolution replaces the element with the fetched fragment's nodes at
//! the same tree position. Fragments may carry further directives; with
//! `recursion` enabled these resolve in turn, each level consuming the
//! depth budgets of every ancestor directive on its path.
//!
//! # Core Modules
//!
//! - [`directive`] - typed descriptor of a directive element's
//!   configuration (source URI, request mode, cache mode, recursion flag,
//!   depth budget)
//! - [`resolver`] - the resolution driver, splice engine, depth ledger,
//!   and fragment materializer
//! - [`transport`] - the fragment fetching boundary and its HTTP
//!   implementation
//! - [`dom`] - arena-backed document tree with fragment parsing and
//!   serialization
//! - [`core`] - error taxonomy and resolution statistics
//! - [`constants`] - shared tag names and sentinel values
//!
//! # Usage
//!
//! ```rust,no_run
//! use html_include::dom::parse_document;
//! use html_include::resolver::Resolver;
//! use html_include::transport::HttpTransport;
//!
//! # async fn example() {
//! let mut doc = parse_document(
//!     r#"<header><include src="https://example.com/nav.html"></include></header>"#,
//! );
//! let resolver = Resolver::new(HttpTransport::new());
//! let stats = resolver.resolve_document(&mut doc).await;
//! println!("spliced {} directive(s): {}", stats.spliced, doc.inner_html(doc.root()));
//! # }
//! ```
//!
//! Hosts that surface an element-attached event instead of a single ready
//! signal use [`resolver::Resolver::resolve_attached`] per directive.
//!
//! # Failure Behavior
//!
//! Resolution never fails outward: malformed attributes normalize to
//! defaults, a directive without a source is removed, fetch failures are
//! logged (`tracing`) and remove the failing directive, and depth-blocked
//! directives are removed silently. A failed or over-deep inclusion
//! simply disappears from the final document.

// Core functionality modules
pub mod constants;
pub mod core;
pub mod directive;
pub mod resolver;

// Host collaborator stand-ins
pub mod dom;
pub mod transport;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
