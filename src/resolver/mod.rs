//! Recursive fragment inclusion resolution.
//!
//! This module implements the core algorithm: discovering inclusion
//! directives in a tree without double-counting nested occurrences,
//! fetching their referenced content, splicing fetched content into the
//! tree in place of each directive, re-activating executable content
//! carried inside fragments, and recursing into newly introduced
//! directives under a depth budget.
//!
//! # Entry Protocols
//!
//! One resolution engine serves two host integration styles:
//!
//! - **Attach-time** ([`Resolver::resolve_attached`]): the host reports a
//!   single directive element joining the live tree. The call is guarded:
//!   it only acts when the node really is a top-level directive in the
//!   live tree (a directive with a directive ancestor is reached by that
//!   ancestor's own resolution, not by its attach event).
//! - **Batch** ([`Resolver::resolve_document`]): invoked once when the
//!   host signals initial structure is ready. Each pass collects the
//!   current top-level directive set and resolves it in document order;
//!   passes repeat until none remain, which also picks up directives left
//!   inert by a `recursion`-disabled parent in an earlier pass (they are
//!   top-level by then and start over with a fresh budget).
//!
//! # Per-Directive State Machine
//!
//! `Discovered → Fetching → {Spliced, Deleted}`. Both terminal states
//! consume the node: it is either replaced by its fragment's children or
//! removed outright (absent `src`, transport failure, non-success
//! response, exhausted depth budget). No node revisits `Fetching`.
//!
//! # Ordering and Concurrency
//!
//! Resolution is single-threaded and cooperatively scheduled; the only
//! suspension points are fragment fetches. Sibling directives resolve
//! strictly in document order, each completing its entire subtree
//! (including recursive descendants) before the next begins. The tree is
//! mutated only around the directive currently being resolved, so
//! in-flight resolutions of unrelated subtrees never contend for an
//! insertion point.
//!
//! # Failure Policy
//!
//! No failure aborts sibling or unrelated-subtree resolution. A failed or
//! over-deep inclusion simply disappears from the final document: fetch
//! errors are logged and convert to deletion, non-success responses
//! splice to nothing, and depth-blocked directives are deleted without a
//! fetch.

pub mod depth;
pub mod materialize;

use futures::future::BoxFuture;

use crate::constants::{DEFAULT_DIRECTIVE_TAG, DEFAULT_SCRIPT_TAG};
use crate::core::ResolutionStats;
use crate::directive::DirectiveConfig;
use crate::dom::{Document, NodeId};
use crate::transport::{FetchOptions, FetchOutcome, Transport};

pub use depth::DepthLedger;
pub use materialize::{Materialized, materialize};

/// Tag names the resolver recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Tag marking inclusion directives (default `include`).
    pub directive_tag: String,
    /// Tag treated as executable content (default `script`).
    pub script_tag: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            directive_tag: DEFAULT_DIRECTIVE_TAG.to_string(),
            script_tag: DEFAULT_SCRIPT_TAG.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Configuration recognizing a custom-element style directive tag,
    /// e.g. `html-include`.
    #[must_use]
    pub fn for_directive_tag(tag: &str) -> Self {
        Self {
            directive_tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }
}

/// The resolution driver, generic over the fragment [`Transport`].
#[derive(Debug)]
pub struct Resolver<T> {
    transport: T,
    config: ResolverConfig,
}

impl<T> Resolver<T> {
    /// Create a resolver with the default tag configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ResolverConfig::default(),
        }
    }

    /// Create a resolver with an explicit tag configuration.
    #[must_use]
    pub const fn with_config(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    /// The active tag configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl<T: Transport + Sync> Resolver<T> {
    /// Batch entry protocol: resolve every directive reachable from the
    /// document root, looping until a collection pass finds none.
    ///
    /// Directives introduced by a just-resolved sibling at the same level
    /// are handled by the next pass, as are nested directives a
    /// `recursion`-disabled parent left inert (now top-level, with a
    /// fresh empty budget).
    pub async fn resolve_document(&self, doc: &mut Document) -> ResolutionStats {
        let mut stats = ResolutionStats::default();
        loop {
            let top_level =
                materialize::top_level_directives(doc, doc.root(), &self.config.directive_tag);
            if top_level.is_empty() {
                break;
            }
            tracing::debug!(count = top_level.len(), "resolving top-level directives");
            for node in top_level {
                // Skip entries that left the live tree since collection.
                if !doc.is_attached(node) {
                    continue;
                }
                self.resolve_node(doc, node, DepthLedger::new(), &mut stats)
                    .await;
            }
        }
        stats
    }

    /// Attach-time entry protocol: resolve a single directive element that
    /// just joined the live tree.
    ///
    /// No-op unless `node` is a directive element, attached under the
    /// document root, with no directive-tagged ancestor (such a node
    /// belongs to its ancestor's resolution, not to its own attach event).
    pub async fn resolve_attached(&self, doc: &mut Document, node: NodeId) -> ResolutionStats {
        let mut stats = ResolutionStats::default();
        if !doc.is_element(node, &self.config.directive_tag)
            || !doc.is_attached(node)
            || doc.has_ancestor_with_tag(node, &self.config.directive_tag)
        {
            tracing::debug!(?node, "attach-time resolution skipped: not a live top-level directive");
            return stats;
        }
        self.resolve_node(doc, node, DepthLedger::new(), &mut stats)
            .await;
        stats
    }

    /// Resolve one directive node: fetch, splice, recurse. Boxed because
    /// resolution is recursive through [`Self::splice`].
    fn resolve_node<'a>(
        &'a self,
        doc: &'a mut Document,
        node: NodeId,
        ledger: DepthLedger,
        stats: &'a mut ResolutionStats,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let config = DirectiveConfig::from_node(doc, node);
            let Some(src) = config.src else {
                tracing::debug!(?node, "directive has no usable src, deleting");
                doc.remove(node);
                stats.deleted += 1;
                return;
            };

            // The child budget is fixed before the fetch; fragments cannot
            // influence their own depth accounting.
            let child_ledger = ledger.push(config.maxdepth);
            let options = FetchOptions {
                mode: config.mode,
                cache: config.cache,
            };

            tracing::debug!(src = %src, depth = child_ledger.depth(), "fetching fragment");
            let outcome = match self.transport.fetch(&src, &options).await {
                Ok(response) if response.ok => FetchOutcome::Content(response.body),
                Ok(_) => {
                    tracing::warn!(src = %src, "fragment fetch returned non-success response");
                    FetchOutcome::Empty
                }
                Err(err) => {
                    tracing::error!(src = %src, error = %err, "fragment fetch failed");
                    if doc.parent(node).is_some() {
                        doc.remove(node);
                    }
                    stats.deleted += 1;
                    return;
                }
            };

            match outcome {
                FetchOutcome::Empty => {
                    doc.remove(node);
                    stats.deleted += 1;
                }
                FetchOutcome::Content(content) => {
                    self.splice(doc, node, &content, config.recursion, &child_ledger, stats)
                        .await;
                }
            }
        })
    }

    /// Splice engine: replace `node` with the materialized children of
    /// `content`, then recurse into the fragment's top-level directives
    /// when `recursion` permits.
    ///
    /// When `recursion` is false, nested directives stay in the tree as
    /// inert markup; only a blocked depth budget deletes them.
    async fn splice(
        &self,
        doc: &mut Document,
        node: NodeId,
        content: &str,
        recursion: bool,
        child_ledger: &DepthLedger,
        stats: &mut ResolutionStats,
    ) {
        let Some(parent) = doc.parent(node) else {
            // The node left the tree while its fetch was in flight.
            return;
        };

        let materialized = materialize(
            doc,
            content,
            &self.config.directive_tag,
            &self.config.script_tag,
        );

        loop {
            let Some(&first) = doc.children(materialized.container).first() else {
                break;
            };
            doc.insert_before(parent, first, node);
        }
        doc.remove(node);
        stats.spliced += 1;

        if !recursion || materialized.nested_directives.is_empty() {
            return;
        }
        if child_ledger.is_blocked() {
            tracing::debug!(
                count = materialized.nested_directives.len(),
                "recursion budget exhausted, deleting nested directives"
            );
            for nested in materialized.nested_directives {
                doc.remove(nested);
                stats.deleted += 1;
            }
            return;
        }
        for nested in materialized.nested_directives {
            self.resolve_node(&mut *doc, nested, child_ledger.clone(), stats)
                .await;
        }
    }
}
