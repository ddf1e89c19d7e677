//! Error handling for html-include
//!
//! This module provides the typed error surface for the inclusion resolver.
//! The error system is intentionally narrow: per the resolution contract,
//! almost every failure mode is absorbed rather than propagated.
//!
//! # Error Categories
//!
//! - **Configuration defaulting**: malformed directive attributes are never
//!   errors; the [`DirectiveConfig`](crate::directive::DirectiveConfig)
//!   descriptor silently normalizes them.
//! - **Absent source**: a directive without a usable `src` is deleted, not
//!   reported.
//! - **Transport failure**: [`IncludeError::Transport`] is produced by
//!   [`Transport`](crate::transport::Transport) implementations, logged by
//!   the resolver, and converted into deletion of the failing directive.
//!   It never aborts sibling or unrelated-subtree resolution.
//! - **Depth exhaustion**: expected policy, not a fault; no error type
//!   exists for it.
//!
//! Because of this taxonomy, [`IncludeError`] only ever crosses the
//! transport boundary; the resolver's entry points return statistics, not
//! `Result`.

use thiserror::Error;

/// The error type for fragment fetch operations.
///
/// Variants carry the request URL so that a single log line at the
/// resolver level identifies the failing directive without additional
/// context plumbing.
#[derive(Debug, Error)]
pub enum IncludeError {
    /// The transport could not complete the request at all (connection
    /// refused, DNS failure, protocol error). Non-success HTTP statuses are
    /// NOT transport errors; they surface as a response with `ok == false`.
    #[error("fragment request for '{url}' failed: {reason}")]
    Transport {
        /// The URL the fragment was requested from
        url: String,
        /// Human-readable failure description from the transport
        reason: String,
    },

    /// The source URL was syntactically unusable for the transport.
    #[error("invalid fragment url '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Why the transport rejected it
        reason: String,
    },
}
