//! Core types for html-include
//!
//! This module holds the foundation types shared across the crate: the
//! typed error surface and the statistics summary returned by resolution
//! passes.

pub mod error;

pub use error::IncludeError;

/// Summary of a resolution pass.
///
/// Counts terminal states of the per-directive state machine: a directive
/// is either spliced (replaced by its fragment's children) or deleted
/// (absent source, transport failure, non-success response, or depth
/// exhaustion). No directive is counted twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Directives replaced by fetched fragment content
    pub spliced: usize,
    /// Directives removed without inserting content
    pub deleted: usize,
}

impl ResolutionStats {
    /// Total number of directives consumed by the pass.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.spliced + self.deleted
    }
}
