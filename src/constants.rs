//! Global constants used throughout the html-include codebase.
//!
//! This module contains tag names, sentinel values, and other constants
//! that are used across multiple modules. Defining them centrally improves
//! maintainability and makes magic numbers more discoverable.

/// Tag name of inclusion directive elements recognized by the default
/// resolver configuration.
///
/// Deployments that ship the directive as a custom element conventionally
/// use a hyphenated name instead; see
/// [`ResolverConfig`](crate::resolver::ResolverConfig) for overriding it.
pub const DEFAULT_DIRECTIVE_TAG: &str = "include";

/// Tag name treated as executable content inside fetched fragments.
pub const DEFAULT_SCRIPT_TAG: &str = "script";

/// Sentinel depth value meaning "no recursion bound at this level".
///
/// A `maxdepth` attribute that is absent, non-numeric, negative, or zero
/// normalizes to this value. Zero is deliberately not a usable literal
/// bound; the original wire format reinterprets it as unlimited.
pub const UNLIMITED_DEPTH: i32 = -1;

/// Tag name of the detached container element that holds a parsed fragment
/// before its children are spliced into the live tree.
pub const FRAGMENT_CONTAINER_TAG: &str = "div";
