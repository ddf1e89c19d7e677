//! Document tree collaborator for the inclusion resolver.
//!
//! The resolver operates against a small host-tree interface:
//! insert-before, remove, attribute get/set/has/toggle, subtree
//! query-by-tag, and a fragment-parsing primitive. This module provides a
//! self-contained realization of that interface:
//!
//! - [`node`] - the arena-backed [`Document`] tree and its mutation
//!   primitives
//! - [`parser`] - forgiving fragment parsing ([`parse_fragment`],
//!   [`parse_document`]) and serialization back to markup
//!
//! It is a stand-in for a host rendering environment, not a general HTML
//! engine; fidelity stops at what fragment inclusion observes.

pub mod node;
pub mod parser;

pub use node::{Attribute, Document, NodeId, NodeKind};
pub use parser::{parse_document, parse_fragment, parse_into};
