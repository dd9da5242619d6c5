//! Read-only page access and detached content fragments
//!
//! This module provides the structural building blocks the extractor works with:
//! - Predicate: compiled selectors with `matches` / `find_all`
//! - PageSnapshot: a parsed, read-only copy of the host page
//! - ElementNode: owned fragments copied out of a snapshot

pub mod element;
pub mod predicate;
pub mod snapshot;

pub use element::{ElementNode, Node};
pub use predicate::{Matches, Predicate};
pub use snapshot::PageSnapshot;
