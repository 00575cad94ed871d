//! B-tree implementation.
//!
//! This module provides an in-memory B-tree that supports:
//! - Ordered insertion with top-down preemptive splitting
//! - Point lookups
//! - Cursor traversal in key order
//! - Structural validation and operation statistics

mod cursor;
mod node;
mod stats;
mod tree;

pub use cursor::{Cursor, Iter};
pub use stats::TreeStats;
pub use tree::BTree;
