//! Common types and tuning constants for the B-tree index.

/// Key type stored in the tree. Keys are unique and kept in strictly
/// increasing order within every node.
pub type Key = i64;

/// Minimum supported order (maximum children per internal node).
///
/// Below 3 a node could not hold even one separator with two children.
pub const MIN_ORDER: u32 = 3;

/// Maximum supported order.
pub const MAX_ORDER: u32 = 1024;

/// Default order when none is configured. A high fanout keeps the tree
/// shallow for index-sized data sets.
pub const DEFAULT_ORDER: u32 = 128;

/// Expected upper bound on tree depth, used to pre-size cursor paths.
/// Deeper trees simply grow the path stack.
pub const MAX_DEPTH: usize = 32;
