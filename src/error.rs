//! Error types for the B-tree index.

use crate::types::Key;
use thiserror::Error;

/// Result type alias for tree operations
pub type Result<T> = std::result::Result<T, BTreeError>;

/// Errors that can occur in the B-tree index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Requested order is outside the supported range
    #[error("invalid order {0} (supported range 3..=1024)")]
    InvalidOrder(u32),

    /// Key not found (for operations that require an existing key)
    #[error("key {0} not found")]
    KeyNotFound(Key),

    /// Cursor is not positioned at a valid entry
    #[error("cursor is not positioned at a valid entry")]
    CursorInvalid,

    /// Structural integrity failure. Reserved for future integrity checks;
    /// `validate` currently reports violations as a plain boolean instead.
    #[error("tree corruption detected: {0}")]
    Corrupt(String),

    /// Allocation failure. Reserved: the default allocator aborts on
    /// out-of-memory, so current logic never produces this variant.
    #[error("allocation failed")]
    OutOfMemory,
}
