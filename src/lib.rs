//! # BTree Index
//!
//! An instrumented, in-memory B-tree index with ordered cursor traversal
//! and operation statistics.
//!
//! ## Architecture
//!
//! The crate is composed of small, layered components:
//!
//! - **Node Layer** (`btree::node`): owned-tree node representation with
//!   in-node binary search and preemptive splitting
//! - **Tree Layer** (`btree::tree`): insert, search, delete, validation,
//!   and statistics snapshots
//! - **Cursor** (`btree::cursor`): ordered forward/backward iteration
//!   without re-walking from the root on every step
//! - **Index Handle** (`Index`): a lock-guarded shared handle for
//!   multithreaded callers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use btree_index::{BTree, Config, Index};
//!
//! let mut tree = BTree::new(64)?;
//! tree.insert(42, "answer")?;
//! assert_eq!(tree.search(42)?, &"answer");
//!
//! for (key, value) in tree.iter() {
//!     println!("{key} -> {value}");
//! }
//!
//! // Shared across threads: one exclusive lock per operation
//! let index = Index::open(Config::new().order(64))?;
//! index.insert(1, "one")?;
//! ```

pub mod btree;
pub mod error;
pub mod types;

pub use btree::{BTree, Cursor, Iter, TreeStats};
pub use error::{BTreeError, Result};
pub use types::{Key, DEFAULT_ORDER, MAX_ORDER, MIN_ORDER};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Index configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree order (maximum children per internal node), default 128
    pub order: u32,
    /// Whether to collect per-operation statistics (default: true)
    pub collect_stats: bool,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self {
            order: DEFAULT_ORDER,
            collect_stats: true,
        }
    }

    /// Set the tree order
    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Toggle per-operation statistics collection
    pub fn collect_stats(mut self, enabled: bool) -> Self {
        self.collect_stats = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Node shape for visualization (keys only; values are opaque)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Whether this is a leaf node
    pub is_leaf: bool,
    /// Keys in this node
    pub keys: Vec<Key>,
    /// Child nodes (empty for leaves)
    pub children: Vec<TreeNode>,
}

/// Shared handle over a `BTree`, safe to use from multiple threads.
///
/// The tree itself is single-threaded; this handle serializes access by
/// taking one exclusive lock per operation, which is the only concurrency
/// discipline the data structure supports (there is no finer-grained
/// primitive to build on).
pub struct Index<V> {
    tree: Mutex<BTree<V>>,
}

impl<V> Index<V> {
    /// Create an index from a configuration
    pub fn open(config: Config) -> Result<Self> {
        let tree = BTree::new(config.order)?;
        tree.set_stats_collection(config.collect_stats);
        Ok(Self {
            tree: Mutex::new(tree),
        })
    }

    /// Insert or update a key-value pair
    pub fn insert(&self, key: Key, value: V) -> Result<()> {
        self.tree.lock().insert(key, value)
    }

    /// Check if a key exists
    pub fn contains(&self, key: Key) -> bool {
        self.tree.lock().contains(key)
    }

    /// Delete a key (tombstone semantics, see [`BTree::delete`])
    pub fn delete(&self, key: Key) -> Result<()> {
        self.tree.lock().delete(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.tree.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.lock().is_empty()
    }

    /// Current tree height
    pub fn height(&self) -> u32 {
        self.tree.lock().height()
    }

    /// Run structural validation
    pub fn validate(&self) -> bool {
        self.tree.lock().validate()
    }

    /// Snapshot the operation statistics
    pub fn stats(&self) -> TreeStats {
        self.tree.lock().stats()
    }

    /// Zero the operation counters
    pub fn reset_stats(&self) {
        self.tree.lock().reset_stats()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.tree.lock().clear()
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<Key> {
        self.tree.lock().iter().map(|(key, _)| key).collect()
    }

    /// Export the tree shape for visualization
    pub fn export(&self) -> TreeNode {
        self.tree.lock().export()
    }
}

impl<V: Clone> Index<V> {
    /// Get a value by key, cloning it out of the tree
    pub fn get(&self, key: Key) -> Result<V> {
        self.tree.lock().search(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_basic_operations() -> Result<()> {
        let index = Index::open(Config::new().order(4))?;

        index.insert(1, "one".to_string())?;
        index.insert(2, "two".to_string())?;
        assert_eq!(index.get(1)?, "one");
        assert!(index.contains(2));
        assert!(!index.contains(3));
        assert_eq!(index.len(), 2);

        index.insert(1, "uno".to_string())?;
        assert_eq!(index.get(1)?, "uno");
        assert_eq!(index.len(), 2);

        assert_eq!(index.get(9), Err(BTreeError::KeyNotFound(9)));
        Ok(())
    }

    #[test]
    fn test_index_keys_sorted() -> Result<()> {
        let index = Index::open(Config::new().order(4))?;
        for key in [50, 25, 75, 10, 30, 60, 90] {
            index.insert(key, key)?;
        }
        assert_eq!(index.keys(), vec![10, 25, 30, 50, 60, 75, 90]);
        assert!(index.validate());
        Ok(())
    }

    #[test]
    fn test_index_rejects_bad_order() {
        assert!(Index::<i64>::open(Config::new().order(2)).is_err());
    }

    #[test]
    fn test_index_stats_toggle() -> Result<()> {
        let index = Index::open(Config::new().order(8).collect_stats(false))?;
        index.insert(1, 1)?;
        let _ = index.get(1);
        let snap = index.stats();
        assert_eq!(snap.search_ops, 0);
        assert_eq!(snap.key_count, 1);
        Ok(())
    }

    #[test]
    fn test_index_shared_across_threads() {
        let index = Index::open(Config::new().order(8)).unwrap();

        std::thread::scope(|scope| {
            for t in 0i64..4 {
                let index = &index;
                scope.spawn(move || {
                    for i in 0..250 {
                        index.insert(t * 1000 + i, i).unwrap();
                    }
                });
            }
        });

        assert_eq!(index.len(), 1000);
        assert!(index.validate());
        assert_eq!(index.keys().len(), 1000);
    }

    #[test]
    fn test_export_round_trips_through_json() -> Result<()> {
        let index = Index::open(Config::new().order(4))?;
        for key in 1..=10 {
            index.insert(key, key)?;
        }
        let json = serde_json::to_string(&index.export()).unwrap();
        let back: TreeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.is_leaf, index.export().is_leaf);
        assert!(json.contains("isLeaf"));
        Ok(())
    }
}
