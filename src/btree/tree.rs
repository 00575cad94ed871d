//! B-tree core implementation.
//!
//! This module provides the main `BTree` struct with operations for:
//! - insert: Ordered insertion with top-down preemptive splitting
//! - search: Point lookups
//! - delete: Tombstone-style removal (see `delete` for the caveat)
//! - validate: Structural invariant checking
//! - stats: Operation statistics snapshots

use crate::btree::cursor::{Cursor, Iter};
use crate::btree::node::Node;
use crate::btree::stats::{StatCounters, TreeStats};
use crate::error::{BTreeError, Result};
use crate::types::{Key, DEFAULT_ORDER, MAX_ORDER, MIN_ORDER};
use crate::TreeNode;

/// An in-memory B-tree index mapping `i64` keys to values of type `V`.
///
/// Values live only in leaves; internal nodes carry separator keys and
/// child links. Splits happen top-down *before* descending into a full
/// child, so an insert never needs a second pass to fix an overflow and
/// all leaves stay at the same depth.
pub struct BTree<V> {
    /// Root node; ownership moves to a new root when the tree grows
    root: Node<V>,
    /// Maximum children per internal node; max keys per node = order - 1
    order: u32,
    /// Minimum keys per non-root leaf
    min_keys: u32,
    /// Live operation counters
    stats: StatCounters,
}

impl<V> BTree<V> {
    /// Create an empty tree with the given order.
    ///
    /// Fails with [`BTreeError::InvalidOrder`] if `order` is outside
    /// `[3, 1024]`. The new tree is a single empty leaf with height 1.
    pub fn new(order: u32) -> Result<Self> {
        if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
            return Err(BTreeError::InvalidOrder(order));
        }
        Ok(Self {
            root: Node::new_leaf(order),
            order,
            min_keys: (order - 1) / 2,
            stats: StatCounters::new(),
        })
    }

    /// The configured order (maximum children per internal node).
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of live keys in the tree.
    ///
    /// Tracked by counter; `delete` decrements it without removing the
    /// entry (see `delete`).
    pub fn len(&self) -> usize {
        self.stats.key_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current height, computed by following the leftmost spine.
    /// An empty tree has height 1 (the root leaf).
    pub fn height(&self) -> u32 {
        let mut height = 1;
        let mut node = &self.root;
        while !node.leaf {
            height += 1;
            node = &node.children[0];
        }
        height
    }

    /// Insert a key-value pair, overwriting the value if the key exists
    /// (last write wins; `len` is unchanged on overwrite).
    pub fn insert(&mut self, key: Key, value: V) -> Result<()> {
        self.stats.record_insert();

        // Preemptive root split: growing here is the only way height
        // increases, which keeps every leaf at the same depth.
        if self.root.is_full(self.order) {
            self.grow_root();
        }

        let Self {
            root, order, stats, ..
        } = self;
        insert_nonfull(root, key, value, *order, stats);
        Ok(())
    }

    /// Replace the root with a fresh internal node holding the old root as
    /// its sole child, then split that child.
    fn grow_root(&mut self) {
        let order = self.order;
        let old_root = std::mem::replace(&mut self.root, Node::new_internal(order));
        self.root.children.push(old_root);
        self.stats.add_node();
        self.root.split_child(0, order, &self.stats);
    }

    /// Look up a key.
    ///
    /// Not-found is reported as [`BTreeError::KeyNotFound`] so callers can
    /// distinguish it from other failures.
    pub fn search(&self, key: Key) -> Result<&V> {
        self.stats.record_search();

        let mut node = &self.root;
        loop {
            self.stats.record_visit();
            let (pos, found) = node.locate(key, Some(&self.stats));

            if node.leaf {
                return if found {
                    Ok(&node.values[pos])
                } else {
                    Err(BTreeError::KeyNotFound(key))
                };
            }

            // Equal keys live in the right subtree of their separator
            node = &node.children[if found { pos + 1 } else { pos }];
        }
    }

    /// Check whether a key is present. Counts as a search operation.
    pub fn contains(&self, key: Key) -> bool {
        self.search(key).is_ok()
    }

    /// Delete a key.
    ///
    /// KNOWN GAP, preserved from the reference behavior: this is a
    /// tombstone-by-counter delete. On a hit it decrements the key count
    /// and reports success but performs **no structural removal**, no
    /// rebalancing, and no merging — the key remains discoverable via
    /// `search`/`contains` afterwards. `len` and the traversal disagree
    /// once a key has been "deleted".
    pub fn delete(&mut self, key: Key) -> Result<()> {
        self.stats.record_delete();
        self.search(key)?;
        self.stats.remove_key();
        Ok(())
    }

    /// Drop all entries, resetting to a single empty leaf. Operation
    /// counters are cleared as well.
    pub fn clear(&mut self) {
        self.root = Node::new_leaf(self.order);
        self.stats.clear();
    }

    /// Structural validation: key-count bounds, strict in-node ordering,
    /// parallel-array shape, and separator bounds tightened per child.
    ///
    /// Returns false on the first violation found. The root is exempt from
    /// the minimum key count. Internal nodes are checked against
    /// `(order - 2) / 2` rather than `min_keys`: a preemptive split of an
    /// exactly-full internal node leaves that many keys on the short side.
    pub fn validate(&self) -> bool {
        self.check_node(&self.root, None, None, true)
    }

    fn check_node(
        &self,
        node: &Node<V>,
        lower: Option<Key>,
        upper: Option<Key>,
        is_root: bool,
    ) -> bool {
        let max_keys = self.order as usize - 1;
        let min_keys = if node.leaf {
            self.min_keys as usize
        } else {
            (self.order as usize - 2) / 2
        };

        if !is_root && node.keys.len() < min_keys {
            return false;
        }
        if node.keys.len() > max_keys {
            return false;
        }

        if node.leaf {
            if node.values.len() != node.keys.len() || !node.children.is_empty() {
                return false;
            }
        } else if node.children.len() != node.keys.len() + 1 || !node.values.is_empty() {
            return false;
        }

        if node.keys.windows(2).any(|pair| pair[1] <= pair[0]) {
            return false;
        }

        // Separators are copies of leaf keys, so the lower bound is
        // inclusive while the upper bound stays strict.
        if let (Some(lo), Some(&first)) = (lower, node.keys.first()) {
            if first < lo {
                return false;
            }
        }
        if let (Some(hi), Some(&last)) = (upper, node.keys.last()) {
            if last >= hi {
                return false;
            }
        }

        if !node.leaf {
            for (i, child) in node.children.iter().enumerate() {
                let lo = if i == 0 { lower } else { Some(node.keys[i - 1]) };
                let hi = if i == node.keys.len() {
                    upper
                } else {
                    Some(node.keys[i])
                };
                if !self.check_node(child, lo, hi, false) {
                    return false;
                }
            }
        }

        true
    }

    /// Snapshot the statistics. Height and fill factor are recomputed by
    /// full traversal on every call.
    pub fn stats(&self) -> TreeStats {
        let mut total_keys = 0u64;
        let mut total_capacity = 0u64;
        fill_totals(
            &self.root,
            self.order as u64 - 1,
            &mut total_keys,
            &mut total_capacity,
        );
        let fill = if total_capacity > 0 {
            total_keys as f64 / total_capacity as f64
        } else {
            0.0
        };
        self.stats.snapshot(self.height(), fill)
    }

    /// Zero the operation counters; node and key counts are preserved.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Toggle collection of per-operation statistics (comparisons, node
    /// visits, operation counts). Structural counts are always kept.
    pub fn set_stats_collection(&self, enabled: bool) {
        self.stats.set_enabled(enabled);
    }

    /// An unpositioned cursor over this tree. The cursor borrows the tree,
    /// so the borrow checker rejects mutation while it is live.
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(&self.root)
    }

    /// Iterate over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.cursor())
    }

    /// Export the tree shape (keys only) for inspection or visualization.
    pub fn export(&self) -> TreeNode {
        export_node(&self.root)
    }
}

impl<V> Default for BTree<V> {
    /// An empty tree with [`DEFAULT_ORDER`].
    fn default() -> Self {
        // DEFAULT_ORDER is within the valid range
        Self::new(DEFAULT_ORDER).unwrap()
    }
}

/// Recursive insert into a node known not to be full.
///
/// At each internal node the descent child is split first if full; the
/// promoted separator then decides the direction (right on equality, per
/// the half-open separator convention).
fn insert_nonfull<V>(node: &mut Node<V>, key: Key, value: V, order: u32, stats: &StatCounters) {
    stats.record_visit();
    let (pos, found) = node.locate(key, Some(stats));

    if node.leaf {
        if found {
            node.values[pos] = value;
        } else {
            node.keys.insert(pos, key);
            node.values.insert(pos, value);
            stats.add_key();
        }
        return;
    }

    let mut pos = if found { pos + 1 } else { pos };
    if node.children[pos].is_full(order) {
        node.split_child(pos, order, stats);
        if key >= node.keys[pos] {
            pos += 1;
        }
    }
    insert_nonfull(&mut node.children[pos], key, value, order, stats);
}

fn fill_totals<V>(node: &Node<V>, max_keys: u64, total_keys: &mut u64, total_capacity: &mut u64) {
    *total_keys += node.keys.len() as u64;
    *total_capacity += max_keys;
    for child in &node.children {
        fill_totals(child, max_keys, total_keys, total_capacity);
    }
}

fn export_node<V>(node: &Node<V>) -> TreeNode {
    TreeNode {
        is_leaf: node.leaf,
        keys: node.keys.clone(),
        children: node.children.iter().map(export_node).collect(),
    }
}
