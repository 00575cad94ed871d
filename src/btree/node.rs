//! B-tree node representation and the in-node primitives.
//!
//! Nodes own their children directly, so the whole tree is a single
//! ownership hierarchy rooted at `BTree::root` — no arena, no raw
//! pointers. Leaves carry values aligned index-for-index with their keys;
//! internal nodes carry `keys.len() + 1` children and no values.
//!
//! Separator convention (right-biased): child `i` of an internal node
//! holds keys `k` with `keys[i-1] <= k < keys[i]`. Separators are copies
//! of leaf keys, so the lower bound is inclusive and an exact match at an
//! internal node always descends to child `i + 1`.

use crate::btree::stats::StatCounters;
use crate::types::Key;
use std::cmp::Ordering;

pub(crate) struct Node<V> {
    /// Keys, strictly increasing
    pub(crate) keys: Vec<Key>,
    /// Values (leaf nodes only), parallel to `keys`
    pub(crate) values: Vec<V>,
    /// Children (internal nodes only), `keys.len() + 1` entries
    pub(crate) children: Vec<Node<V>>,
    /// True if this is a leaf node
    pub(crate) leaf: bool,
}

impl<V> Node<V> {
    /// Create an empty leaf with capacity for `order - 1` entries.
    pub(crate) fn new_leaf(order: u32) -> Self {
        let cap = order as usize - 1;
        Self {
            keys: Vec::with_capacity(cap),
            values: Vec::with_capacity(cap),
            children: Vec::new(),
            leaf: true,
        }
    }

    /// Create an empty internal node with capacity for `order` children.
    pub(crate) fn new_internal(order: u32) -> Self {
        Self {
            keys: Vec::with_capacity(order as usize - 1),
            values: Vec::new(),
            children: Vec::with_capacity(order as usize),
            leaf: false,
        }
    }

    /// A node is full when it holds `order - 1` keys; inserts split full
    /// nodes before descending into them.
    pub(crate) fn is_full(&self, order: u32) -> bool {
        self.keys.len() == order as usize - 1
    }

    /// Binary search within this node.
    ///
    /// Returns `(index, exact)`. For a leaf, `index` is the key's position
    /// if found, or the insertion position otherwise. For an internal
    /// node, `index` is the child to descend into; on an exact match the
    /// caller must descend to `index + 1`.
    ///
    /// Comparisons are counted when a counter set is supplied; cursor
    /// traversal passes `None` and stays invisible to the stats.
    pub(crate) fn locate(&self, key: Key, counters: Option<&StatCounters>) -> (usize, bool) {
        let mut lo = 0usize;
        let mut hi = self.keys.len();

        while lo < hi {
            let mid = (lo + hi) / 2;
            if let Some(c) = counters {
                c.record_comparison();
            }
            match self.keys[mid].cmp(&key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return (mid, true),
            }
        }

        (lo, false)
    }

    /// Split the full child at `idx`, promoting a separator into `self`.
    ///
    /// Precondition: `self` is internal and not full, and
    /// `self.children[idx]` holds exactly `order - 1` keys.
    ///
    /// A leaf child keeps the lower half; the upper half, median included,
    /// moves to a new right sibling and the median key is *copied* up as
    /// the separator, so the entry itself stays reachable in the sibling.
    /// An internal child keeps keys below the median, the sibling takes
    /// the keys above it, and the median itself *moves* up.
    pub(crate) fn split_child(&mut self, idx: usize, order: u32, counters: &StatCounters) {
        let mid = (order as usize - 1) / 2;
        let child = &mut self.children[idx];

        let (separator, sibling) = if child.leaf {
            let keys = child.keys.split_off(mid);
            let values = child.values.split_off(mid);
            let separator = keys[0];
            let sibling = Node {
                keys,
                values,
                children: Vec::new(),
                leaf: true,
            };
            (separator, sibling)
        } else {
            let keys = child.keys.split_off(mid + 1);
            let children = child.children.split_off(mid + 1);
            // child held order - 1 >= 2 keys, so the median is present
            let separator = child.keys.pop().unwrap();
            let sibling = Node {
                keys,
                values: Vec::new(),
                children,
                leaf: false,
            };
            (separator, sibling)
        };

        self.keys.insert(idx, separator);
        self.children.insert(idx + 1, sibling);
        counters.record_split();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(keys: &[Key]) -> Node<i64> {
        Node {
            keys: keys.to_vec(),
            values: keys.iter().map(|k| k * 10).collect(),
            children: Vec::new(),
            leaf: true,
        }
    }

    #[test]
    fn test_locate_exact_and_insertion_points() {
        let node = leaf_with(&[10, 20, 30]);
        assert_eq!(node.locate(20, None), (1, true));
        assert_eq!(node.locate(10, None), (0, true));
        assert_eq!(node.locate(30, None), (2, true));
        assert_eq!(node.locate(5, None), (0, false));
        assert_eq!(node.locate(25, None), (2, false));
        assert_eq!(node.locate(35, None), (3, false));
    }

    #[test]
    fn test_locate_empty_node() {
        let node: Node<i64> = Node::new_leaf(4);
        assert_eq!(node.locate(7, None), (0, false));
    }

    #[test]
    fn test_locate_counts_comparisons() {
        let node = leaf_with(&[10, 20, 30]);
        let counters = StatCounters::new();
        node.locate(5, Some(&counters));
        let snap = counters.snapshot(1, 0.0);
        assert!(snap.comparisons >= 1);
    }

    #[test]
    fn test_split_leaf_child_copies_separator() {
        let counters = StatCounters::new();
        let mut parent: Node<i64> = Node::new_internal(4);
        parent.children.push(leaf_with(&[1, 2, 3]));

        parent.split_child(0, 4, &counters);

        assert_eq!(parent.keys, vec![2]);
        assert_eq!(parent.children.len(), 2);
        assert_eq!(parent.children[0].keys, vec![1]);
        assert_eq!(parent.children[0].values, vec![10]);
        // the median entry stays in the right sibling
        assert_eq!(parent.children[1].keys, vec![2, 3]);
        assert_eq!(parent.children[1].values, vec![20, 30]);
        assert_eq!(counters.snapshot(1, 0.0).splits, 1);
    }

    #[test]
    fn test_split_internal_child_moves_separator() {
        let counters = StatCounters::new();
        let mut full: Node<i64> = Node::new_internal(4);
        full.keys = vec![10, 20, 30];
        for lo in [1, 11, 21, 31] {
            full.children.push(leaf_with(&[lo]));
        }
        let mut parent: Node<i64> = Node::new_internal(4);
        parent.children.push(full);

        parent.split_child(0, 4, &counters);

        assert_eq!(parent.keys, vec![20]);
        assert_eq!(parent.children[0].keys, vec![10]);
        assert_eq!(parent.children[0].children.len(), 2);
        assert_eq!(parent.children[1].keys, vec![30]);
        assert_eq!(parent.children[1].children.len(), 2);
    }

    #[test]
    fn test_split_into_middle_of_parent() {
        let counters = StatCounters::new();
        let mut parent: Node<i64> = Node::new_internal(4);
        parent.keys = vec![100];
        parent.children.push(leaf_with(&[50, 60, 70]));
        parent.children.push(leaf_with(&[110]));

        parent.split_child(0, 4, &counters);

        assert_eq!(parent.keys, vec![60, 100]);
        assert_eq!(parent.children[1].keys, vec![60, 70]);
        assert_eq!(parent.children[2].keys, vec![110]);
    }
}
