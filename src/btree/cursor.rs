//! B-tree cursor for ordered traversal.
//!
//! The cursor maintains a stack of (node, position) pairs from the root
//! to the leaf it currently points at, so stepping to a neighboring entry
//! does not re-walk the tree from the root. Positions in internal nodes
//! are child indices; the position in the leaf at the top of the stack is
//! the entry index.
//!
//! The cursor borrows the tree immutably, so the borrow checker rejects
//! any mutation of the tree while a cursor is live. (The reference design
//! documented mutation-during-iteration as undefined behavior; here it is
//! a compile error instead.)

use crate::btree::node::Node;
use crate::error::{BTreeError, Result};
use crate::types::{Key, MAX_DEPTH};

/// A cursor over the entries of a `BTree`, in key order.
///
/// Freshly created cursors are unpositioned; call `first`, `last`, or
/// `seek` before reading. Movement operations return `true` while the
/// cursor lands on a valid entry and `false` once it falls off either
/// end, after which the cursor stays invalid until repositioned.
pub struct Cursor<'a, V> {
    root: &'a Node<V>,
    /// Stack of (node, position) from root to the current leaf
    path: Vec<(&'a Node<V>, usize)>,
    /// Whether the cursor points at a valid entry
    valid: bool,
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(root: &'a Node<V>) -> Self {
        Self {
            root,
            path: Vec::with_capacity(MAX_DEPTH),
            valid: false,
        }
    }

    /// Whether the cursor points at a valid entry.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Position at the first (smallest) entry. Returns false on an empty
    /// tree.
    pub fn first(&mut self) -> bool {
        self.path.clear();
        self.valid = self.descend_first(self.root);
        self.valid
    }

    /// Position at the last (largest) entry. Returns false on an empty
    /// tree.
    pub fn last(&mut self) -> bool {
        self.path.clear();
        self.valid = self.descend_last(self.root);
        self.valid
    }

    /// Advance to the next entry in key order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if !self.valid {
            return false;
        }
        loop {
            let Some(&(node, pos)) = self.path.last() else {
                self.valid = false;
                return false;
            };
            if node.leaf {
                if pos + 1 < node.keys.len() {
                    self.set_top(pos + 1);
                    return true;
                }
                self.path.pop();
            } else if pos + 1 <= node.keys.len() {
                // descend into the next child's leftmost leaf
                self.set_top(pos + 1);
                self.descend_first(&node.children[pos + 1]);
                return true;
            } else {
                self.path.pop();
            }
        }
    }

    /// Step back to the previous entry in key order. Mirror of `next`.
    pub fn prev(&mut self) -> bool {
        if !self.valid {
            return false;
        }
        loop {
            let Some(&(node, pos)) = self.path.last() else {
                self.valid = false;
                return false;
            };
            if node.leaf {
                if pos > 0 {
                    self.set_top(pos - 1);
                    return true;
                }
                self.path.pop();
            } else if pos > 0 {
                self.set_top(pos - 1);
                self.descend_last(&node.children[pos - 1]);
                return true;
            } else {
                self.path.pop();
            }
        }
    }

    /// Position at the first entry with key >= `key`, or invalidate if no
    /// such entry exists.
    pub fn seek(&mut self, key: Key) -> bool {
        self.path.clear();
        let mut node = self.root;
        loop {
            let (pos, found) = node.locate(key, None);
            if node.leaf {
                if pos < node.keys.len() {
                    self.path.push((node, pos));
                    self.valid = true;
                } else if node.keys.is_empty() {
                    self.path.push((node, 0));
                    self.valid = false;
                } else {
                    // past the last entry of this leaf; step to the
                    // in-order successor
                    self.path.push((node, node.keys.len() - 1));
                    self.valid = true;
                    return self.next();
                }
                return self.valid;
            }
            let pos = if found { pos + 1 } else { pos };
            self.path.push((node, pos));
            node = &node.children[pos];
        }
    }

    /// The (key, value) pair at the current position.
    ///
    /// Errors with [`BTreeError::CursorInvalid`] if the cursor is not
    /// positioned at a valid entry.
    pub fn entry(&self) -> Result<(Key, &'a V)> {
        if !self.valid {
            return Err(BTreeError::CursorInvalid);
        }
        let &(node, pos) = self.path.last().ok_or(BTreeError::CursorInvalid)?;
        if pos >= node.keys.len() {
            return Err(BTreeError::CursorInvalid);
        }
        Ok((node.keys[pos], &node.values[pos]))
    }

    /// The key at the current position.
    pub fn key(&self) -> Result<Key> {
        self.entry().map(|(key, _)| key)
    }

    fn set_top(&mut self, pos: usize) {
        if let Some(top) = self.path.last_mut() {
            top.1 = pos;
        }
    }

    /// Push the leftmost path from `node` down to a leaf. Returns false
    /// only if that leaf is empty (possible for the root leaf alone).
    fn descend_first(&mut self, mut node: &'a Node<V>) -> bool {
        loop {
            self.path.push((node, 0));
            if node.leaf {
                return !node.keys.is_empty();
            }
            node = &node.children[0];
        }
    }

    /// Push the rightmost path from `node` down to a leaf, positioned at
    /// its last key.
    fn descend_last(&mut self, mut node: &'a Node<V>) -> bool {
        loop {
            if node.leaf {
                if node.keys.is_empty() {
                    self.path.push((node, 0));
                    return false;
                }
                self.path.push((node, node.keys.len() - 1));
                return true;
            }
            self.path.push((node, node.keys.len()));
            node = &node.children[node.keys.len()];
        }
    }
}

/// Iterator over all entries in ascending key order, built on `Cursor`.
pub struct Iter<'a, V> {
    cursor: Cursor<'a, V>,
    started: bool,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(cursor: Cursor<'a, V>) -> Self {
        Self {
            cursor,
            started: false,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let moved = if self.started {
            self.cursor.next()
        } else {
            self.started = true;
            self.cursor.first()
        };
        if moved {
            self.cursor.entry().ok()
        } else {
            None
        }
    }
}
