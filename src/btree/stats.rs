//! Operation statistics for the B-tree.
//!
//! The tree owns a set of live counters that are bumped as operations run.
//! `TreeStats` is a point-in-time snapshot suitable for printing or
//! comparing; its `height` and `avg_fill_factor` fields are recomputed by
//! the tree on every snapshot rather than maintained incrementally.

use std::cell::Cell;
use std::fmt;

/// Live counters owned by the tree.
///
/// Counters use `Cell` so read-only operations like `search` can record
/// metrics through a shared reference. The tree is single-threaded by
/// construction; shared access across threads goes through the `Index`
/// handle's lock.
///
/// The collection toggle gates the per-operation counters (comparisons,
/// node visits, op counts) but not the structural ones (node count, key
/// count, splits), which must stay accurate for `len` and reporting.
#[derive(Debug)]
pub(crate) struct StatCounters {
    enabled: Cell<bool>,
    node_count: Cell<u64>,
    key_count: Cell<u64>,
    comparisons: Cell<u64>,
    node_visits: Cell<u64>,
    splits: Cell<u64>,
    search_ops: Cell<u64>,
    insert_ops: Cell<u64>,
    delete_ops: Cell<u64>,
}

impl StatCounters {
    /// New counter set for a freshly created tree (one empty leaf).
    pub(crate) fn new() -> Self {
        Self {
            enabled: Cell::new(true),
            node_count: Cell::new(1),
            key_count: Cell::new(0),
            comparisons: Cell::new(0),
            node_visits: Cell::new(0),
            splits: Cell::new(0),
            search_ops: Cell::new(0),
            insert_ops: Cell::new(0),
            delete_ops: Cell::new(0),
        }
    }

    fn bump(cell: &Cell<u64>) {
        cell.set(cell.get() + 1);
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub(crate) fn record_comparison(&self) {
        if self.enabled.get() {
            Self::bump(&self.comparisons);
        }
    }

    pub(crate) fn record_visit(&self) {
        if self.enabled.get() {
            Self::bump(&self.node_visits);
        }
    }

    pub(crate) fn record_search(&self) {
        if self.enabled.get() {
            Self::bump(&self.search_ops);
        }
    }

    pub(crate) fn record_insert(&self) {
        if self.enabled.get() {
            Self::bump(&self.insert_ops);
        }
    }

    pub(crate) fn record_delete(&self) {
        if self.enabled.get() {
            Self::bump(&self.delete_ops);
        }
    }

    /// A split always allocates one sibling node.
    pub(crate) fn record_split(&self) {
        Self::bump(&self.splits);
        Self::bump(&self.node_count);
    }

    pub(crate) fn add_node(&self) {
        Self::bump(&self.node_count);
    }

    pub(crate) fn add_key(&self) {
        Self::bump(&self.key_count);
    }

    pub(crate) fn remove_key(&self) {
        self.key_count.set(self.key_count.get().saturating_sub(1));
    }

    pub(crate) fn key_count(&self) -> u64 {
        self.key_count.get()
    }

    /// Zero the operation counters, preserving the structural counts and
    /// the collection toggle.
    pub(crate) fn reset(&self) {
        self.comparisons.set(0);
        self.node_visits.set(0);
        self.splits.set(0);
        self.search_ops.set(0);
        self.insert_ops.set(0);
        self.delete_ops.set(0);
    }

    /// Full reset after `clear`: back to a single empty leaf.
    pub(crate) fn clear(&self) {
        self.reset();
        self.node_count.set(1);
        self.key_count.set(0);
    }

    pub(crate) fn snapshot(&self, height: u32, avg_fill_factor: f64) -> TreeStats {
        TreeStats {
            node_count: self.node_count.get(),
            key_count: self.key_count.get(),
            height,
            comparisons: self.comparisons.get(),
            node_visits: self.node_visits.get(),
            splits: self.splits.get(),
            search_ops: self.search_ops.get(),
            insert_ops: self.insert_ops.get(),
            delete_ops: self.delete_ops.get(),
            avg_fill_factor,
        }
    }
}

/// A point-in-time snapshot of tree statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeStats {
    /// Total number of nodes
    pub node_count: u64,
    /// Total number of keys
    pub key_count: u64,
    /// Tree height, recomputed per snapshot
    pub height: u32,
    /// Key comparisons performed
    pub comparisons: u64,
    /// Node visits (the in-memory analogue of page reads)
    pub node_visits: u64,
    /// Node splits performed
    pub splits: u64,
    /// Total search operations
    pub search_ops: u64,
    /// Total insert operations
    pub insert_ops: u64,
    /// Total delete operations
    pub delete_ops: u64,
    /// Used key slots over total key capacity, recomputed per snapshot
    pub avg_fill_factor: f64,
}

impl TreeStats {
    /// Average comparisons per search, or 0.0 if no searches have run.
    pub fn comparisons_per_search(&self) -> f64 {
        if self.search_ops == 0 {
            0.0
        } else {
            self.comparisons as f64 / self.search_ops as f64
        }
    }

    /// Average node visits per search, or 0.0 if no searches have run.
    pub fn visits_per_search(&self) -> f64 {
        if self.search_ops == 0 {
            0.0
        } else {
            self.node_visits as f64 / self.search_ops as f64
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:           {}", self.node_count)?;
        writeln!(f, "keys:            {}", self.key_count)?;
        writeln!(f, "height:          {}", self.height)?;
        writeln!(f, "fill factor:     {:.2}%", self.avg_fill_factor * 100.0)?;
        writeln!(f, "searches:        {}", self.search_ops)?;
        writeln!(f, "inserts:         {}", self.insert_ops)?;
        writeln!(f, "deletes:         {}", self.delete_ops)?;
        writeln!(f, "comparisons:     {}", self.comparisons)?;
        writeln!(f, "node visits:     {}", self.node_visits)?;
        write!(f, "splits:          {}", self.splits)?;
        if self.search_ops > 0 {
            write!(
                f,
                "\navg cmp/search:  {:.2}\navg visits/search: {:.2}",
                self.comparisons_per_search(),
                self.visits_per_search()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_one_node() {
        let c = StatCounters::new();
        let snap = c.snapshot(1, 0.0);
        assert_eq!(snap.node_count, 1);
        assert_eq!(snap.key_count, 0);
        assert_eq!(snap.search_ops, 0);
    }

    #[test]
    fn test_reset_preserves_structural_counts() {
        let c = StatCounters::new();
        c.add_key();
        c.add_key();
        c.record_split();
        c.record_search();
        c.record_comparison();

        c.reset();

        let snap = c.snapshot(1, 0.0);
        assert_eq!(snap.key_count, 2);
        assert_eq!(snap.node_count, 2);
        assert_eq!(snap.splits, 0);
        assert_eq!(snap.search_ops, 0);
        assert_eq!(snap.comparisons, 0);
    }

    #[test]
    fn test_disabled_collection_gates_op_counters() {
        let c = StatCounters::new();
        c.set_enabled(false);
        c.record_search();
        c.record_comparison();
        c.record_visit();
        c.record_split();
        c.add_key();

        let snap = c.snapshot(1, 0.0);
        assert_eq!(snap.search_ops, 0);
        assert_eq!(snap.comparisons, 0);
        assert_eq!(snap.node_visits, 0);
        // structural counters are never gated
        assert_eq!(snap.splits, 1);
        assert_eq!(snap.key_count, 1);
    }

    #[test]
    fn test_per_search_averages() {
        let c = StatCounters::new();
        c.record_search();
        c.record_search();
        for _ in 0..6 {
            c.record_comparison();
        }
        let snap = c.snapshot(1, 0.0);
        assert_eq!(snap.comparisons_per_search(), 3.0);
    }

    #[test]
    fn test_display_reports_counts() {
        let c = StatCounters::new();
        c.add_key();
        let text = c.snapshot(1, 0.5).to_string();
        assert!(text.contains("keys:            1"));
        assert!(text.contains("50.00%"));
    }
}
