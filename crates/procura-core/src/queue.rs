//! # PO Queue
//!
//! The in-memory staging queue: products and quantities picked for the
//! next purchase order generation.
//!
//! ## Queue Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Queue Operations                                     │
//! │                                                                         │
//! │  UI Action               Store Entry Point        Queue Change          │
//! │  ─────────               ─────────────────        ────────────          │
//! │                                                                         │
//! │  Pick Product ──────────► add_to_queue() ───────► add(entry)           │
//! │                                                                         │
//! │  Pick Several ──────────► add_batch() ──────────► add(entry) × n       │
//! │                                                                         │
//! │  Remove Row ────────────► remove_from_queue() ──► remove(id)           │
//! │                                                                         │
//! │  Clear ─────────────────► clear_queue() ────────► take_all()           │
//! │                                                                         │
//! │  Generate POs ──────────► generate() ───────────► select(ids) + trim   │
//! │                                                                         │
//! │  The queue itself is pure state; availability transitions and          │
//! │  persistence live in procura-store.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one entry per product id; a duplicate add is a no-op that
//!   leaves the original quantity unchanged
//! - Entry order is insertion order; generation groups preserve it

use serde::{Deserialize, Serialize};

use crate::types::QueueEntry;

/// The PO staging queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Queue {
    entries: Vec<QueueEntry>,
}

impl Queue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Queue {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a queue from a persisted snapshot.
    ///
    /// Later duplicates of the same product are discarded so the
    /// uniqueness invariant holds even over a hand-edited snapshot file.
    pub fn from_entries(entries: Vec<QueueEntry>) -> Self {
        let mut queue = Queue::new();
        for entry in entries {
            queue.add(entry);
        }
        queue
    }

    /// Adds an entry to the queue.
    ///
    /// Returns `true` if the entry was inserted, `false` if the product
    /// was already queued (no-op, original quantity kept).
    pub fn add(&mut self, entry: QueueEntry) -> bool {
        if self.contains(&entry.product_id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Removes and returns the entry for a product, if present.
    pub fn remove(&mut self, product_id: &str) -> Option<QueueEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.product_id == product_id)?;
        Some(self.entries.remove(idx))
    }

    /// Drains every entry, leaving the queue empty.
    pub fn take_all(&mut self) -> Vec<QueueEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Keeps only entries the predicate accepts.
    /// Used by snapshot reconciliation to drop stale rows.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&QueueEntry) -> bool,
    {
        self.entries.retain(f);
    }

    /// True if the product is already queued.
    pub fn contains(&self, product_id: &str) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    /// Returns the entry for a product, if queued.
    pub fn get(&self, product_id: &str) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// The selected subset of entries, in queue order.
    ///
    /// Selection ids not present in the queue are ignored; generation
    /// treats an all-misses selection the same as an empty queue.
    pub fn select(&self, product_ids: &[&str]) -> Vec<QueueEntry> {
        self.entries
            .iter()
            .filter(|e| product_ids.contains(&e.product_id.as_str()))
            .cloned()
            .collect()
    }

    /// Number of queued products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of requested quantities (for the queue view header).
    pub fn total_quantity(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(product_id: &str, quantity: i64) -> QueueEntry {
        QueueEntry {
            product_id: product_id.to_string(),
            quantity,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut queue = Queue::new();

        assert!(queue.add(entry("p1", 3)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get("p1").map(|e| e.quantity), Some(3));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut queue = Queue::new();

        assert!(queue.add(entry("p1", 3)));
        assert!(!queue.add(entry("p1", 9)));

        // Original quantity unchanged, still a single entry
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get("p1").map(|e| e.quantity), Some(3));
    }

    #[test]
    fn test_remove() {
        let mut queue = Queue::new();
        queue.add(entry("p1", 3));
        queue.add(entry("p2", 5));

        let removed = queue.remove("p1");
        assert_eq!(removed.map(|e| e.quantity), Some(3));
        assert_eq!(queue.len(), 1);

        assert!(queue.remove("p1").is_none());
    }

    #[test]
    fn test_take_all() {
        let mut queue = Queue::new();
        queue.add(entry("p1", 3));
        queue.add(entry("p2", 5));

        let drained = queue.take_all();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_select_preserves_queue_order() {
        let mut queue = Queue::new();
        queue.add(entry("p1", 1));
        queue.add(entry("p2", 2));
        queue.add(entry("p3", 3));

        // Selection order doesn't matter; queue order wins
        let selected = queue.select(&["p3", "p1"]);
        let ids: Vec<_> = selected.iter().map(|e| e.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);

        // Unknown ids are ignored
        assert!(queue.select(&["nope"]).is_empty());
    }

    #[test]
    fn test_from_entries_dedupes() {
        let queue = Queue::from_entries(vec![entry("p1", 3), entry("p1", 7), entry("p2", 2)]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get("p1").map(|e| e.quantity), Some(3));
    }

    #[test]
    fn test_total_quantity() {
        let mut queue = Queue::new();
        queue.add(entry("p1", 3));
        queue.add(entry("p2", 5));
        assert_eq!(queue.total_quantity(), 8);
    }
}
