//! # Queue Operations
//!
//! Staging products for PO generation, with snapshot persistence and
//! load-time reconciliation.
//!
//! ## Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Queue Snapshot vs. Record Store                            │
//! │                                                                         │
//! │  The record store's po_status column is authoritative. The local       │
//! │  snapshot file only remembers quantities and ordering between          │
//! │  sessions:                                                              │
//! │                                                                         │
//! │  on open:                                                               │
//! │    snapshot entry, product no longer 'queued'  → DROPPED               │
//! │    product 'queued', missing from snapshot     → RE-INSERTED           │
//! │                                                  (with its stored      │
//! │                                                   po_quantity)         │
//! │                                                                         │
//! │  Snapshot write failures are logged and never fail the operation:      │
//! │  losing the file costs ordering, not correctness, because the next     │
//! │  open rebuilds from po_status.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! A batch add issues its record store calls sequentially, then updates
//! the in-memory queue in one lock step. Readers never observe a
//! half-applied batch. If a call fails mid-batch, the entries already
//! committed to the store are applied locally before the error
//! propagates; nothing is rolled back.

use chrono::Utc;
use tracing::{debug, info, warn};

use procura_core::validation::{validate_quantity, validate_reference};
use procura_core::{ProductPoState, QueueEntry};

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;
use crate::views::BatchAddReport;

impl ProcuraStore {
    // =========================================================================
    // Mutations
    // =========================================================================

    /// Stages a product for PO generation.
    ///
    /// Returns `true` if the product was newly queued, `false` for the
    /// idempotent no-op cases (already queued, already ordered). Duplicate
    /// UI triggers therefore never error and never change the original
    /// quantity.
    pub async fn add_to_queue(&self, product_ref: &str, quantity: i64) -> StoreResult<bool> {
        validate_quantity(quantity)?;

        let product = self.resolve_product(product_ref).await?;

        if self.lock_queue().contains(&product.id) {
            debug!(product = %product.id, "Already queued, ignoring duplicate add");
            return Ok(false);
        }

        // Guarded transition: only an 'available' product moves
        if !self.db.products().set_queued(&product.id, quantity).await? {
            debug!(product = %product.id, state = ?product.po_status, "Not available, ignoring add");
            return Ok(false);
        }

        self.lock_queue().add(QueueEntry {
            product_id: product.id.clone(),
            quantity,
            added_at: Utc::now(),
        });
        self.persist_queue();

        self.refresh_products().await?;
        self.notify(procura_core::RecordKind::Products);

        Ok(true)
    }

    /// Stages several products at once.
    ///
    /// Already-queued and non-available products are skipped, not errors;
    /// the report carries the counts. All quantities are validated and all
    /// references resolved before the first store call.
    pub async fn add_batch(&self, items: &[(String, i64)]) -> StoreResult<BatchAddReport> {
        // Fail fast: no side effects until the whole batch validates
        for (_, quantity) in items {
            validate_quantity(*quantity)?;
        }

        let mut candidates = Vec::new();
        for (product_ref, quantity) in items {
            let product = self.resolve_product(product_ref).await?;
            candidates.push((product, *quantity));
        }

        let mut skipped = 0usize;
        let mut to_queue: Vec<(String, i64)> = Vec::new();
        {
            let queue = self.lock_queue();
            for (product, quantity) in &candidates {
                let duplicate_in_batch = to_queue.iter().any(|(id, _)| id == &product.id);
                if queue.contains(&product.id)
                    || duplicate_in_batch
                    || product.po_status != ProductPoState::Available
                {
                    skipped += 1;
                } else {
                    to_queue.push((product.id.clone(), *quantity));
                }
            }
        }

        // Store calls run sequentially; staged entries are applied to the
        // in-memory queue in one step afterwards
        let mut staged: Vec<QueueEntry> = Vec::new();
        let mut failure: Option<StoreError> = None;
        for (product_id, quantity) in &to_queue {
            match self.db.products().set_queued(product_id, *quantity).await {
                Ok(true) => staged.push(QueueEntry {
                    product_id: product_id.clone(),
                    quantity: *quantity,
                    added_at: Utc::now(),
                }),
                // Lost a race against another session; treat as skipped
                Ok(false) => skipped += 1,
                Err(err) => {
                    failure = Some(err.into());
                    break;
                }
            }
        }

        let added = staged.len();
        if !staged.is_empty() {
            let mut queue = self.lock_queue();
            for entry in staged {
                queue.add(entry);
            }
        }
        self.persist_queue();

        self.refresh_products().await?;
        self.notify(procura_core::RecordKind::Products);

        // Entries committed before the failure stay committed
        if let Some(err) = failure {
            return Err(err);
        }

        Ok(BatchAddReport { added, skipped })
    }

    /// Removes a product from the queue, returning it to `available`.
    ///
    /// Idempotent: removing something that isn't queued is a no-op
    /// (`false`). A queue entry whose product has been deleted from the
    /// record store is dropped locally.
    pub async fn remove_from_queue(&self, product_ref: &str) -> StoreResult<bool> {
        validate_reference("product", product_ref)?;

        let product = match self.resolve_product(product_ref).await {
            Ok(product) => product,
            Err(StoreError::NotFound { .. }) => {
                // Stale entry: product gone, snapshot row left behind
                let removed = self.lock_queue().remove(product_ref).is_some();
                if removed {
                    warn!(reference = %product_ref, "Dropped queue entry for deleted product");
                    self.persist_queue();
                }
                return Ok(removed);
            }
            Err(err) => return Err(err),
        };

        let transitioned = self.db.products().set_available(&product.id).await?;
        let removed = self.lock_queue().remove(&product.id).is_some();

        if !transitioned && !removed {
            return Ok(false);
        }

        self.persist_queue();
        self.refresh_products().await?;
        self.notify(procura_core::RecordKind::Products);

        Ok(true)
    }

    /// Dequeues every staged product. Returns how many entries were
    /// cleared.
    pub async fn clear_queue(&self) -> StoreResult<usize> {
        let entries = self.lock_queue().entries().to_vec();
        if entries.is_empty() {
            return Ok(0);
        }

        let mut dequeued: Vec<String> = Vec::new();
        let mut failure: Option<StoreError> = None;
        for entry in &entries {
            match self.db.products().set_available(&entry.product_id).await {
                Ok(_) => dequeued.push(entry.product_id.clone()),
                Err(err) => {
                    failure = Some(err.into());
                    break;
                }
            }
        }

        {
            let mut queue = self.lock_queue();
            for product_id in &dequeued {
                queue.remove(product_id);
            }
        }
        self.persist_queue();

        self.refresh_products().await?;
        self.notify(procura_core::RecordKind::Products);

        if let Some(err) = failure {
            return Err(err);
        }

        Ok(dequeued.len())
    }

    // =========================================================================
    // Snapshot Persistence & Reconciliation
    // =========================================================================

    /// Loads the queue snapshot and reconciles it against the
    /// authoritative `po_status` of each product. Called once from
    /// [`ProcuraStore::open`](crate::ProcuraStore::open).
    pub(crate) async fn load_and_reconcile_queue(&self) -> StoreResult<()> {
        let snapshot = self.read_snapshot();

        // Read the authoritative state, not the cache
        let queued_products = self
            .db
            .products()
            .list_by_state(ProductPoState::Queued)
            .await?;

        let mut queue = procura_core::Queue::new();
        let mut dropped = 0usize;

        // Keep snapshot rows whose product is still queued
        for entry in snapshot {
            if queued_products.iter().any(|p| p.id == entry.product_id) {
                queue.add(entry);
            } else {
                dropped += 1;
            }
        }

        // Re-insert queued products the snapshot lost, with their stored
        // requested quantity
        let mut reinserted = 0usize;
        for product in &queued_products {
            if queue.add(QueueEntry {
                product_id: product.id.clone(),
                quantity: product.po_quantity,
                added_at: Utc::now(),
            }) {
                reinserted += 1;
            }
        }

        *self.lock_queue() = queue;
        self.persist_queue();

        if dropped > 0 || reinserted > 0 {
            info!(dropped, reinserted, "Queue snapshot reconciled");
        }

        Ok(())
    }

    fn read_snapshot(&self) -> Vec<QueueEntry> {
        let path = &self.queue_snapshot_path;
        match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Corrupt queue snapshot, starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Unreadable queue snapshot, starting empty");
                Vec::new()
            }
        }
    }

    /// Writes the queue snapshot. Failures are logged, never propagated:
    /// the next open rebuilds the queue from `po_status` anyway.
    pub(crate) fn persist_queue(&self) {
        let entries = self.lock_queue().entries().to_vec();
        let path = &self.queue_snapshot_path;

        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(path = %path.display(), error = %err, "Could not create snapshot directory");
                return;
            }
        }

        match serde_json::to_vec_pretty(&entries) {
            Ok(bytes) => {
                if let Err(err) = std::fs::write(path, bytes) {
                    warn!(path = %path.display(), error = %err, "Could not write queue snapshot");
                }
            }
            Err(err) => {
                warn!(error = %err, "Could not serialize queue snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{open_test_store, reopen_store, seed_product, seed_vendor};
    use crate::StoreError;
    use procura_core::ProductPoState;

    #[tokio::test]
    async fn test_add_validates_before_any_side_effect() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        let err = store.add_to_queue(&product.id, 0).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Queue unchanged, product still available
        assert!(store.queue_view().items.is_empty());
        let fresh = store.resolve_product(&product.id).await.unwrap();
        assert_eq!(fresh.po_status, ProductPoState::Available);
        assert!(fresh.include_in_create_po);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_idempotent() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        assert!(store.add_to_queue(&product.id, 3).await.unwrap());
        assert!(!store.add_to_queue(&product.id, 9).await.unwrap());

        let view = store.queue_view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 3);

        // Selection flag cleared exactly once
        let fresh = store.resolve_product(&product.id).await.unwrap();
        assert_eq!(fresh.po_status, ProductPoState::Queued);
        assert!(!fresh.include_in_create_po);
    }

    #[tokio::test]
    async fn test_queued_products_leave_base_list() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        store.add_to_queue(&product.id, 2).await.unwrap();

        assert!(store.product_list().iter().all(|p| p.id != product.id));
        assert!(store
            .selectable_products()
            .iter()
            .all(|p| p.id != product.id));
        assert_eq!(store.queue_view().items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_batch_reports_and_skips() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let a = seed_product(&store, "A", Some(&vendor.id)).await;
        let b = seed_product(&store, "B", Some(&vendor.id)).await;
        let c = seed_product(&store, "C", Some(&vendor.id)).await;

        // a is already queued; c appears twice in the batch
        store.add_to_queue(&a.id, 1).await.unwrap();

        let report = store
            .add_batch(&[
                (a.id.clone(), 5),
                (b.id.clone(), 2),
                (c.id.clone(), 3),
                (c.id.clone(), 7),
            ])
            .await
            .unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 2);

        let view = store.queue_view();
        assert_eq!(view.items.len(), 3);
        // a's original quantity survived the duplicate add
        assert_eq!(
            view.items
                .iter()
                .find(|i| i.product_id == a.id)
                .map(|i| i.quantity),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_add_batch_validates_everything_first() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let a = seed_product(&store, "A", Some(&vendor.id)).await;

        let err = store
            .add_batch(&[(a.id.clone(), 2), (a.id.clone(), -1)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Nothing was queued
        assert!(store.queue_view().items.is_empty());
        let fresh = store.resolve_product(&a.id).await.unwrap();
        assert_eq!(fresh.po_status, ProductPoState::Available);
    }

    #[tokio::test]
    async fn test_remove_restores_availability() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        store.add_to_queue(&product.id, 2).await.unwrap();
        assert!(store.remove_from_queue(&product.id).await.unwrap());

        let fresh = store.resolve_product(&product.id).await.unwrap();
        assert_eq!(fresh.po_status, ProductPoState::Available);
        assert!(fresh.include_in_create_po);

        // Second remove is a no-op
        assert!(!store.remove_from_queue(&product.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_queue() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let a = seed_product(&store, "A", Some(&vendor.id)).await;
        let b = seed_product(&store, "B", Some(&vendor.id)).await;

        store.add_to_queue(&a.id, 1).await.unwrap();
        store.add_to_queue(&b.id, 2).await.unwrap();

        assert_eq!(store.clear_queue().await.unwrap(), 2);
        assert!(store.queue_view().items.is_empty());

        for id in [&a.id, &b.id] {
            let fresh = store.resolve_product(id).await.unwrap();
            assert_eq!(fresh.po_status, ProductPoState::Available);
            assert!(fresh.include_in_create_po);
        }
    }

    #[tokio::test]
    async fn test_queue_survives_restart() {
        let (store, dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        store.add_to_queue(&product.id, 4).await.unwrap();

        let reopened = reopen_store(&store, &dir).await;
        let view = reopened.queue_view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_reconcile_reinserts_queued_product_missing_from_snapshot() {
        let (store, dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        store.add_to_queue(&product.id, 4).await.unwrap();

        // Lose the snapshot file; po_status stays authoritative
        std::fs::remove_file(&store.queue_snapshot_path).unwrap();

        let reopened = reopen_store(&store, &dir).await;
        let view = reopened.queue_view();
        assert_eq!(view.items.len(), 1);
        // Quantity comes from the product's stored requested quantity,
        // which queueing set to 4
        assert_eq!(view.items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_reconcile_drops_entries_for_unqueued_products() {
        let (store, dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = seed_product(&store, "Widget", Some(&vendor.id)).await;

        store.add_to_queue(&product.id, 4).await.unwrap();

        // Another session dequeues the product behind this store's back
        store.db.products().set_available(&product.id).await.unwrap();

        let reopened = reopen_store(&store, &dir).await;
        assert!(reopened.queue_view().items.is_empty());
    }
}
