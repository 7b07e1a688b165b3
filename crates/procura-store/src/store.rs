//! # The Procura Store
//!
//! One `ProcuraStore` is constructed per session and passed by handle to
//! every consumer. There is no ambient/global store state.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ProcuraStore (per session)                        │
//! │                                                                         │
//! │  Database ──────────── the authoritative record store                  │
//! │                                                                         │
//! │  Arc<Mutex<Option<Actor>>> ── signed-in operator, required for         │
//! │                               lifecycle mutations                       │
//! │                                                                         │
//! │  Arc<Mutex<Queue>> ───────── local staging queue, persisted to a       │
//! │                              snapshot file, reconciled on open          │
//! │                                                                         │
//! │  Arc<Mutex<Caches>> ──────── read-through caches of products,          │
//! │                              vendors, purchase orders; re-fetched      │
//! │                              after every successful mutation, never    │
//! │                              independently mutated                      │
//! │                                                                         │
//! │  broadcast::Sender<RecordKind> ── change notifications; subscribers    │
//! │                                   re-fetch the affected kind            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! Caches and the queue sit behind `Arc<Mutex<_>>`. Locks are held only
//! for synchronous in-memory updates, never across an await point, so one
//! logical operation's several store calls still present a single atomic
//! step to concurrent readers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::info;

use procura_core::{
    Actor, DownloadLogEntry, Product, ProductPoState, PurchaseOrderItem, Queue, RecordKind, Vendor,
};
use procura_db::Database;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::views::{PurchaseOrderView, QueueItemView, QueueView};

/// Read-through caches of the record store.
///
/// These are projections: every successful mutation re-fetches the
/// affected kind from the database rather than patching these vectors in
/// place, so they can never drift from the store.
#[derive(Debug, Default)]
pub(crate) struct Caches {
    pub(crate) products: Vec<Product>,
    pub(crate) vendors: Vec<Vendor>,
    pub(crate) purchase_orders: Vec<PurchaseOrderView>,
}

/// The session store facade.
///
/// Cloning is cheap; clones share the same session state.
#[derive(Debug, Clone)]
pub struct ProcuraStore {
    pub(crate) db: Database,
    pub(crate) queue_snapshot_path: PathBuf,
    session: Arc<Mutex<Option<Actor>>>,
    pub(crate) queue: Arc<Mutex<Queue>>,
    pub(crate) caches: Arc<Mutex<Caches>>,
    changes: broadcast::Sender<RecordKind>,
}

impl ProcuraStore {
    /// Opens a store session.
    ///
    /// ## What This Does
    /// 1. Fetches all record kinds into the read-through caches
    /// 2. Loads the queue snapshot from disk (missing/corrupt → empty)
    /// 3. Reconciles the snapshot against authoritative `po_status`
    /// 4. Writes the reconciled snapshot back
    pub async fn open(db: Database, config: StoreConfig) -> StoreResult<Self> {
        let (changes, _) = broadcast::channel(config.channel_capacity);

        let store = ProcuraStore {
            db,
            queue_snapshot_path: config.queue_snapshot_path,
            session: Arc::new(Mutex::new(None)),
            queue: Arc::new(Mutex::new(Queue::new())),
            caches: Arc::new(Mutex::new(Caches::default())),
            changes,
        };

        store.refresh_products().await?;
        store.refresh_vendors().await?;
        store.refresh_purchase_orders().await?;
        store.load_and_reconcile_queue().await?;

        info!(
            queue_len = store.lock_queue().len(),
            "Store session opened"
        );

        Ok(store)
    }

    // =========================================================================
    // Session Actor
    // =========================================================================

    /// Signs an operator into this session.
    pub fn sign_in(&self, actor: Actor) {
        info!(actor = %actor.name, "Actor signed in");
        *self.lock_session() = Some(actor);
    }

    /// Signs the current operator out.
    pub fn sign_out(&self) {
        *self.lock_session() = None;
    }

    /// The currently signed-in operator, if any.
    pub fn current_actor(&self) -> Option<Actor> {
        self.lock_session().clone()
    }

    /// Lifecycle mutations need an actor to record; everything else can
    /// run unauthenticated.
    pub(crate) fn require_actor(&self) -> StoreResult<Actor> {
        self.current_actor().ok_or(StoreError::Unauthenticated)
    }

    // =========================================================================
    // Change Notifications
    // =========================================================================

    /// Subscribes to change notifications.
    ///
    /// A received [`RecordKind`] means that kind was mutated and already
    /// re-fetched into the cache; subscribers re-read the accessor they
    /// care about. No deltas are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<RecordKind> {
        self.changes.subscribe()
    }

    pub(crate) fn notify(&self, kind: RecordKind) {
        // No subscribers is fine
        let _ = self.changes.send(kind);
    }

    /// Forces a re-fetch of one record kind.
    ///
    /// Wire the record store's own change feed to this to pick up writes
    /// made by other sessions against the same backend.
    pub async fn refresh(&self, kind: RecordKind) -> StoreResult<()> {
        match kind {
            RecordKind::Products => self.refresh_products().await,
            RecordKind::Vendors => self.refresh_vendors().await,
            RecordKind::PurchaseOrders => self.refresh_purchase_orders().await,
            // The download log is read through directly, nothing cached
            RecordKind::DownloadLog => Ok(()),
        }
    }

    // =========================================================================
    // Cache Refresh (one kind at a time, swapped in a single lock step)
    // =========================================================================

    pub(crate) async fn refresh_products(&self) -> StoreResult<()> {
        let products = self.db.products().list().await?;
        self.lock_caches().products = products;
        Ok(())
    }

    pub(crate) async fn refresh_vendors(&self) -> StoreResult<()> {
        let vendors = self.db.vendors().list().await?;
        self.lock_caches().vendors = vendors;
        Ok(())
    }

    pub(crate) async fn refresh_purchase_orders(&self) -> StoreResult<()> {
        let repo = self.db.purchase_orders();
        let headers = repo.list().await?;

        // Attach items to headers in one pass, keeping insertion order
        let mut by_po: HashMap<String, Vec<PurchaseOrderItem>> = HashMap::new();
        for item in repo.all_items().await? {
            by_po.entry(item.po_id.clone()).or_default().push(item);
        }

        let views = headers
            .into_iter()
            .map(|po| {
                let items = by_po.remove(&po.id).unwrap_or_default();
                PurchaseOrderView {
                    purchase_order: po,
                    items,
                }
            })
            .collect();

        self.lock_caches().purchase_orders = views;
        Ok(())
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    /// Every product, regardless of availability state.
    pub fn products(&self) -> Vec<Product> {
        self.lock_caches().products.clone()
    }

    /// The base product list: queued products live only in the queue view
    /// and are filtered out here.
    pub fn product_list(&self) -> Vec<Product> {
        self.lock_caches()
            .products
            .iter()
            .filter(|p| p.po_status != ProductPoState::Queued)
            .cloned()
            .collect()
    }

    /// Products eligible for queueing (the create-PO picker).
    /// Exactly the products whose selection flag is on.
    pub fn selectable_products(&self) -> Vec<Product> {
        self.lock_caches()
            .products
            .iter()
            .filter(|p| p.include_in_create_po)
            .cloned()
            .collect()
    }

    /// All vendors.
    pub fn vendors(&self) -> Vec<Vendor> {
        self.lock_caches().vendors.clone()
    }

    /// All purchase orders with items and denormalized vendor name.
    pub fn purchase_orders(&self) -> Vec<PurchaseOrderView> {
        self.lock_caches().purchase_orders.clone()
    }

    /// The queue view: staged rows joined with product snapshots.
    pub fn queue_view(&self) -> QueueView {
        let queue = self.lock_queue().clone();
        let caches = self.lock_caches();

        let items = queue
            .entries()
            .iter()
            .map(|entry| {
                let product = caches
                    .products
                    .iter()
                    .find(|p| p.id == entry.product_id);
                let vendor_id = product.and_then(|p| p.vendor_id.clone());
                let vendor_name = vendor_id.as_ref().and_then(|vid| {
                    caches
                        .vendors
                        .iter()
                        .find(|v| &v.id == vid)
                        .map(|v| v.name.clone())
                });

                QueueItemView {
                    product_id: entry.product_id.clone(),
                    display_id: product.and_then(|p| p.display_id.clone()),
                    name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    unit: product.map(|p| p.unit).unwrap_or_default(),
                    vendor_id,
                    vendor_name,
                    quantity: entry.quantity,
                    added_at: entry.added_at,
                }
            })
            .collect();

        QueueView {
            items,
            total_quantity: queue.total_quantity(),
        }
    }

    /// The export audit trail, newest first. Read through directly; the
    /// log is append-only so there is nothing to reconcile.
    pub async fn download_log(&self) -> StoreResult<Vec<DownloadLogEntry>> {
        Ok(self.db.download_log().list().await?)
    }

    // =========================================================================
    // Lock Helpers
    // =========================================================================

    fn lock_session(&self) -> MutexGuard<'_, Option<Actor>> {
        self.session.lock().expect("session mutex poisoned")
    }

    pub(crate) fn lock_queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().expect("queue mutex poisoned")
    }

    pub(crate) fn lock_caches(&self) -> MutexGuard<'_, Caches> {
        self.caches.lock().expect("cache mutex poisoned")
    }
}
