//! # PO Generator
//!
//! Turns queue entries into purchase orders, one per distinct vendor.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    generate(selection?)                                 │
//! │                                                                         │
//! │  queue: [P1 (qty 3, Acme), P2 (qty 5, Borealis), P3 (qty 2, Acme)]     │
//! │       │                                                                 │
//! │       ▼  1. resolve each entry's product to its vendor                 │
//! │       ▼  2. group by vendor, keeping encounter order                   │
//! │                                                                         │
//! │   ┌───────────────────┐      ┌───────────────────┐                     │
//! │   │ Acme              │      │ Borealis          │                     │
//! │   │  P1 × 3, P3 × 2   │      │  P2 × 5           │                     │
//! │   └───────────────────┘      └───────────────────┘                     │
//! │       │                                                                 │
//! │       ▼  3. scan ALL existing PO numbers for the max, ONCE             │
//! │          next = max + 1 → the call allocates a contiguous block        │
//! │                                                                         │
//! │   PO-0007 (Acme, 2 items)    PO-0008 (Borealis, 1 item)                │
//! │       │                                                                 │
//! │       ▼  4. per vendor group, as its own unit of work:                 │
//! │          insert header+items → mark products ordered → trim queue      │
//! │                                                                         │
//! │  A failure stops generation; groups already committed stay             │
//! │  committed. No cross-vendor transaction.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An entry whose product no longer resolves to a vendor is dropped from
//! the generation (logged, left queued for the operator to fix). An entry
//! whose product was deleted outright is purged from the queue.

use chrono::Utc;
use tracing::{info, warn};

use procura_core::ident::{format_po_number, max_po_sequence};
use procura_core::{
    PoStatus, Product, PurchaseOrder, PurchaseOrderItem, RecordKind, Vendor,
};
use procura_db::repository::purchase_order::{generate_po_id, generate_po_item_id};

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;
use crate::views::PurchaseOrderView;

/// One vendor's slice of the queue.
struct VendorGroup {
    vendor: Vendor,
    lines: Vec<(Product, i64)>,
}

impl ProcuraStore {
    /// Generates purchase orders from the queue.
    ///
    /// With no selection the whole queue is processed; with a selection,
    /// only the named products (the rest stay queued). Returns the created
    /// POs in vendor-encounter order.
    pub async fn generate(
        &self,
        selection: Option<&[String]>,
    ) -> StoreResult<Vec<PurchaseOrderView>> {
        let actor = self.require_actor()?;

        // Resolve the selection to durable ids before touching anything
        let selected_ids: Option<Vec<String>> = match selection {
            Some(refs) => {
                let mut ids = Vec::with_capacity(refs.len());
                for reference in refs {
                    ids.push(self.resolve_product(reference).await?.id);
                }
                Some(ids)
            }
            None => None,
        };

        let entries = {
            let queue = self.lock_queue();
            match &selected_ids {
                Some(ids) => {
                    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                    queue.select(&refs)
                }
                None => queue.entries().to_vec(),
            }
        };

        if entries.is_empty() {
            return Err(StoreError::EmptyQueue);
        }

        // Resolve products fresh (the record store is the source of
        // truth) and group them by vendor in encounter order
        let product_repo = self.db.products();
        let vendor_repo = self.db.vendors();

        let mut groups: Vec<VendorGroup> = Vec::new();
        let mut stale: Vec<String> = Vec::new();

        for entry in &entries {
            let product = match product_repo.get_by_id(&entry.product_id).await? {
                Some(product) => product,
                None => {
                    warn!(product = %entry.product_id, "Queue entry references a deleted product, purging");
                    stale.push(entry.product_id.clone());
                    continue;
                }
            };

            let vendor = match &product.vendor_id {
                Some(vendor_id) => vendor_repo.get_by_id(vendor_id).await?,
                None => None,
            };
            let vendor = match vendor {
                Some(vendor) => vendor,
                None => {
                    // Left queued so the operator can assign a vendor and
                    // regenerate
                    warn!(product = %product.id, name = %product.name, "No vendor resolves for product, dropping from generation");
                    continue;
                }
            };

            match groups.iter_mut().find(|g| g.vendor.id == vendor.id) {
                Some(group) => group.lines.push((product, entry.quantity)),
                None => groups.push(VendorGroup {
                    vendor,
                    lines: vec![(product, entry.quantity)],
                }),
            }
        }

        // One number scan per call: a multi-vendor generation takes a
        // contiguous block
        let numbers = self.db.purchase_orders().numbers().await?;
        let mut next_seq = max_po_sequence(numbers.iter().map(String::as_str)) + 1;

        let po_repo = self.db.purchase_orders();
        let mut created: Vec<PurchaseOrderView> = Vec::new();
        let mut failure: Option<StoreError> = None;

        for group in groups {
            let now = Utc::now();
            let po = PurchaseOrder {
                id: generate_po_id(),
                number: format_po_number(next_seq),
                vendor_id: group.vendor.id.clone(),
                vendor_name: group.vendor.name.clone(),
                status: PoStatus::Created,
                created_by: actor.id.clone(),
                created_by_name: actor.name.clone(),
                decided_by: None,
                decided_by_name: None,
                rejection_reason: None,
                total_items: group.lines.len() as i64,
                created_at: now,
                decided_at: None,
            };

            let items: Vec<PurchaseOrderItem> = group
                .lines
                .iter()
                .map(|(product, quantity)| PurchaseOrderItem {
                    id: generate_po_item_id(),
                    po_id: po.id.clone(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    quantity: *quantity,
                    created_at: now,
                })
                .collect();

            // This vendor group is its own unit of work: header+items,
            // then product transitions, then the queue trim
            if let Err(err) = po_repo.insert(&po, &items).await {
                failure = Some(err.into());
                break;
            }
            next_seq += 1;

            let product_ids: Vec<String> =
                group.lines.iter().map(|(p, _)| p.id.clone()).collect();
            if let Err(err) = product_repo.mark_ordered(&product_ids).await {
                failure = Some(err.into());
                break;
            }

            {
                let mut queue = self.lock_queue();
                for product_id in &product_ids {
                    queue.remove(product_id);
                }
            }

            info!(number = %po.number, vendor = %po.vendor_name, items = items.len(), "Purchase order generated");
            created.push(PurchaseOrderView {
                purchase_order: po,
                items,
            });
        }

        // Purge entries whose product no longer exists
        if !stale.is_empty() {
            let mut queue = self.lock_queue();
            for product_id in &stale {
                queue.remove(product_id);
            }
        }

        self.persist_queue();
        self.refresh_products().await?;
        self.refresh_purchase_orders().await?;
        self.notify(RecordKind::Products);
        self.notify(RecordKind::PurchaseOrders);

        // Groups committed before a failure stay committed
        if let Some(err) = failure {
            return Err(err);
        }

        Ok(created)
    }
}
