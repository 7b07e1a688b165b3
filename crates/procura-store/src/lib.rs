//! # procura-store: Session Store Facade for Procura
//!
//! The one canonical data-store module for the PO management system.
//! Every consumer (UI, export layer, change feed) talks to a
//! [`ProcuraStore`] handle; nothing else holds state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Procura Store Layer                              │
//! │                                                                         │
//! │  UI / Export Layer                                                     │
//! │       │                                                                 │
//! │       │  store.add_to_queue("P0001", 3)                                │
//! │       │  store.generate(None)                                          │
//! │       │  store.approve("PO-0007")                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  procura-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  store.rs      the session store object (DI, caches, actor)    │   │
//! │  │  resolve.rs    durable-or-display id resolution                 │   │
//! │  │  queue.rs      staging queue + snapshot + reconciliation       │   │
//! │  │  generate.rs   vendor grouping + contiguous PO numbering       │   │
//! │  │  lifecycle.rs  approve / reject / delete / download log        │   │
//! │  │  products.rs   product CRUD                                     │   │
//! │  │  vendors.rs    vendor CRUD + batch import                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  procura-db (repositories over the authoritative record store)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//!
//! - The record store is the single source of truth. The queue snapshot
//!   and in-memory caches are reconciled, invalidatable projections.
//! - Every successful mutation re-fetches the affected record kind and
//!   publishes it on the change channel; caches are never patched by
//!   hand.
//! - Availability flags: `include_in_create_po == (po_status ==
//!   available)` after every operation here, because both columns move in
//!   the same guarded UPDATE.
//!
//! ## Example
//!
//! ```rust,ignore
//! use procura_core::Actor;
//! use procura_db::{Database, DbConfig};
//! use procura_store::{NewVendor, NewProduct, ProcuraStore, StoreConfig};
//!
//! let db = Database::new(DbConfig::new("./procura.db")).await?;
//! let store = ProcuraStore::open(db, StoreConfig::in_dir("./data")).await?;
//! store.sign_in(Actor::new("u1", "Pat"));
//!
//! let vendor = store.add_vendor(NewVendor::named("Acme")).await?;
//! let product = store
//!     .add_product(NewProduct::named("Widget").vendor(&vendor.id))
//!     .await?;
//!
//! store.add_to_queue(&product.id, 3).await?;
//! let created = store.generate(None).await?;
//! store.approve(&created[0].purchase_order.number).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
mod generate;
mod lifecycle;
mod products;
mod queue;
mod resolve;
mod store;
mod vendors;
pub mod views;

#[cfg(test)]
mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{StoreConfig, QUEUE_SNAPSHOT_FILE};
pub use error::{StoreError, StoreResult};
pub use store::ProcuraStore;
pub use views::{
    BatchAddReport, BulkDecisionReport, ImportReport, NewProduct, NewVendor, PurchaseOrderView,
    QueueItemView, QueueView,
};
