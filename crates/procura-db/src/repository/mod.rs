//! # Repository Module
//!
//! Database repository implementations for Procura.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts record store access behind a         │
//! │  clean API.                                                             │
//! │                                                                         │
//! │  Store operation                                                       │
//! │       │                                                                 │
//! │       │  db.products().set_queued(id, qty)                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── set_queued(&self, id, qty)                                        │
//! │  └── mark_ordered(&self, ids)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database)                                   │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD and availability transitions
//! - [`VendorRepository`] - Vendor CRUD and display id allocation
//! - [`PurchaseOrderRepository`] - PO headers, items, lifecycle guards
//! - [`DownloadLogRepository`] - Append-only export audit trail
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`VendorRepository`]: vendor::VendorRepository
//! [`PurchaseOrderRepository`]: purchase_order::PurchaseOrderRepository
//! [`DownloadLogRepository`]: download_log::DownloadLogRepository

pub mod download_log;
pub mod product;
pub mod purchase_order;
pub mod vendor;
