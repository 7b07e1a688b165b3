//! # procura-core: Pure Business Logic for Procura
//!
//! This crate is the **heart** of Procura. It contains all business logic
//! as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Procura Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  UI / Export Layer (external)                   │   │
//! │  │    Product list ──► Queue view ──► PO list ──► Download        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 procura-store (session facade)                  │   │
//! │  │    add_to_queue, generate, approve, reject, log_download       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ procura-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   queue   │  │   ident   │  │ validation│  │   │
//! │  │   │  Product  │  │   Queue   │  │  PO-####  │  │   rules   │  │   │
//! │  │   │  Vendor   │  │QueueEntry │  │   V###    │  │  checks   │  │   │
//! │  │   │    PO     │  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   └───────────┘                                                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 procura-db (record store layer)                 │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Vendor, PurchaseOrder, ...)
//! - [`queue`] - The PO staging queue and its uniqueness invariant
//! - [`ident`] - `PO-####` / `V###` identifier formats
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Forward-only lifecycles**: availability and PO status only move
//!    along their defined edges

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ident;
pub mod queue;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use procura_core::Product` instead of
// `use procura_core::types::Product`

pub use error::ValidationError;
pub use queue::Queue;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product on a purchase order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 10000 instead of 10).
/// Can be made configurable per store in future versions.
pub const MAX_PO_QUANTITY: i64 = 99_999;
