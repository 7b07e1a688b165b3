//! # Domain Types
//!
//! Core domain types used throughout Procura.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Vendor      │   │ PurchaseOrder   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  display_id     │   │  display_id     │   │  number         │       │
//! │  │  po_status      │   │  (V001, ...)    │   │  (PO-0001, ...) │       │
//! │  │  po_quantity    │   │  name (unique)  │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductPoState  │   │    PoStatus     │   │   QueueEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Available      │   │  Created        │   │  product_id     │       │
//! │  │  Queued         │   │  Approved       │   │  quantity       │       │
//! │  │  PoCreated      │   │  Rejected       │   │  added_at       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Display id: (V001, PO-0001, ...) - human-readable, shown in the UI
//!
//! Operations that take an entity reference accept either key; the store
//! resolves display ids back to durable ids before touching the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit a product is purchased in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Individual pieces.
    Pcs,
    /// Whole boxes.
    Boxes,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Pcs
    }
}

// =============================================================================
// Product Availability State
// =============================================================================

/// A product's participation state relative to PO creation.
///
/// ## State Machine
/// ```text
/// ┌───────────┐  enqueue   ┌─────────┐  mark_ordered   ┌────────────┐
/// │ Available │ ─────────► │ Queued  │ ──────────────► │ PoCreated  │
/// └───────────┘            └─────────┘                 └────────────┘
///       ▲                       │
///       └───────────────────────┘
///               dequeue
/// ```
///
/// `PoCreated` is terminal: a product that has had a PO created must be
/// re-added by an operator, never auto-restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductPoState {
    /// Eligible for queueing (default).
    Available,
    /// Staged in the PO queue.
    Queued,
    /// A purchase order has been generated for this product.
    PoCreated,
}

impl ProductPoState {
    /// The derived selection flag: a product may be picked for PO creation
    /// only while it is `Available`. Every state transition writes this
    /// value back to the record store so all views agree.
    #[inline]
    pub fn include_in_create_po(&self) -> bool {
        matches!(self, ProductPoState::Available)
    }
}

impl Default for ProductPoState {
    fn default() -> Self {
        ProductPoState::Available
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be staged onto a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Optional human-facing identifier shown in product lists.
    pub display_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Brand label.
    pub brand: String,

    /// Category label.
    pub category: String,

    /// Purchase unit.
    pub unit: Unit,

    /// Vendor this product is purchased from. A product without a vendor
    /// cannot appear on a generated purchase order.
    pub vendor_id: Option<String>,

    /// Current stock level (non-negative).
    pub current_stock: i64,

    /// Stock level that should trigger reordering (non-negative).
    pub reorder_level: i64,

    /// Default quantity requested when this product is queued (positive).
    pub po_quantity: i64,

    /// Participation state relative to PO creation.
    pub po_status: ProductPoState,

    /// Derived flag kept in sync with `po_status` by every transition.
    /// True iff `po_status == Available`.
    pub include_in_create_po: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks the availability invariant: the stored selection flag must
    /// always match the state it is derived from.
    pub fn availability_consistent(&self) -> bool {
        self.include_in_create_po == self.po_status.include_in_create_po()
    }

    /// True when current stock has fallen to the reorder level or below.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.current_stock <= self.reorder_level
    }
}

// =============================================================================
// Vendor
// =============================================================================

/// A vendor purchase orders are raised against.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vendor {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Sequential display id (`V001`, `V002`, ...). Allocated at creation
    /// time and never reused, even after the vendor is deleted.
    pub display_id: String,

    /// Vendor name. Unique across the store, compared trimmed and
    /// case-insensitively.
    pub name: String,

    /// GST / tax registration number.
    pub gst_number: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// Phone number.
    pub phone: Option<String>,

    /// Contact person.
    pub contact_name: Option<String>,

    /// Contact email.
    pub contact_email: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Purchase Order Status
// =============================================================================

/// The status of a purchase order.
///
/// Transitions only move forward: `Created → Approved` or
/// `Created → Rejected`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PoStatus {
    /// Freshly generated, awaiting a decision.
    Created,
    /// Approved by an operator.
    Approved,
    /// Rejected by an operator.
    Rejected,
}

impl PoStatus {
    /// True once a decision has been recorded; terminal states never
    /// transition again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PoStatus::Created)
    }

    /// Lowercase label, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoStatus::Created => "created",
            PoStatus::Approved => "approved",
            PoStatus::Rejected => "rejected",
        }
    }
}

impl Default for PoStatus {
    fn default() -> Self {
        PoStatus::Created
    }
}

// =============================================================================
// Purchase Order
// =============================================================================

/// A vendor-scoped purchase order document.
///
/// Uses the snapshot pattern for the vendor name: the PO remains readable
/// even after the vendor record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseOrder {
    pub id: String,

    /// Sequential store-wide number (`PO-0001`, `PO-0002`, ...).
    pub number: String,

    /// Vendor reference (may dangle after vendor deletion).
    pub vendor_id: String,

    /// Vendor name at generation time (frozen).
    pub vendor_name: String,

    pub status: PoStatus,

    /// Identity of the operator who generated the PO.
    pub created_by: String,
    pub created_by_name: String,

    /// Identity of the operator who approved or rejected the PO.
    pub decided_by: Option<String>,
    pub decided_by_name: Option<String>,

    /// Free-text reason recorded on rejection. Empty string when the
    /// operator rejected without giving one; `None` until then.
    pub rejection_reason: Option<String>,

    /// Count of line items (not a sum of quantities).
    pub total_items: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the approve/reject decision was recorded.
    #[ts(as = "Option<String>")]
    pub decided_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Purchase Order Item
// =============================================================================

/// A line item on a purchase order.
/// The product name is frozen at generation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseOrderItem {
    pub id: String,
    pub po_id: String,
    pub product_id: String,
    /// Product name at generation time (frozen).
    pub product_name: String,
    /// Ordered quantity.
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Queue Entry
// =============================================================================

/// One staged product in the PO queue.
///
/// Purely local staging state: not a durable business record until a PO is
/// generated from it. At most one entry exists per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueueEntry {
    pub product_id: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

// =============================================================================
// Download Log Entry
// =============================================================================

/// An append-only audit record of a PO export or send action.
/// Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DownloadLogEntry {
    pub id: String,
    pub po_id: String,
    /// Where the export went ("pdf", "xlsx", "email:ops@...", ...).
    pub location_label: String,
    pub actor_id: String,
    pub actor_name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Actor
// =============================================================================

/// The signed-in operator for a store session.
///
/// Authentication itself is external; the store only records who performed
/// lifecycle mutations and refuses them when nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Actor {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Record Kinds
// =============================================================================

/// The record kinds held by the record store.
///
/// Change notifications carry one of these; subscribers re-fetch the whole
/// kind rather than applying deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Products,
    Vendors,
    PurchaseOrders,
    DownloadLog,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_po_state_selection_flag() {
        assert!(ProductPoState::Available.include_in_create_po());
        assert!(!ProductPoState::Queued.include_in_create_po());
        assert!(!ProductPoState::PoCreated.include_in_create_po());
    }

    #[test]
    fn test_po_status_terminal() {
        assert!(!PoStatus::Created.is_terminal());
        assert!(PoStatus::Approved.is_terminal());
        assert!(PoStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_po_status_labels() {
        assert_eq!(PoStatus::Created.as_str(), "created");
        assert_eq!(PoStatus::Approved.as_str(), "approved");
        assert_eq!(PoStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Unit::default(), Unit::Pcs);
        assert_eq!(ProductPoState::default(), ProductPoState::Available);
        assert_eq!(PoStatus::default(), PoStatus::Created);
    }
}
