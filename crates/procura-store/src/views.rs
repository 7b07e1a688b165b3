//! # View DTOs and Operation Reports
//!
//! Shapes the store hands to the UI/export layer, and the inputs it
//! accepts for creation. Field names serialize camelCase, matching the
//! frontend convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{PurchaseOrder, PurchaseOrderItem, Unit};

// =============================================================================
// Purchase Order Views
// =============================================================================

/// A purchase order with its line items attached.
///
/// The vendor name is already denormalized onto the header, so this view
/// stays complete even after the vendor record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderView {
    pub purchase_order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

// =============================================================================
// Queue Views
// =============================================================================

/// One queue row with product details snapshotted for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItemView {
    pub product_id: String,
    pub display_id: Option<String>,
    pub name: String,
    pub unit: Unit,
    pub vendor_id: Option<String>,
    pub vendor_name: Option<String>,
    pub quantity: i64,
    pub added_at: DateTime<Utc>,
}

/// The queue view: rows plus header totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueView {
    pub items: Vec<QueueItemView>,
    pub total_quantity: i64,
}

// =============================================================================
// Operation Reports
// =============================================================================

/// Result of a batch import (vendors or products).
///
/// Duplicates don't abort the batch; they are skipped and listed here, so
/// `added = submitted - skipped.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub added: usize,
    pub skipped: Vec<String>,
}

/// Result of a batch queue add.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAddReport {
    pub added: usize,
    pub skipped: usize,
}

/// Result of a bulk approve/reject.
///
/// Bulk variants filter to `created` POs; references that were missing or
/// already decided are listed as skipped rather than failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecisionReport {
    pub updated: usize,
    pub skipped: Vec<String>,
}

// =============================================================================
// Creation Inputs
// =============================================================================

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub display_id: Option<String>,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub unit: Unit,
    /// Vendor reference: durable id or display id.
    pub vendor: Option<String>,
    pub current_stock: i64,
    pub reorder_level: i64,
    /// Default quantity used when the product is queued.
    pub po_quantity: i64,
}

impl NewProduct {
    /// A minimal product input; callers set what they need.
    pub fn named(name: impl Into<String>) -> Self {
        NewProduct {
            display_id: None,
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            unit: Unit::Pcs,
            vendor: None,
            current_stock: 0,
            reorder_level: 0,
            po_quantity: 1,
        }
    }

    pub fn vendor(mut self, vendor_ref: impl Into<String>) -> Self {
        self.vendor = Some(vendor_ref.into());
        self
    }

    pub fn po_quantity(mut self, quantity: i64) -> Self {
        self.po_quantity = quantity;
        self
    }

    pub fn display_id(mut self, display_id: impl Into<String>) -> Self {
        self.display_id = Some(display_id.into());
        self
    }
}

/// Input for creating a vendor. The display id is allocated by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVendor {
    pub name: String,
    pub gst_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

impl NewVendor {
    /// A vendor input with just a name; contact fields default empty.
    pub fn named(name: impl Into<String>) -> Self {
        NewVendor {
            name: name.into(),
            gst_number: None,
            address: None,
            phone: None,
            contact_name: None,
            contact_email: None,
        }
    }
}
