//! # Identifier Resolution
//!
//! Every store boundary that takes a product/vendor/PO reference accepts
//! either the durable id or the human-facing identifier. Resolution tries
//! the durable id first, then the display form, and is idempotent: a
//! reference that is already a durable id resolves to itself.
//!
//! ```text
//! resolve("f4b2...-uuid")  → durable id lookup hits     → done
//! resolve("V001")          → durable id lookup misses   → display id hits
//! resolve("PO-0007")       → id miss → number lookup    → done
//! resolve("nonsense")      → both miss                  → NotFound
//! ```

use procura_core::validation::validate_reference;
use procura_core::{Product, PurchaseOrder, Vendor};

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;

impl ProcuraStore {
    /// Resolves a product reference (durable id or display id).
    pub async fn resolve_product(&self, reference: &str) -> StoreResult<Product> {
        validate_reference("product", reference)?;

        let repo = self.db.products();
        if let Some(product) = repo.get_by_id(reference).await? {
            return Ok(product);
        }
        if let Some(product) = repo.get_by_display_id(reference).await? {
            return Ok(product);
        }

        Err(StoreError::not_found("Product", reference))
    }

    /// Resolves a vendor reference (durable id or display id like `V001`).
    pub async fn resolve_vendor(&self, reference: &str) -> StoreResult<Vendor> {
        validate_reference("vendor", reference)?;

        let repo = self.db.vendors();
        if let Some(vendor) = repo.get_by_id(reference).await? {
            return Ok(vendor);
        }
        if let Some(vendor) = repo.get_by_display_id(reference).await? {
            return Ok(vendor);
        }

        Err(StoreError::not_found("Vendor", reference))
    }

    /// Resolves a purchase order reference (durable id or number like
    /// `PO-0001`).
    pub async fn resolve_purchase_order(&self, reference: &str) -> StoreResult<PurchaseOrder> {
        validate_reference("purchase order", reference)?;

        let repo = self.db.purchase_orders();
        if let Some(po) = repo.get_by_id(reference).await? {
            return Ok(po);
        }
        if let Some(po) = repo.get_by_number(reference).await? {
            return Ok(po);
        }

        Err(StoreError::not_found("PurchaseOrder", reference))
    }
}
