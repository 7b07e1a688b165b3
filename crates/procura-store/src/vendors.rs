//! # Vendor Operations
//!
//! Vendor CRUD on the store facade.
//!
//! Names are unique trimmed + case-insensitively: a single add collides
//! with `DuplicateError`, while a batch import skips collisions and
//! reports them. Display ids (`V001`, ...) come from a persistent
//! sequence and are never reused, even after deletion.

use chrono::Utc;
use tracing::info;

use procura_core::validation::{normalize_name, validate_name};
use procura_core::{RecordKind, Vendor};
use procura_db::repository::vendor::generate_vendor_id;

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;
use crate::views::{ImportReport, NewVendor};

impl ProcuraStore {
    /// Creates a vendor, allocating the next display id.
    ///
    /// Fails with `Duplicate` when the trimmed, case-folded name matches
    /// an existing vendor.
    pub async fn add_vendor(&self, input: NewVendor) -> StoreResult<Vendor> {
        validate_name("vendor name", &input.name)?;

        let name = input.name.trim().to_string();
        if self.db.vendors().find_by_name(&name).await?.is_some() {
            return Err(StoreError::Duplicate {
                field: "vendor name".to_string(),
                value: name,
            });
        }

        let now = Utc::now();
        let vendor = Vendor {
            id: generate_vendor_id(),
            display_id: self.db.vendors().next_display_id().await?,
            name,
            gst_number: input.gst_number,
            address: input.address,
            phone: input.phone,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            created_at: now,
            updated_at: now,
        };

        // The UNIQUE index on the name key backs up the check above if
        // another session wins the race
        self.db.vendors().insert(&vendor).await?;
        info!(display_id = %vendor.display_id, name = %vendor.name, "Vendor added");

        self.refresh_vendors().await?;
        self.notify(RecordKind::Vendors);

        Ok(vendor)
    }

    /// Imports vendors in bulk.
    ///
    /// Name duplicates (against the store or within the batch) are
    /// silently skipped and listed in the report: submitting N names with
    /// M duplicates yields `added = N - M` and the M names.
    pub async fn import_vendors(&self, inputs: Vec<NewVendor>) -> StoreResult<ImportReport> {
        // Fail fast: the whole batch must validate before any insert
        for input in &inputs {
            validate_name("vendor name", &input.name)?;
        }

        let mut added = 0usize;
        let mut skipped: Vec<String> = Vec::new();
        let mut seen_keys: Vec<String> = Vec::new();

        for input in inputs {
            let name = input.name.trim().to_string();
            let key = normalize_name(&name);

            let in_batch = seen_keys.iter().any(|k| k == &key);
            let in_store = self.db.vendors().find_by_name(&name).await?.is_some();
            if in_batch || in_store {
                skipped.push(name);
                continue;
            }
            seen_keys.push(key);

            let now = Utc::now();
            let vendor = Vendor {
                id: generate_vendor_id(),
                display_id: self.db.vendors().next_display_id().await?,
                name,
                gst_number: input.gst_number,
                address: input.address,
                phone: input.phone,
                contact_name: input.contact_name,
                contact_email: input.contact_email,
                created_at: now,
                updated_at: now,
            };
            self.db.vendors().insert(&vendor).await?;
            added += 1;
        }

        info!(added, skipped = skipped.len(), "Vendors imported");

        self.refresh_vendors().await?;
        self.notify(RecordKind::Vendors);

        Ok(ImportReport { added, skipped })
    }

    /// Updates a vendor. Renaming onto another vendor's name fails with
    /// `Duplicate`.
    pub async fn update_vendor(&self, vendor: &Vendor) -> StoreResult<()> {
        validate_name("vendor name", &vendor.name)?;

        if let Some(existing) = self.db.vendors().find_by_name(&vendor.name).await? {
            if existing.id != vendor.id {
                return Err(StoreError::Duplicate {
                    field: "vendor name".to_string(),
                    value: vendor.name.trim().to_string(),
                });
            }
        }

        self.db.vendors().update(vendor).await?;

        self.refresh_vendors().await?;
        self.notify(RecordKind::Vendors);

        Ok(())
    }

    /// Deletes a vendor.
    ///
    /// Purchase orders are untouched (they carry a vendor name snapshot);
    /// products referencing the vendor lose the reference and will be
    /// dropped from future generations until reassigned.
    pub async fn delete_vendor(&self, vendor_ref: &str) -> StoreResult<()> {
        let vendor = self.resolve_vendor(vendor_ref).await?;

        self.db.vendors().delete(&vendor.id).await?;
        info!(display_id = %vendor.display_id, name = %vendor.name, "Vendor deleted");

        // Products lost their vendor reference too (FK SET NULL)
        self.refresh_vendors().await?;
        self.refresh_products().await?;
        self.notify(RecordKind::Vendors);
        self.notify(RecordKind::Products);

        Ok(())
    }

    /// Bulk delete. Unknown references are skipped; returns how many
    /// vendors were removed.
    pub async fn delete_vendors(&self, vendor_refs: &[String]) -> StoreResult<u64> {
        let mut ids = Vec::new();
        for reference in vendor_refs {
            match self.resolve_vendor(reference).await {
                Ok(vendor) => ids.push(vendor.id),
                Err(StoreError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }

        let removed = self.db.vendors().delete_many(&ids).await?;
        info!(removed, "Vendors bulk deleted");

        self.refresh_vendors().await?;
        self.refresh_products().await?;
        self.notify(RecordKind::Vendors);
        self.notify(RecordKind::Products);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{open_test_store, queue_and_generate_one, sign_in};
    use crate::views::NewVendor;
    use crate::StoreError;

    #[tokio::test]
    async fn test_duplicate_vendor_name_fails() {
        let (store, _dir) = open_test_store().await;

        store.add_vendor(NewVendor::named("Acme")).await.unwrap();

        let err = store
            .add_vendor(NewVendor::named("  ACME "))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // Exactly one Acme in the list
        let vendors = store.vendors();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].name, "Acme");
    }

    #[tokio::test]
    async fn test_display_ids_are_sequential() {
        let (store, _dir) = open_test_store().await;

        let a = store.add_vendor(NewVendor::named("First")).await.unwrap();
        let b = store.add_vendor(NewVendor::named("Second")).await.unwrap();
        assert_eq!(a.display_id, "V001");
        assert_eq!(b.display_id, "V002");

        // Deleting the newest vendor must not free its display id
        store.delete_vendor(&b.id).await.unwrap();
        let c = store.add_vendor(NewVendor::named("Third")).await.unwrap();
        assert_eq!(c.display_id, "V003");
    }

    #[tokio::test]
    async fn test_import_reports_duplicates() {
        let (store, _dir) = open_test_store().await;

        store.add_vendor(NewVendor::named("Acme")).await.unwrap();

        let report = store
            .import_vendors(vec![
                NewVendor::named("acme"),     // duplicate of existing
                NewVendor::named("Borealis"), // new
                NewVendor::named("Cascade"),  // new
                NewVendor::named("BOREALIS"), // duplicate within batch
            ])
            .await
            .unwrap();

        // added = N - M
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, vec!["acme", "BOREALIS"]);
        assert_eq!(store.vendors().len(), 3);
    }

    #[tokio::test]
    async fn test_rename_collision() {
        let (store, _dir) = open_test_store().await;

        store.add_vendor(NewVendor::named("First")).await.unwrap();
        let mut second = store.add_vendor(NewVendor::named("Second")).await.unwrap();

        second.name = "first".to_string();
        let err = store.update_vendor(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // Renaming to itself (case change only) is allowed
        let mut first = store
            .vendors()
            .into_iter()
            .find(|v| v.name == "First")
            .unwrap();
        first.name = "FIRST".to_string();
        store.update_vendor(&first).await.unwrap();
    }

    #[tokio::test]
    async fn test_vendor_deletion_keeps_po_snapshot() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);

        let po = queue_and_generate_one(&store).await;
        store.delete_vendor(&po.vendor_id).await.unwrap();

        // The PO survives with its frozen vendor name
        let orders = store.purchase_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].purchase_order.vendor_name, po.vendor_name);
    }
}
