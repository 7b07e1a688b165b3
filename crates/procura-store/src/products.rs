//! # Product Operations
//!
//! Product CRUD on the store facade. Availability transitions live in
//! [`queue`](crate::queue) and [`generate`](crate::generate); this module
//! only creates, edits, and deletes product records.
//!
//! Deletion cascades into the local queue: a deleted product can't stay
//! staged. Bulk deletes skip unknown references instead of failing the
//! batch.

use chrono::Utc;
use tracing::info;

use procura_core::validation::{validate_name, validate_quantity, validate_stock_level};
use procura_core::{Product, ProductPoState, RecordKind};
use procura_db::repository::product::generate_product_id;

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;
use crate::views::{ImportReport, NewProduct};

impl ProcuraStore {
    /// Creates a product. Starts `available` and selectable.
    pub async fn add_product(&self, input: NewProduct) -> StoreResult<Product> {
        let product = self.build_product(&input).await?;

        if let Some(display_id) = &product.display_id {
            if self
                .db
                .products()
                .get_by_display_id(display_id)
                .await?
                .is_some()
            {
                return Err(StoreError::Duplicate {
                    field: "product display id".to_string(),
                    value: display_id.clone(),
                });
            }
        }

        self.db.products().insert(&product).await?;
        info!(name = %product.name, "Product added");

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(product)
    }

    /// Imports products in bulk.
    ///
    /// Display-id duplicates (against the store or within the batch) are
    /// skipped and reported; everything else is inserted. Inputs are all
    /// validated before the first insert.
    pub async fn import_products(&self, inputs: Vec<NewProduct>) -> StoreResult<ImportReport> {
        let mut products = Vec::with_capacity(inputs.len());
        for input in &inputs {
            products.push(self.build_product(input).await?);
        }

        let mut added = 0usize;
        let mut skipped: Vec<String> = Vec::new();
        let mut seen_display_ids: Vec<String> = Vec::new();

        for product in products {
            if let Some(display_id) = &product.display_id {
                let in_batch = seen_display_ids.iter().any(|d| d == display_id);
                let in_store = self
                    .db
                    .products()
                    .get_by_display_id(display_id)
                    .await?
                    .is_some();
                if in_batch || in_store {
                    skipped.push(display_id.clone());
                    continue;
                }
                seen_display_ids.push(display_id.clone());
            }

            self.db.products().insert(&product).await?;
            added += 1;
        }

        info!(added, skipped = skipped.len(), "Products imported");

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(ImportReport { added, skipped })
    }

    /// Updates a product's descriptive fields. Availability state is not
    /// touched here.
    pub async fn update_product(&self, product: &Product) -> StoreResult<()> {
        validate_name("name", &product.name)?;
        validate_stock_level("current_stock", product.current_stock)?;
        validate_stock_level("reorder_level", product.reorder_level)?;
        validate_quantity(product.po_quantity)?;

        self.db.products().update(product).await?;

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(())
    }

    /// Changes the default quantity requested when this product is
    /// queued.
    pub async fn set_po_quantity(&self, product_ref: &str, quantity: i64) -> StoreResult<Product> {
        validate_quantity(quantity)?;

        let mut product = self.resolve_product(product_ref).await?;
        product.po_quantity = quantity;
        self.db.products().update(&product).await?;

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(product)
    }

    /// Deletes a product, cascading removal from the queue if it was
    /// staged.
    pub async fn delete_product(&self, product_ref: &str) -> StoreResult<()> {
        let product = self.resolve_product(product_ref).await?;

        self.db.products().delete(&product.id).await?;

        if self.lock_queue().remove(&product.id).is_some() {
            self.persist_queue();
        }

        info!(name = %product.name, "Product deleted");

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(())
    }

    /// Bulk delete. Unknown references are skipped; returns how many
    /// products were removed.
    pub async fn delete_products(&self, product_refs: &[String]) -> StoreResult<u64> {
        let mut ids = Vec::new();
        for reference in product_refs {
            match self.resolve_product(reference).await {
                Ok(product) => ids.push(product.id),
                Err(StoreError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }

        let removed = self.db.products().delete_many(&ids).await?;

        {
            let mut queue = self.lock_queue();
            for id in &ids {
                queue.remove(id);
            }
        }
        self.persist_queue();

        info!(removed, "Products bulk deleted");

        self.refresh_products().await?;
        self.notify(RecordKind::Products);

        Ok(removed)
    }

    /// Validates an input and resolves its vendor reference.
    async fn build_product(&self, input: &NewProduct) -> StoreResult<Product> {
        validate_name("name", &input.name)?;
        validate_stock_level("current_stock", input.current_stock)?;
        validate_stock_level("reorder_level", input.reorder_level)?;
        validate_quantity(input.po_quantity)?;

        let vendor_id = match &input.vendor {
            Some(vendor_ref) => Some(self.resolve_vendor(vendor_ref).await?.id),
            None => None,
        };

        let now = Utc::now();
        Ok(Product {
            id: generate_product_id(),
            display_id: input.display_id.clone(),
            name: input.name.trim().to_string(),
            brand: input.brand.clone(),
            category: input.category.clone(),
            unit: input.unit,
            vendor_id,
            current_stock: input.current_stock,
            reorder_level: input.reorder_level,
            po_quantity: input.po_quantity,
            po_status: ProductPoState::Available,
            include_in_create_po: true,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{open_test_store, seed_vendor};
    use crate::views::NewProduct;
    use crate::StoreError;

    #[tokio::test]
    async fn test_add_product_validates_input() {
        let (store, _dir) = open_test_store().await;

        let err = store.add_product(NewProduct::named("  ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .add_product(NewProduct::named("Widget").po_quantity(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_resolves_vendor_by_display_id() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;

        let product = store
            .add_product(NewProduct::named("Widget").vendor("V001"))
            .await
            .unwrap();
        assert_eq!(product.vendor_id.as_deref(), Some(vendor.id.as_str()));

        let err = store
            .add_product(NewProduct::named("Orphan").vendor("V999"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_display_id_duplicates_rejected() {
        let (store, _dir) = open_test_store().await;

        store
            .add_product(NewProduct::named("First").display_id("P0001"))
            .await
            .unwrap();

        let err = store
            .add_product(NewProduct::named("Second").display_id("P0001"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_import_skips_display_id_duplicates() {
        let (store, _dir) = open_test_store().await;

        store
            .add_product(NewProduct::named("Existing").display_id("P0001"))
            .await
            .unwrap();

        let report = store
            .import_products(vec![
                NewProduct::named("A").display_id("P0001"), // store dup
                NewProduct::named("B").display_id("P0002"),
                NewProduct::named("C").display_id("P0002"), // batch dup
                NewProduct::named("D"),                     // no display id
            ])
            .await
            .unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, vec!["P0001", "P0002"]);
        assert_eq!(store.products().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_product_cascades_queue_removal() {
        let (store, _dir) = open_test_store().await;
        let vendor = seed_vendor(&store, "Acme").await;
        let product = store
            .add_product(NewProduct::named("Widget").vendor(&vendor.id))
            .await
            .unwrap();

        store.add_to_queue(&product.id, 2).await.unwrap();
        assert_eq!(store.queue_view().items.len(), 1);

        store.delete_product(&product.id).await.unwrap();

        assert!(store.queue_view().items.is_empty());
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_set_po_quantity() {
        let (store, _dir) = open_test_store().await;
        let product = store
            .add_product(NewProduct::named("Widget"))
            .await
            .unwrap();

        let updated = store.set_po_quantity(&product.id, 42).await.unwrap();
        assert_eq!(updated.po_quantity, 42);

        let err = store.set_po_quantity(&product.id, -5).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_bulk_delete_skips_unknown_refs() {
        let (store, _dir) = open_test_store().await;
        let a = store.add_product(NewProduct::named("A")).await.unwrap();
        store.add_product(NewProduct::named("B")).await.unwrap();

        let removed = store
            .delete_products(&[a.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.products().len(), 1);
    }
}
