//! # Product Repository
//!
//! Database operations for products, including the guarded availability
//! transitions the PO queue relies on.
//!
//! ## Guarded Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why UPDATE ... WHERE po_status = '<source>'                │
//! │                                                                         │
//! │  Two tabs click "queue" on the same product:                           │
//! │                                                                         │
//! │  Tab A: UPDATE ... WHERE id = P AND po_status = 'available'  → 1 row   │
//! │  Tab B: UPDATE ... WHERE id = P AND po_status = 'available'  → 0 rows  │
//! │                                                                         │
//! │  The guard makes every transition idempotent at the store level:       │
//! │  rows_affected() == 0 means "wrong source state", which callers        │
//! │  treat as a no-op rather than an error.                                │
//! │                                                                         │
//! │  The selection flag (include_in_create_po) is rewritten inside the     │
//! │  same statement, so it can never drift from po_status.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use procura_core::{Product, ProductPoState};

const PRODUCT_COLUMNS: &str = "id, display_id, name, brand, category, unit, vendor_id, \
     current_stock, reorder_level, po_quantity, po_status, include_in_create_po, \
     created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products in creation order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY created_at, id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products in a given availability state, in creation order.
    pub async fn list_by_state(&self, state: ProductPoState) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE po_status = ?1 ORDER BY created_at, id",
            PRODUCT_COLUMNS
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(state)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its durable ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its human-facing display ID.
    pub async fn get_by_display_id(&self, display_id: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE display_id = ?1",
            PRODUCT_COLUMNS
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(display_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, display_id, name, brand, category, unit, vendor_id,
                current_stock, reorder_level, po_quantity,
                po_status, include_in_create_po,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.display_id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.unit)
        .bind(&product.vendor_id)
        .bind(product.current_stock)
        .bind(product.reorder_level)
        .bind(product.po_quantity)
        .bind(product.po_status)
        .bind(product.include_in_create_po)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's descriptive fields.
    ///
    /// Availability state is NOT written here; it only moves through the
    /// guarded transitions below.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                display_id = ?2,
                name = ?3,
                brand = ?4,
                category = ?5,
                unit = ?6,
                vendor_id = ?7,
                current_stock = ?8,
                reorder_level = ?9,
                po_quantity = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.display_id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.unit)
        .bind(&product.vendor_id)
        .bind(product.current_stock)
        .bind(product.reorder_level)
        .bind(product.po_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Transition `available → queued`, storing the requested quantity.
    ///
    /// Returns `true` if the product transitioned, `false` if it was not
    /// in the `available` state (caller treats that as a no-op).
    pub async fn set_queued(&self, id: &str, quantity: i64) -> DbResult<bool> {
        debug!(id = %id, quantity = %quantity, "Queueing product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                po_status = 'queued',
                include_in_create_po = 0,
                po_quantity = ?2,
                updated_at = ?3
            WHERE id = ?1 AND po_status = 'available'
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transition `queued → available`, restoring the selection flag.
    ///
    /// Returns `true` if the product transitioned, `false` otherwise.
    pub async fn set_available(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Dequeueing product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                po_status = 'available',
                include_in_create_po = 1,
                updated_at = ?2
            WHERE id = ?1 AND po_status = 'queued'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bulk transition `queued → po_created` after PO generation.
    ///
    /// The selection flag stays off permanently: a product that has had a
    /// PO created must be re-added by an operator, never auto-restored.
    /// Returns the number of products that transitioned.
    pub async fn mark_ordered(&self, ids: &[String]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        debug!(count = ids.len(), "Marking products ordered");

        let now = Utc::now();

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "UPDATE products SET po_status = 'po_created', include_in_create_po = 0, updated_at = ",
        );
        builder.push_bind(now);
        builder.push(" WHERE po_status = 'queued' AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Deletes a product.
    ///
    /// Queue cascade is the store's concern (the queue is local state, not
    /// a database table).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Bulk delete. Returns the number of rows removed; missing ids are
    /// simply not counted.
    pub async fn delete_many(&self, ids: &[String]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        debug!(count = ids.len(), "Bulk deleting products");

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM products WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use procura_core::Unit;

    fn sample_product(name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            display_id: None,
            name: name.to_string(),
            brand: "Generic".to_string(),
            category: "Misc".to_string(),
            unit: Unit::Pcs,
            vendor_id: None,
            current_stock: 10,
            reorder_level: 2,
            po_quantity: 5,
            po_status: ProductPoState::Available,
            include_in_create_po: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Test Widget");
        repo.insert(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Test Widget");
        assert_eq!(loaded.po_status, ProductPoState::Available);
        assert!(loaded.include_in_create_po);
    }

    #[tokio::test]
    async fn test_guarded_queue_transition() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Queue Me");
        repo.insert(&product).await.unwrap();

        // First transition wins
        assert!(repo.set_queued(&product.id, 3).await.unwrap());
        // Second attempt is a guarded no-op
        assert!(!repo.set_queued(&product.id, 9).await.unwrap());

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.po_status, ProductPoState::Queued);
        assert_eq!(loaded.po_quantity, 3);
        assert!(!loaded.include_in_create_po);
    }

    #[tokio::test]
    async fn test_dequeue_restores_selection_flag() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = sample_product("Dequeue Me");
        repo.insert(&product).await.unwrap();

        repo.set_queued(&product.id, 3).await.unwrap();
        assert!(repo.set_available(&product.id).await.unwrap());

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.po_status, ProductPoState::Available);
        assert!(loaded.include_in_create_po);

        // Dequeueing an available product is a no-op
        assert!(!repo.set_available(&product.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_ordered_only_touches_queued() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let queued = sample_product("Queued");
        let available = sample_product("Available");
        repo.insert(&queued).await.unwrap();
        repo.insert(&available).await.unwrap();
        repo.set_queued(&queued.id, 2).await.unwrap();

        let changed = repo
            .mark_ordered(&[queued.id.clone(), available.id.clone()])
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let loaded = repo.get_by_id(&queued.id).await.unwrap().unwrap();
        assert_eq!(loaded.po_status, ProductPoState::PoCreated);
        assert!(!loaded.include_in_create_po);

        let untouched = repo.get_by_id(&available.id).await.unwrap().unwrap();
        assert_eq!(untouched.po_status, ProductPoState::Available);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = sample_product("A");
        let b = sample_product("B");
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        let removed = repo
            .delete_many(&[a.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
