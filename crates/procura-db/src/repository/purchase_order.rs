//! # Purchase Order Repository
//!
//! Database operations for purchase orders and their line items.
//!
//! ## PO Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Purchase Order Lifecycle                              │
//! │                                                                         │
//! │  1. GENERATE                                                           │
//! │     └── insert() → header (status: created) + item rows, one          │
//! │         transaction per vendor group                                   │
//! │                                                                         │
//! │  2. DECIDE (terminal, forward-only)                                    │
//! │     ├── approve() → status: approved, decider, timestamp               │
//! │     └── reject()  → status: rejected, decider, timestamp, reason       │
//! │         Both guarded with WHERE status = 'created'                     │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → item rows first, then the header                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use procura_core::{PurchaseOrder, PurchaseOrderItem};

const PO_COLUMNS: &str = "id, number, vendor_id, vendor_name, status, created_by, \
     created_by_name, decided_by, decided_by_name, rejection_reason, total_items, \
     created_at, decided_at";

const ITEM_COLUMNS: &str = "id, po_id, product_id, product_name, quantity, created_at";

/// Repository for purchase order database operations.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    pool: SqlitePool,
}

impl PurchaseOrderRepository {
    /// Creates a new PurchaseOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseOrderRepository { pool }
    }

    /// Inserts a purchase order header and its item rows in one
    /// transaction.
    ///
    /// One call per vendor group: a failure here rolls back only this
    /// vendor's PO, earlier groups in the same generate call stay
    /// committed.
    pub async fn insert(&self, po: &PurchaseOrder, items: &[PurchaseOrderItem]) -> DbResult<()> {
        debug!(number = %po.number, vendor = %po.vendor_name, items = items.len(), "Inserting purchase order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO purchase_orders (
                id, number, vendor_id, vendor_name, status,
                created_by, created_by_name,
                decided_by, decided_by_name, rejection_reason,
                total_items, created_at, decided_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&po.id)
        .bind(&po.number)
        .bind(&po.vendor_id)
        .bind(&po.vendor_name)
        .bind(po.status)
        .bind(&po.created_by)
        .bind(&po.created_by_name)
        .bind(&po.decided_by)
        .bind(&po.decided_by_name)
        .bind(&po.rejection_reason)
        .bind(po.total_items)
        .bind(po.created_at)
        .bind(po.decided_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO purchase_order_items (
                    id, po_id, product_id, product_name, quantity, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.po_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Lists all purchase orders in creation order.
    pub async fn list(&self) -> DbResult<Vec<PurchaseOrder>> {
        let sql = format!(
            "SELECT {} FROM purchase_orders ORDER BY created_at, number",
            PO_COLUMNS
        );
        let orders = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Gets a purchase order by its durable ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PurchaseOrder>> {
        let sql = format!("SELECT {} FROM purchase_orders WHERE id = ?1", PO_COLUMNS);
        let po = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(po)
    }

    /// Gets a purchase order by its number (e.g. `PO-0001`).
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<PurchaseOrder>> {
        let sql = format!(
            "SELECT {} FROM purchase_orders WHERE number = ?1",
            PO_COLUMNS
        );
        let po = sqlx::query_as::<_, PurchaseOrder>(&sql)
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(po)
    }

    /// Every PO number in the store.
    ///
    /// The generator scans these for the maximum once per call; the next
    /// number is always max + 1 regardless of how numbers were spread
    /// across vendors.
    pub async fn numbers(&self) -> DbResult<Vec<String>> {
        let numbers: Vec<String> = sqlx::query_scalar("SELECT number FROM purchase_orders")
            .fetch_all(&self.pool)
            .await?;

        Ok(numbers)
    }

    /// Gets all items for a purchase order, in insertion order.
    pub async fn items(&self, po_id: &str) -> DbResult<Vec<PurchaseOrderItem>> {
        let sql = format!(
            "SELECT {} FROM purchase_order_items WHERE po_id = ?1 ORDER BY created_at, id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&sql)
            .bind(po_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// All item rows in the store, in insertion order (for the PO list
    /// view, which attaches items to each header in one pass).
    pub async fn all_items(&self) -> DbResult<Vec<PurchaseOrderItem>> {
        let sql = format!(
            "SELECT {} FROM purchase_order_items ORDER BY created_at, id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Transition `created → approved`, recording the decider.
    ///
    /// Returns `true` if the PO transitioned, `false` if it was not in
    /// the `created` state (already decided).
    pub async fn approve(
        &self,
        id: &str,
        actor_id: &str,
        actor_name: &str,
        decided_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, actor = %actor_name, "Approving purchase order");

        let result = sqlx::query(
            r#"
            UPDATE purchase_orders SET
                status = 'approved',
                decided_by = ?2,
                decided_by_name = ?3,
                decided_at = ?4
            WHERE id = ?1 AND status = 'created'
            "#,
        )
        .bind(id)
        .bind(actor_id)
        .bind(actor_name)
        .bind(decided_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transition `created → rejected`, recording the decider and the
    /// free-text reason (empty string when the operator gave none).
    pub async fn reject(
        &self,
        id: &str,
        actor_id: &str,
        actor_name: &str,
        reason: &str,
        decided_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id = %id, actor = %actor_name, "Rejecting purchase order");

        let result = sqlx::query(
            r#"
            UPDATE purchase_orders SET
                status = 'rejected',
                decided_by = ?2,
                decided_by_name = ?3,
                rejection_reason = ?4,
                decided_at = ?5
            WHERE id = ?1 AND status = 'created'
            "#,
        )
        .bind(id)
        .bind(actor_id)
        .bind(actor_name)
        .bind(reason)
        .bind(decided_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a purchase order: item rows first, then the header, in one
    /// transaction. Irreversible.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting purchase order");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM purchase_order_items WHERE po_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM purchase_orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Nothing to roll back besides the no-op item delete
            tx.rollback().await?;
            return Err(DbError::not_found("PurchaseOrder", id));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Counts purchase orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new purchase order ID.
pub fn generate_po_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new purchase order item ID.
pub fn generate_po_item_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use procura_core::PoStatus;

    fn sample_po(number: &str) -> PurchaseOrder {
        PurchaseOrder {
            id: generate_po_id(),
            number: number.to_string(),
            vendor_id: "vendor-1".to_string(),
            vendor_name: "Acme Supplies".to_string(),
            status: PoStatus::Created,
            created_by: "user-1".to_string(),
            created_by_name: "Pat".to_string(),
            decided_by: None,
            decided_by_name: None,
            rejection_reason: None,
            total_items: 1,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    fn sample_item(po_id: &str, product_id: &str, quantity: i64) -> PurchaseOrderItem {
        PurchaseOrderItem {
            id: generate_po_item_id(),
            po_id: po_id.to_string(),
            product_id: product_id.to_string(),
            product_name: format!("Product {}", product_id),
            quantity,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchase_orders();

        let po = sample_po("PO-0001");
        let items = vec![sample_item(&po.id, "p1", 3), sample_item(&po.id, "p2", 5)];
        repo.insert(&po, &items).await.unwrap();

        let loaded = repo.get_by_number("PO-0001").await.unwrap().unwrap();
        assert_eq!(loaded.status, PoStatus::Created);
        assert_eq!(loaded.vendor_name, "Acme Supplies");

        let loaded_items = repo.items(&po.id).await.unwrap();
        assert_eq!(loaded_items.len(), 2);
        assert_eq!(loaded_items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_approve_is_forward_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchase_orders();

        let po = sample_po("PO-0001");
        repo.insert(&po, &[sample_item(&po.id, "p1", 1)])
            .await
            .unwrap();

        assert!(repo
            .approve(&po.id, "user-2", "Sam", Utc::now())
            .await
            .unwrap());

        // Second decision attempt hits the status guard
        assert!(!repo
            .reject(&po.id, "user-2", "Sam", "changed my mind", Utc::now())
            .await
            .unwrap());

        let loaded = repo.get_by_id(&po.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, PoStatus::Approved);
        assert_eq!(loaded.decided_by_name.as_deref(), Some("Sam"));
        assert!(loaded.decided_at.is_some());
        assert!(loaded.rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchase_orders();

        let po = sample_po("PO-0001");
        repo.insert(&po, &[sample_item(&po.id, "p1", 1)])
            .await
            .unwrap();

        assert!(repo
            .reject(&po.id, "user-2", "Sam", "", Utc::now())
            .await
            .unwrap());

        let loaded = repo.get_by_id(&po.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, PoStatus::Rejected);
        assert_eq!(loaded.rejection_reason.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_delete_removes_items_then_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchase_orders();

        let po = sample_po("PO-0001");
        repo.insert(&po, &[sample_item(&po.id, "p1", 1)])
            .await
            .unwrap();

        repo.delete(&po.id).await.unwrap();

        assert!(repo.get_by_id(&po.id).await.unwrap().is_none());
        assert!(repo.items(&po.id).await.unwrap().is_empty());

        let err = repo.delete(&po.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_numbers_scan() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchase_orders();

        for number in ["PO-0001", "PO-0003", "PO-0002"] {
            let po = sample_po(number);
            repo.insert(&po, &[]).await.unwrap();
        }

        let mut numbers = repo.numbers().await.unwrap();
        numbers.sort();
        assert_eq!(numbers, vec!["PO-0001", "PO-0002", "PO-0003"]);
    }
}
