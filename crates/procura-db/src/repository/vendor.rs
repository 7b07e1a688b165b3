//! # Vendor Repository
//!
//! Database operations for vendors.
//!
//! ## Display Id Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why a counters row instead of MAX(display_id)             │
//! │                                                                         │
//! │  Display ids are strictly sequential AND never reused, even after      │
//! │  deletion:                                                              │
//! │                                                                         │
//! │  create V001, V002, V003                                               │
//! │  delete V003                                                           │
//! │  create ───► must be V004, not V003 again                              │
//! │                                                                         │
//! │  MAX() over live rows would hand out V003 twice. The counters row      │
//! │  only ever moves forward:                                              │
//! │                                                                         │
//! │  UPDATE counters SET value = value + 1                                 │
//! │  WHERE name = 'vendor_display_id' RETURNING value                      │
//! │                                                                         │
//! │  A failed insert after allocation burns a number; gaps are fine,       │
//! │  reuse is not.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Name Uniqueness
//! Vendor names are unique trimmed + case-insensitively. The normalized
//! form lives in the `name_key` column under a UNIQUE index, so the
//! database backs up whatever check the store does first.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use procura_core::ident::format_vendor_display_id;
use procura_core::validation::normalize_name;
use procura_core::Vendor;

const VENDOR_COLUMNS: &str = "id, display_id, name, gst_number, address, phone, \
     contact_name, contact_email, created_at, updated_at";

/// Repository for vendor database operations.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    /// Creates a new VendorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Allocates the next vendor display id (`V001`, `V002`, ...).
    ///
    /// The counter row only moves forward; see module docs.
    pub async fn next_display_id(&self) -> DbResult<String> {
        let seq: i64 = sqlx::query_scalar(
            "UPDATE counters SET value = value + 1 WHERE name = 'vendor_display_id' RETURNING value",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(format_vendor_display_id(seq))
    }

    /// Lists all vendors in creation order.
    pub async fn list(&self) -> DbResult<Vec<Vendor>> {
        let sql = format!(
            "SELECT {} FROM vendors ORDER BY created_at, id",
            VENDOR_COLUMNS
        );
        let vendors = sqlx::query_as::<_, Vendor>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(vendors)
    }

    /// Gets a vendor by its durable ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vendor>> {
        let sql = format!("SELECT {} FROM vendors WHERE id = ?1", VENDOR_COLUMNS);
        let vendor = sqlx::query_as::<_, Vendor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vendor)
    }

    /// Gets a vendor by its display id (e.g. `V001`).
    pub async fn get_by_display_id(&self, display_id: &str) -> DbResult<Option<Vendor>> {
        let sql = format!(
            "SELECT {} FROM vendors WHERE display_id = ?1",
            VENDOR_COLUMNS
        );
        let vendor = sqlx::query_as::<_, Vendor>(&sql)
            .bind(display_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vendor)
    }

    /// Looks a vendor up by normalized name (for duplicate detection).
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Vendor>> {
        let key = normalize_name(name);
        let sql = format!("SELECT {} FROM vendors WHERE name_key = ?1", VENDOR_COLUMNS);
        let vendor = sqlx::query_as::<_, Vendor>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vendor)
    }

    /// Inserts a new vendor. The display id must already be allocated via
    /// [`next_display_id`](Self::next_display_id).
    ///
    /// A name collision surfaces as `DbError::UniqueViolation` with the
    /// vendor's name as the value, whichever tab lost the race.
    pub async fn insert(&self, vendor: &Vendor) -> DbResult<()> {
        debug!(display_id = %vendor.display_id, name = %vendor.name, "Inserting vendor");

        let name_key = normalize_name(&vendor.name);

        let result = sqlx::query(
            r#"
            INSERT INTO vendors (
                id, display_id, name, name_key, gst_number, address,
                phone, contact_name, contact_email, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&vendor.id)
        .bind(&vendor.display_id)
        .bind(&vendor.name)
        .bind(&name_key)
        .bind(&vendor.gst_number)
        .bind(&vendor.address)
        .bind(&vendor.phone)
        .bind(&vendor.contact_name)
        .bind(&vendor.contact_email)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(rewrite_name_collision(err.into(), &vendor.name)),
        }
    }

    /// Updates a vendor. The name key is recomputed so renames keep the
    /// uniqueness guarantee.
    pub async fn update(&self, vendor: &Vendor) -> DbResult<()> {
        debug!(id = %vendor.id, "Updating vendor");

        let now = Utc::now();
        let name_key = normalize_name(&vendor.name);

        let result = sqlx::query(
            r#"
            UPDATE vendors SET
                name = ?2,
                name_key = ?3,
                gst_number = ?4,
                address = ?5,
                phone = ?6,
                contact_name = ?7,
                contact_email = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&name_key)
        .bind(&vendor.gst_number)
        .bind(&vendor.address)
        .bind(&vendor.phone)
        .bind(&vendor.contact_name)
        .bind(&vendor.contact_email)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => Err(DbError::not_found("Vendor", &vendor.id)),
            Ok(_) => Ok(()),
            Err(err) => Err(rewrite_name_collision(err.into(), &vendor.name)),
        }
    }

    /// Deletes a vendor.
    ///
    /// Does not cascade to purchase orders; they keep their vendor name
    /// snapshot. Products referencing the vendor fall back to no vendor
    /// (FK is ON DELETE SET NULL).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting vendor");

        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vendor", id));
        }

        Ok(())
    }

    /// Bulk delete. Returns the number of rows removed.
    pub async fn delete_many(&self, ids: &[String]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        debug!(count = ids.len(), "Bulk deleting vendors");

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM vendors WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Counts vendors (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// The UNIQUE index lives on `name_key`; surface the human-readable name
/// instead of the normalized key when the collision is on it.
fn rewrite_name_collision(err: DbError, name: &str) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } if field.contains("name_key") => {
            DbError::duplicate("vendor name", name)
        }
        other => other,
    }
}

/// Helper to generate a new vendor ID.
pub fn generate_vendor_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_vendor(display_id: &str, name: &str) -> Vendor {
        let now = Utc::now();
        Vendor {
            id: generate_vendor_id(),
            display_id: display_id.to_string(),
            name: name.to_string(),
            gst_number: None,
            address: None,
            phone: None,
            contact_name: None,
            contact_email: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_display_id_sequence_survives_deletion() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        assert_eq!(repo.next_display_id().await.unwrap(), "V001");
        assert_eq!(repo.next_display_id().await.unwrap(), "V002");

        // Insert and delete the highest vendor; the sequence must not
        // hand V003 out twice.
        let vendor = sample_vendor("V003", "Doomed Vendor");
        assert_eq!(repo.next_display_id().await.unwrap(), "V003");
        repo.insert(&vendor).await.unwrap();
        repo.delete(&vendor.id).await.unwrap();

        assert_eq!(repo.next_display_id().await.unwrap(), "V004");
    }

    #[tokio::test]
    async fn test_name_uniqueness_is_case_insensitive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        repo.insert(&sample_vendor("V001", "Acme")).await.unwrap();

        let err = repo
            .insert(&sample_vendor("V002", "  ACME "))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Lookup sees through trim + case as well
        let found = repo.find_by_name(" acme ").await.unwrap();
        assert_eq!(found.map(|v| v.name), Some("Acme".to_string()));
    }

    #[tokio::test]
    async fn test_get_by_display_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        let vendor = sample_vendor("V001", "Lookup Target");
        repo.insert(&vendor).await.unwrap();

        let by_display = repo.get_by_display_id("V001").await.unwrap().unwrap();
        assert_eq!(by_display.id, vendor.id);
    }

    #[tokio::test]
    async fn test_rename_collision() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vendors();

        repo.insert(&sample_vendor("V001", "First")).await.unwrap();
        let mut second = sample_vendor("V002", "Second");
        repo.insert(&second).await.unwrap();

        second.name = "FIRST".to_string();
        let err = repo.update(&second).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
