//! # Download Log Repository
//!
//! Append-only audit trail of PO export/send actions.
//!
//! Rows are inserted and read, never updated or deleted. There is no
//! delete method on purpose; the audit trail outlives the POs it
//! references.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use procura_core::DownloadLogEntry;

const LOG_COLUMNS: &str = "id, po_id, location_label, actor_id, actor_name, created_at";

/// Repository for the download/notification audit log.
#[derive(Debug, Clone)]
pub struct DownloadLogRepository {
    pool: SqlitePool,
}

impl DownloadLogRepository {
    /// Creates a new DownloadLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DownloadLogRepository { pool }
    }

    /// Appends an audit entry.
    pub async fn append(&self, entry: &DownloadLogEntry) -> DbResult<()> {
        debug!(po_id = %entry.po_id, label = %entry.location_label, "Logging download");

        sqlx::query(
            r#"
            INSERT INTO download_log (
                id, po_id, location_label, actor_id, actor_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.po_id)
        .bind(&entry.location_label)
        .bind(&entry.actor_id)
        .bind(&entry.actor_name)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists all audit entries, newest first.
    pub async fn list(&self) -> DbResult<Vec<DownloadLogEntry>> {
        let sql = format!(
            "SELECT {} FROM download_log ORDER BY created_at DESC, id",
            LOG_COLUMNS
        );
        let entries = sqlx::query_as::<_, DownloadLogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Lists audit entries for one PO, newest first.
    pub async fn list_for_po(&self, po_id: &str) -> DbResult<Vec<DownloadLogEntry>> {
        let sql = format!(
            "SELECT {} FROM download_log WHERE po_id = ?1 ORDER BY created_at DESC, id",
            LOG_COLUMNS
        );
        let entries = sqlx::query_as::<_, DownloadLogEntry>(&sql)
            .bind(po_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }
}

/// Helper to generate a new log entry ID.
pub fn generate_log_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn entry(po_id: &str, label: &str) -> DownloadLogEntry {
        DownloadLogEntry {
            id: generate_log_id(),
            po_id: po_id.to_string(),
            location_label: label.to_string(),
            actor_id: "user-1".to_string(),
            actor_name: "Pat".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.download_log();

        repo.append(&entry("po-1", "pdf")).await.unwrap();
        repo.append(&entry("po-1", "email:ops@example.com"))
            .await
            .unwrap();
        repo.append(&entry("po-2", "xlsx")).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        assert_eq!(repo.list_for_po("po-1").await.unwrap().len(), 2);
        assert!(repo.list_for_po("po-9").await.unwrap().is_empty());
    }
}
