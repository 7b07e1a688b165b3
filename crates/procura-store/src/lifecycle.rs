//! # PO Lifecycle
//!
//! Approve/reject decisions, deletion, and the export audit log.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Order States                                │
//! │                                                                         │
//! │                  ┌──────────► approved (terminal)                       │
//! │   created ───────┤                                                      │
//! │                  └──────────► rejected (terminal)                       │
//! │                                                                         │
//! │  No transition leaves a terminal state. Deciding an already-decided    │
//! │  PO raises InvalidStatus (single calls) or is skipped and reported     │
//! │  (bulk calls). Every decision records who and when; rejections also    │
//! │  record a free-text reason, empty string if none was given.            │
//! │                                                                         │
//! │  All of these require a signed-in actor.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{info, warn};

use procura_core::{DownloadLogEntry, PurchaseOrder, RecordKind};
use procura_db::repository::download_log::generate_log_id;

use crate::error::{StoreError, StoreResult};
use crate::store::ProcuraStore;
use crate::views::BulkDecisionReport;

impl ProcuraStore {
    // =========================================================================
    // Decisions
    // =========================================================================

    /// Approves a purchase order.
    ///
    /// Accepts a durable id or a PO number. Fails with `Unauthenticated`
    /// without a signed-in actor, `NotFound` for unknown references, and
    /// `InvalidStatus` when the PO has already been decided.
    pub async fn approve(&self, po_ref: &str) -> StoreResult<PurchaseOrder> {
        let actor = self.require_actor()?;
        let po = self.resolve_purchase_order(po_ref).await?;

        if po.status.is_terminal() {
            return Err(StoreError::InvalidStatus {
                entity: po.number.clone(),
                current: po.status.as_str().to_string(),
            });
        }

        let transitioned = self
            .db
            .purchase_orders()
            .approve(&po.id, &actor.id, &actor.name, Utc::now())
            .await?;
        if !transitioned {
            // Lost a race against another session's decision
            return Err(StoreError::InvalidStatus {
                entity: po.number.clone(),
                current: "decided".to_string(),
            });
        }

        info!(number = %po.number, actor = %actor.name, "Purchase order approved");

        self.refresh_purchase_orders().await?;
        self.notify(RecordKind::PurchaseOrders);

        self.resolve_purchase_order(&po.id).await
    }

    /// Rejects a purchase order with an optional free-text reason.
    /// An omitted reason is recorded as the empty string.
    pub async fn reject(&self, po_ref: &str, reason: Option<&str>) -> StoreResult<PurchaseOrder> {
        let actor = self.require_actor()?;
        let po = self.resolve_purchase_order(po_ref).await?;

        if po.status.is_terminal() {
            return Err(StoreError::InvalidStatus {
                entity: po.number.clone(),
                current: po.status.as_str().to_string(),
            });
        }

        let transitioned = self
            .db
            .purchase_orders()
            .reject(
                &po.id,
                &actor.id,
                &actor.name,
                reason.unwrap_or(""),
                Utc::now(),
            )
            .await?;
        if !transitioned {
            return Err(StoreError::InvalidStatus {
                entity: po.number.clone(),
                current: "decided".to_string(),
            });
        }

        info!(number = %po.number, actor = %actor.name, "Purchase order rejected");

        self.refresh_purchase_orders().await?;
        self.notify(RecordKind::PurchaseOrders);

        self.resolve_purchase_order(&po.id).await
    }

    /// Approves every referenced PO still in `created` state.
    ///
    /// Unlike [`approve`](Self::approve), references that are missing or
    /// already decided don't fail the batch; they are reported as skipped.
    pub async fn approve_bulk(&self, po_refs: &[String]) -> StoreResult<BulkDecisionReport> {
        self.decide_bulk(po_refs, None).await
    }

    /// Rejects every referenced PO still in `created` state, sharing one
    /// optional reason. Skips mirror [`approve_bulk`](Self::approve_bulk).
    pub async fn reject_bulk(
        &self,
        po_refs: &[String],
        reason: Option<&str>,
    ) -> StoreResult<BulkDecisionReport> {
        self.decide_bulk(po_refs, Some(reason.unwrap_or(""))).await
    }

    /// Shared bulk decision walk; `reason: None` approves, `Some` rejects.
    async fn decide_bulk(
        &self,
        po_refs: &[String],
        reason: Option<&str>,
    ) -> StoreResult<BulkDecisionReport> {
        let actor = self.require_actor()?;
        let repo = self.db.purchase_orders();
        let now = Utc::now();

        let mut updated = 0usize;
        let mut skipped: Vec<String> = Vec::new();

        for po_ref in po_refs {
            let po = match self.resolve_purchase_order(po_ref).await {
                Ok(po) => po,
                Err(StoreError::NotFound { .. }) => {
                    skipped.push(po_ref.clone());
                    continue;
                }
                Err(err) => return Err(err),
            };

            if po.status.is_terminal() {
                skipped.push(po.number.clone());
                continue;
            }

            let transitioned = match reason {
                None => repo.approve(&po.id, &actor.id, &actor.name, now).await?,
                Some(reason) => {
                    repo.reject(&po.id, &actor.id, &actor.name, reason, now)
                        .await?
                }
            };
            if transitioned {
                updated += 1;
            } else {
                skipped.push(po.number.clone());
            }
        }

        self.refresh_purchase_orders().await?;
        self.notify(RecordKind::PurchaseOrders);

        Ok(BulkDecisionReport { updated, skipped })
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Deletes a purchase order: item rows first, then the header.
    /// Irreversible. Whether the caller is allowed to delete is an
    /// authorization concern outside this store; an actor must still be
    /// signed in so the action is attributable.
    pub async fn delete_purchase_order(&self, po_ref: &str) -> StoreResult<()> {
        let actor = self.require_actor()?;
        let po = self.resolve_purchase_order(po_ref).await?;

        self.db.purchase_orders().delete(&po.id).await?;

        info!(number = %po.number, actor = %actor.name, "Purchase order deleted");

        self.refresh_purchase_orders().await?;
        self.notify(RecordKind::PurchaseOrders);

        Ok(())
    }

    // =========================================================================
    // Download / Notification Log
    // =========================================================================

    /// Records that a PO was exported or sent somewhere.
    ///
    /// Best effort by design: the export has already happened, so every
    /// failure here is logged and swallowed rather than blocking the
    /// primary action. Returns the entry when one was recorded.
    pub async fn log_download(
        &self,
        po_ref: &str,
        location_label: &str,
    ) -> Option<DownloadLogEntry> {
        let actor = match self.current_actor() {
            Some(actor) => actor,
            None => {
                warn!(po = %po_ref, "Download not logged: no actor signed in");
                return None;
            }
        };

        let po = match self.resolve_purchase_order(po_ref).await {
            Ok(po) => po,
            Err(err) => {
                warn!(po = %po_ref, error = %err, "Download not logged: unresolvable PO");
                return None;
            }
        };

        let entry = DownloadLogEntry {
            id: generate_log_id(),
            po_id: po.id.clone(),
            location_label: location_label.to_string(),
            actor_id: actor.id,
            actor_name: actor.name,
            created_at: Utc::now(),
        };

        if let Err(err) = self.db.download_log().append(&entry).await {
            warn!(po = %po.number, error = %err, "Download not logged: append failed");
            return None;
        }

        self.notify(RecordKind::DownloadLog);
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{open_test_store, queue_and_generate_one, seed_product, seed_vendor, sign_in};
    use crate::StoreError;
    use procura_core::PoStatus;

    #[tokio::test]
    async fn test_approve_records_decider() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;

        let approved = store.approve(&po.number).await.unwrap();
        assert_eq!(approved.status, PoStatus::Approved);
        assert_eq!(approved.decided_by_name.as_deref(), Some("Pat"));
        assert!(approved.decided_at.is_some());
    }

    #[tokio::test]
    async fn test_terminal_po_cannot_be_redecided() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;

        store.approve(&po.id).await.unwrap();

        let err = store.approve(&po.id).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidStatus { .. }));
        let err = store.reject(&po.id, Some("too late")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidStatus { .. }));

        // Still approved, decision untouched
        let fresh = store.resolve_purchase_order(&po.id).await.unwrap();
        assert_eq!(fresh.status, PoStatus::Approved);
        assert!(fresh.rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_reject_without_reason_records_empty_string() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;

        let rejected = store.reject(&po.number, None).await.unwrap();
        assert_eq!(rejected.status, PoStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_decisions_require_actor() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;
        store.sign_out();

        let err = store.approve(&po.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));
        let err = store.reject(&po.id, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));

        let fresh = store.resolve_purchase_order(&po.id).await.unwrap();
        assert_eq!(fresh.status, PoStatus::Created);
    }

    #[tokio::test]
    async fn test_approve_missing_po() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);

        let err = store.approve("PO-9999").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.purchase_orders().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_approve_filters_and_reports() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);

        let v1 = seed_vendor(&store, "Acme").await;
        let v2 = seed_vendor(&store, "Borealis").await;
        let p1 = seed_product(&store, "P1", Some(&v1.id)).await;
        let p2 = seed_product(&store, "P2", Some(&v2.id)).await;
        store.add_to_queue(&p1.id, 1).await.unwrap();
        store.add_to_queue(&p2.id, 1).await.unwrap();
        let created = store.generate(None).await.unwrap();

        // Decide the first one up front
        store
            .reject(&created[0].purchase_order.id, None)
            .await
            .unwrap();

        let refs: Vec<String> = created
            .iter()
            .map(|v| v.purchase_order.number.clone())
            .chain(["PO-9999".to_string()])
            .collect();
        let report = store.approve_bulk(&refs).await.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.contains(&created[0].purchase_order.number));
        assert!(report.skipped.contains(&"PO-9999".to_string()));
    }

    #[tokio::test]
    async fn test_delete_purchase_order() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;

        store.delete_purchase_order(&po.number).await.unwrap();

        assert!(store.purchase_orders().is_empty());
        let err = store.resolve_purchase_order(&po.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_log_download_appends_and_never_fails() {
        let (store, _dir) = open_test_store().await;
        sign_in(&store);
        let po = queue_and_generate_one(&store).await;

        let entry = store.log_download(&po.number, "pdf").await.unwrap();
        assert_eq!(entry.po_id, po.id);
        assert_eq!(entry.actor_name, "Pat");

        // Unresolvable PO and missing actor are swallowed, not errors
        assert!(store.log_download("PO-9999", "pdf").await.is_none());
        store.sign_out();
        assert!(store.log_download(&po.id, "pdf").await.is_none());

        let log = store.download_log().await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].location_label, "pdf");
    }
}
