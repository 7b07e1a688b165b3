//! # Store Error Type
//!
//! Unified error type for store operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Procura                                │
//! │                                                                         │
//! │  UI / export layer              Store                                   │
//! │  ─────────────────              ─────                                   │
//! │                                                                         │
//! │  store.add_to_queue(ref, qty)                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Validation first (no store call yet)                            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  ValidationError ── qty <= 0 ───────────────────┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  DbError ── UNIQUE/FK/IO failures ─────────► StoreError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  code() gives the UI a stable machine-readable discriminant:            │
//! │  "NOT_FOUND", "DUPLICATE", "UNAUTHENTICATED", ...                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never retries automatically. `Store` failures carry the
//! original cause; callers decide whether to retry.

use thiserror::Error;

use procura_core::ValidationError;
use procura_db::DbError;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed input (non-positive quantity, empty name, ...).
    /// Raised before any record store call is issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A reference (durable id or display id) resolved to nothing.
    #[error("{kind} not found: {reference}")]
    NotFound { kind: String, reference: String },

    /// A uniqueness rule was violated (vendor name, ...).
    /// Batch variants collect duplicates into a report instead.
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A lifecycle mutation was attempted without a signed-in actor.
    #[error("No actor is signed in")]
    Unauthenticated,

    /// PO generation was invoked on an empty queue or empty selection.
    #[error("The PO queue is empty")]
    EmptyQueue,

    /// A lifecycle transition was attempted from a terminal state.
    #[error("{entity} is {current}, cannot perform operation")]
    InvalidStatus { entity: String, current: String },

    /// The underlying record store call failed; the original cause is
    /// attached. The store does not retry.
    #[error("Record store failure: {0}")]
    Store(#[source] DbError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity kind and reference.
    pub fn not_found(kind: impl Into<String>, reference: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: kind.into(),
            reference: reference.into(),
        }
    }

    /// Machine-readable error code for the UI layer.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::Duplicate { .. } => "DUPLICATE",
            StoreError::Unauthenticated => "UNAUTHENTICATED",
            StoreError::EmptyQueue => "EMPTY_QUEUE",
            StoreError::InvalidStatus { .. } => "INVALID_STATUS",
            StoreError::Store(_) => "STORE_ERROR",
        }
    }
}

/// Record-store errors keep their classification where the taxonomy has a
/// matching variant; everything else is wrapped as `Store`.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StoreError::NotFound {
                kind: entity,
                reference: id,
            },
            DbError::UniqueViolation { field, value } => StoreError::Duplicate { field, value },
            other => StoreError::Store(other),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: StoreError = DbError::not_found("Product", "p1").into();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(err.code(), "NOT_FOUND");

        let err: StoreError = DbError::duplicate("vendor name", "Acme").into();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let err: StoreError = DbError::PoolExhausted.into();
        assert!(matches!(err, StoreError::Store(_)));
        assert_eq!(err.code(), "STORE_ERROR");
    }

    #[test]
    fn test_messages() {
        let err = StoreError::not_found("PurchaseOrder", "PO-9999");
        assert_eq!(err.to_string(), "PurchaseOrder not found: PO-9999");

        assert_eq!(StoreError::EmptyQueue.to_string(), "The PO queue is empty");
    }
}
