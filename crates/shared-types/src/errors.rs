//! # Error Types
//!
//! Defines the error taxonomy shared across subsystems.
//!
//! Resolution misses (`NotFound`/`Ambiguous`) are *outcomes*, not errors, and
//! live with the identifier resolver. Everything here is a typed failure that
//! callers are expected to match on; a batch continues past per-item failures.

use crate::entities::{ManifestNumber, ParcelStatus, TrackingNumber};
use thiserror::Error;

/// Failure of a single transition attempt.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    /// The edge is not in the transition table from the current status.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: ParcelStatus, to: ParcelStatus },

    /// A metadata field required for this edge was absent.
    #[error("missing metadata `{field}` for transition to {to}")]
    MissingMetadata { field: &'static str, to: ParcelStatus },

    /// No parcel carries this tracking number.
    #[error("parcel not found: {0}")]
    ParcelNotFound(TrackingNumber),

    /// The parcel changed between read and write; the caller must re-read
    /// and retry instead of overwriting a concurrent operator's change.
    #[error("stale state for {tracking_number}: expected version {expected_version}")]
    StaleState {
        tracking_number: TrackingNumber,
        expected_version: u64,
    },

    /// Dispatch named a manifest that is missing, closed, inbound, or at a
    /// different station.
    #[error("manifest {0} is not an open outbound manifest at this station")]
    ManifestNotOpen(ManifestNumber),

    /// The caller-supplied deadline elapsed before the attempt completed.
    #[error("transition timed out")]
    Timeout,

    /// The batch was cancelled before this item was processed.
    #[error("transition cancelled")]
    Cancelled,

    /// The audit record could not be persisted. Fatal: an un-audited state
    /// change is unacceptable, so the transition is aborted.
    #[error("audit write failed: {0}")]
    AuditWriteFailed(String),

    /// The backing parcel or manifest store failed.
    #[error("repository error: {0}")]
    Repository(String),
}

/// Failure inside a parcel or manifest repository implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("repository error: {0}")]
pub struct RepositoryError(pub String);

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure inside an audit sink or operation log implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("audit sink error: {0}")]
pub struct AuditError(pub String);

impl AuditError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<RepositoryError> for TransitionError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err.0)
    }
}

impl From<AuditError> for TransitionError {
    fn from(err: AuditError) -> Self {
        Self::AuditWriteFailed(err.0)
    }
}
