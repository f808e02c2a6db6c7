//! # Inbound Port - ParcelLifecycleApi
//!
//! Primary driving port for applying a single status transition. The batch
//! coordinator and the station runtime both drive the lifecycle through
//! this trait.

use async_trait::async_trait;
use shared_types::{
    OperatorId, Parcel, ParcelStatus, TrackingNumber, TransitionError, TransitionMetadata,
};
use std::time::Duration;
use uuid::Uuid;

/// One transition attempt against one parcel.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub tracking_number: TrackingNumber,
    pub to_status: ParcelStatus,
    pub metadata: TransitionMetadata,
    pub operator_id: OperatorId,
    /// Caller-supplied deadline for the read-validate-write phase. The audit
    /// append runs outside the deadline so every attempt leaves a record.
    pub timeout: Option<Duration>,
}

impl TransitionRequest {
    pub fn new(
        tracking_number: impl Into<TrackingNumber>,
        to_status: ParcelStatus,
        metadata: TransitionMetadata,
        operator_id: impl Into<OperatorId>,
    ) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            to_status,
            metadata,
            operator_id: operator_id.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Successful outcome of a transition attempt.
#[derive(Debug, Clone)]
pub struct TransitionReceipt {
    /// Parcel state after the attempt (unchanged for a no-op repeat).
    pub parcel: Parcel,
    /// True when this was an idempotent repeat scan rather than a state change.
    pub no_op: bool,
    /// The audit record appended for this attempt.
    pub operation_id: Uuid,
}

/// Primary API of the parcel lifecycle subsystem.
///
/// # Contract
///
/// - Validates the edge against the parcel's status *as read at the start of
///   the attempt*; invalid edges are rejected, never coerced.
/// - Every call, successful or rejected, appends exactly one
///   [`shared_types::Operation`] record before returning.
/// - Conflicting concurrent writes surface as `StaleState`; the caller
///   re-reads and retries.
#[async_trait]
pub trait ParcelLifecycleApi: Send + Sync {
    /// Applies one transition to one parcel.
    ///
    /// # Errors
    /// - `InvalidTransition`: edge not permitted from the current status
    /// - `MissingMetadata`: a required field is absent for this edge
    /// - `ParcelNotFound`: unknown tracking number
    /// - `ManifestNotOpen`: dispatch named a manifest that cannot accept it
    /// - `StaleState`: lost a write race; re-read and retry
    /// - `Timeout`: the caller-supplied deadline elapsed
    /// - `AuditWriteFailed`: the audit record could not be persisted (the
    ///   state change, if any, is compensated)
    async fn apply_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionReceipt, TransitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe (can be used as dyn ParcelLifecycleApi)
    fn _assert_object_safe(_: &dyn ParcelLifecycleApi) {}

    #[test]
    fn test_request_builder() {
        let request = TransitionRequest::new(
            "PKG-1",
            ParcelStatus::Sorting,
            TransitionMetadata::for_sorting(),
            "op-7",
        )
        .with_timeout(Duration::from_secs(5));
        assert_eq!(request.tracking_number, TrackingNumber::from("PKG-1"));
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }
}
