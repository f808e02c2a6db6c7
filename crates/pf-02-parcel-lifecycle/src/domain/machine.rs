//! # Lifecycle Service
//!
//! The single writer of `Parcel.status` and the per-edge metadata it carries
//! (`sort_bin`/`route_code`, `manifest_number`, `exception_reason`).
//!
//! Every attempt is one atomic read-validate-write unit against the parcel's
//! current status: read, validate the edge, CAS the new state, append the
//! audit record. The store only needs compare-and-swap semantics; a lost
//! race surfaces as `StaleState` and the caller re-reads and retries.
//!
//! The caller's deadline covers only the read-and-validate phase. The CAS
//! commit and the audit append run outside it, so a timeout can never fire
//! after the store has already swapped: once validation passes, the attempt
//! either commits or reports a lost race.
//!
//! ## Attempt flow
//!
//! ```text
//! ┌─ deadline ──────────────────────────────────────────────────────┐
//! │ read parcel ──missing──→ Rejected(ParcelNotFound)               │
//! │     │                                                           │
//! │ already in target w/ equivalent metadata? ──yes──→ NoOp         │
//! │     │no                                                         │
//! │ edge legal? metadata complete? manifest open? ──no──→ Rejected  │
//! └─────┼───────────────────────────────────────────────────────────┘
//!       │yes
//! CAS(version) ──lost race──→ Rejected(StaleState)
//!     │won
//! append audit ──failed──→ compensate CAS, AuditWriteFailed
//!     │ok
//! Applied
//! ```

use crate::domain::transitions::{missing_metadata, transition_allowed};
use crate::ports::inbound::{ParcelLifecycleApi, TransitionReceipt, TransitionRequest};
use crate::ports::outbound::{AuditSink, ManifestRepository, ParcelRepository};
use async_trait::async_trait;
use shared_types::{
    ManifestType, Operation, OperationOutcome, Parcel, ParcelStatus, StationId, TimeSource,
    TransitionError, TransitionMetadata,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The parcel state machine service.
pub struct LifecycleService {
    parcels: Arc<dyn ParcelRepository>,
    manifests: Arc<dyn ManifestRepository>,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
}

/// A validated attempt, ready to commit.
enum Validated {
    /// Repeat scan, nothing to write.
    NoOpRepeat(Parcel),
    /// The edge checked out; `updated` is the post-image to swap in.
    Apply { prior: Parcel, updated: Parcel },
}

/// A committed attempt.
struct AttemptSuccess {
    /// Pre-image, kept for compensation if the audit append fails.
    prior: Parcel,
    /// Post-image (identical to `prior` for a no-op repeat).
    updated: Parcel,
    no_op: bool,
}

/// A rejected attempt, with whatever context the read phase produced.
struct AttemptFailure {
    error: TransitionError,
    from_status: Option<ParcelStatus>,
    station_id: Option<StationId>,
}

impl AttemptFailure {
    fn early(error: TransitionError) -> Self {
        Self {
            error,
            from_status: None,
            station_id: None,
        }
    }

    fn on(parcel: &Parcel, error: TransitionError) -> Self {
        Self {
            error,
            from_status: Some(parcel.status),
            station_id: Some(parcel.station_id.clone()),
        }
    }
}

impl LifecycleService {
    pub fn new(
        parcels: Arc<dyn ParcelRepository>,
        manifests: Arc<dyn ManifestRepository>,
        audit: Arc<dyn AuditSink>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            parcels,
            manifests,
            audit,
            time,
        }
    }

    /// The read-and-validate phase, run under the caller's deadline. Performs
    /// no writes; the commit happens in `commit`, outside the deadline.
    async fn validate(&self, request: &TransitionRequest) -> Result<Validated, AttemptFailure> {
        let parcel = self
            .parcels
            .get(&request.tracking_number)
            .await
            .map_err(|err| AttemptFailure::early(err.into()))?;

        let Some(parcel) = parcel else {
            return Err(AttemptFailure::early(TransitionError::ParcelNotFound(
                request.tracking_number.clone(),
            )));
        };

        // Idempotent repeat scan: already there, nothing to write.
        if is_noop_repeat(&parcel, request.to_status, &request.metadata) {
            return Ok(Validated::NoOpRepeat(parcel));
        }

        if !transition_allowed(parcel.status, request.to_status) {
            let error = TransitionError::InvalidTransition {
                from: parcel.status,
                to: request.to_status,
            };
            return Err(AttemptFailure::on(&parcel, error));
        }

        if let Some(field) = missing_metadata(request.to_status, &request.metadata) {
            let error = TransitionError::MissingMetadata {
                field,
                to: request.to_status,
            };
            return Err(AttemptFailure::on(&parcel, error));
        }

        if request.to_status == ParcelStatus::Dispatched {
            self.check_outbound_manifest(&parcel, &request.metadata)
                .await?;
        }

        let mut updated = parcel.clone();
        apply_effect(&mut updated, request.to_status, &request.metadata, self.time.now());

        Ok(Validated::Apply {
            prior: parcel,
            updated,
        })
    }

    /// Commits a validated attempt. Runs outside the caller's deadline, so
    /// the swap either lands or surfaces a lost race; it is never abandoned
    /// mid-write by a timeout.
    async fn commit(&self, validated: Validated) -> Result<AttemptSuccess, AttemptFailure> {
        let (prior, updated) = match validated {
            Validated::NoOpRepeat(parcel) => {
                return Ok(AttemptSuccess {
                    updated: parcel.clone(),
                    prior: parcel,
                    no_op: true,
                });
            }
            Validated::Apply { prior, updated } => (prior, updated),
        };

        let swapped = self
            .parcels
            .compare_and_swap(prior.version, updated.clone())
            .await
            .map_err(|err| AttemptFailure::on(&prior, err.into()))?;

        if !swapped {
            let error = TransitionError::StaleState {
                tracking_number: prior.tracking_number.clone(),
                expected_version: prior.version,
            };
            return Err(AttemptFailure::on(&prior, error));
        }

        Ok(AttemptSuccess {
            prior,
            updated,
            no_op: false,
        })
    }

    /// Dispatch precondition: the named manifest must be an open outbound
    /// manifest at the parcel's current station. Membership maintenance is
    /// the manifest collaborator's job, not the state machine's.
    async fn check_outbound_manifest(
        &self,
        parcel: &Parcel,
        metadata: &TransitionMetadata,
    ) -> Result<(), AttemptFailure> {
        // Presence was validated with the rest of the metadata.
        let Some(manifest_number) = metadata.manifest_number.as_ref() else {
            return Ok(());
        };

        let manifest = self
            .manifests
            .get(manifest_number)
            .await
            .map_err(|err| AttemptFailure::on(parcel, err.into()))?;

        let acceptable = manifest.as_ref().is_some_and(|m| {
            m.is_open && m.manifest_type == ManifestType::Outbound && m.station_id == parcel.station_id
        });

        if acceptable {
            Ok(())
        } else {
            Err(AttemptFailure::on(
                parcel,
                TransitionError::ManifestNotOpen(manifest_number.clone()),
            ))
        }
    }

    /// Reverses a CAS write whose audit record could not be persisted.
    ///
    /// Restores the pre-image under a fresh version so the un-audited change
    /// does not survive. An external store providing real transactions makes
    /// this path unreachable.
    async fn compensate(&self, success: &AttemptSuccess) {
        let mut restored = success.prior.clone();
        restored.version = success.updated.version + 1;

        match self
            .parcels
            .compare_and_swap(success.updated.version, restored)
            .await
        {
            Ok(true) => {
                warn!(
                    tracking_number = %success.prior.tracking_number,
                    "compensated state change after audit write failure"
                );
            }
            Ok(false) | Err(_) => {
                error!(
                    tracking_number = %success.prior.tracking_number,
                    "failed to compensate state change after audit write failure"
                );
            }
        }
    }

    fn build_record(
        &self,
        request: &TransitionRequest,
        from_status: Option<ParcelStatus>,
        station_id: Option<StationId>,
        outcome: OperationOutcome,
    ) -> Operation {
        Operation {
            operation_id: Uuid::new_v4(),
            recorded_at: self.time.now(),
            operator_id: request.operator_id.clone(),
            tracking_number: request.tracking_number.clone(),
            station_id,
            from_status,
            to_status: request.to_status,
            outcome,
            metadata: request.metadata.clone(),
        }
    }
}

#[async_trait]
impl ParcelLifecycleApi for LifecycleService {
    async fn apply_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionReceipt, TransitionError> {
        debug!(
            tracking_number = %request.tracking_number,
            to_status = %request.to_status,
            operator = %request.operator_id,
            "transition attempt"
        );

        let validated = match request.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.validate(&request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AttemptFailure::early(TransitionError::Timeout)),
            },
            None => self.validate(&request).await,
        };

        // The commit is outside the deadline: a timeout firing after the
        // store swapped would record a rejection for an applied change.
        let attempt = match validated {
            Ok(validated) => self.commit(validated).await,
            Err(failure) => Err(failure),
        };

        // Exactly one audit record per attempt, appended outside the
        // caller's deadline so even a timed-out scan leaves a trace.
        match attempt {
            Ok(success) => {
                let outcome = if success.no_op {
                    OperationOutcome::NoOp
                } else {
                    OperationOutcome::Applied
                };
                let record = self.build_record(
                    &request,
                    Some(success.prior.status),
                    Some(success.prior.station_id.clone()),
                    outcome,
                );
                let operation_id = record.operation_id;

                match self.audit.insert(record).await {
                    Ok(_) => {
                        if success.no_op {
                            debug!(
                                tracking_number = %request.tracking_number,
                                status = %success.updated.status,
                                "no-op repeat scan"
                            );
                        } else {
                            info!(
                                tracking_number = %request.tracking_number,
                                from = %success.prior.status,
                                to = %success.updated.status,
                                version = success.updated.version,
                                "transition applied"
                            );
                        }
                        Ok(TransitionReceipt {
                            parcel: success.updated,
                            no_op: success.no_op,
                            operation_id,
                        })
                    }
                    Err(err) => {
                        error!(
                            tracking_number = %request.tracking_number,
                            error = %err,
                            "audit write failed, aborting transition"
                        );
                        if !success.no_op {
                            self.compensate(&success).await;
                        }
                        Err(TransitionError::AuditWriteFailed(err.0))
                    }
                }
            }
            Err(failure) => {
                let record = self.build_record(
                    &request,
                    failure.from_status,
                    failure.station_id,
                    OperationOutcome::Rejected {
                        reason: failure.error.to_string(),
                    },
                );
                warn!(
                    tracking_number = %request.tracking_number,
                    to_status = %request.to_status,
                    error = %failure.error,
                    "transition rejected"
                );
                // The rejection record is part of the contract too; losing it
                // is an audit failure in its own right.
                self.audit.insert(record).await?;
                Err(failure.error)
            }
        }
    }
}

/// True when the parcel is already in `to` with equivalent effective
/// metadata, so the scan is a repeat rather than a new change.
///
/// Equivalence is per edge, against what the applied transition recorded on
/// the parcel: a different bin on a sorted parcel, a different manifest on a
/// dispatched one, or a different reason on an exception is a rejected
/// re-attempt, not a repeat.
fn is_noop_repeat(parcel: &Parcel, to: ParcelStatus, metadata: &TransitionMetadata) -> bool {
    if parcel.status != to {
        return false;
    }
    match to {
        ParcelStatus::Sorted => {
            parcel.sort_bin == metadata.sort_bin && parcel.route_code == metadata.route_code
        }
        ParcelStatus::Dispatched => parcel.manifest_number == metadata.manifest_number,
        ParcelStatus::Returned | ParcelStatus::Lost => {
            parcel.exception_reason == metadata.reason
        }
        _ => true,
    }
}

/// Mutates the post-image for an applied transition. Each edge records its
/// effective metadata on the parcel; repeat detection compares against it.
fn apply_effect(
    parcel: &mut Parcel,
    to: ParcelStatus,
    metadata: &TransitionMetadata,
    now: shared_types::Timestamp,
) {
    parcel.status = to;
    parcel.last_transition_at = now;
    parcel.version += 1;
    match to {
        ParcelStatus::Sorted => {
            parcel.sort_bin = metadata.sort_bin.clone();
            parcel.route_code = metadata.route_code.clone();
        }
        ParcelStatus::Dispatched => {
            parcel.manifest_number = metadata.manifest_number.clone();
        }
        ParcelStatus::Returned | ParcelStatus::Lost => {
            parcel.exception_reason = metadata.reason.clone();
        }
        _ => {}
    }
}
