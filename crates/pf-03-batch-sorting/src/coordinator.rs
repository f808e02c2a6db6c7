//! # Batch Coordinator
//!
//! Fans one transition out over a parcel set with a fixed pool of
//! `max_in_flight` workers draining a shared queue, tracking per-item
//! success and failure independently.

use crate::cancel::CancelFlag;
use crate::config::BatchConfig;
use crate::report::{BatchOutcome, BatchReport};
use pf_02_parcel_lifecycle::ports::inbound::{ParcelLifecycleApi, TransitionRequest};
use shared_types::{OperatorId, ParcelStatus, TrackingNumber, TransitionMetadata};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Applies one transition to many parcels at once.
pub struct BatchCoordinator {
    lifecycle: Arc<dyn ParcelLifecycleApi>,
    config: BatchConfig,
}

impl BatchCoordinator {
    pub fn new(lifecycle: Arc<dyn ParcelLifecycleApi>, config: BatchConfig) -> Self {
        Self {
            lifecycle,
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Applies `to_status` with `shared_metadata` to every parcel in the set.
    ///
    /// Never aborts the whole batch for one failed item. The report carries
    /// per-item outcomes plus aggregate counts; `report.retryable()` is the
    /// set to re-submit.
    pub async fn apply_batch(
        &self,
        parcel_ids: HashSet<TrackingNumber>,
        to_status: ParcelStatus,
        shared_metadata: TransitionMetadata,
        operator_id: OperatorId,
        cancel: CancelFlag,
    ) -> BatchReport {
        let total = parcel_ids.len();
        debug!(total, to_status = %to_status, operator = %operator_id, "batch started");

        let queue: Arc<Mutex<VecDeque<TrackingNumber>>> =
            Arc::new(Mutex::new(parcel_ids.into_iter().collect()));
        let worker_count = self.config.max_in_flight.min(total).max(1);
        let mut workers: JoinSet<Vec<(TrackingNumber, BatchOutcome)>> = JoinSet::new();

        for _ in 0..worker_count {
            let lifecycle = self.lifecycle.clone();
            let queue = queue.clone();
            let cancel = cancel.clone();
            let metadata = shared_metadata.clone();
            let operator_id = operator_id.clone();
            let item_timeout = self.config.item_timeout;

            workers.spawn(async move {
                let mut done = Vec::new();
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(tracking_number) = next else {
                        break;
                    };

                    // A cancelled batch keeps draining the queue so every
                    // item is accounted for, but stops calling the
                    // lifecycle; in-flight items run to completion.
                    if cancel.is_cancelled() {
                        done.push((tracking_number, BatchOutcome::Cancelled));
                        continue;
                    }

                    let request = TransitionRequest::new(
                        tracking_number.clone(),
                        to_status,
                        metadata.clone(),
                        operator_id.clone(),
                    )
                    .with_timeout(item_timeout);

                    let outcome = match lifecycle.apply_transition(request).await {
                        Ok(receipt) => BatchOutcome::Updated(receipt.parcel),
                        Err(err) => BatchOutcome::Failed(err),
                    };
                    done.push((tracking_number, outcome));
                }
                done
            });
        }

        let mut outcomes = HashMap::with_capacity(total);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(done) => outcomes.extend(done),
                Err(err) => {
                    // A panicked worker loses its drained items; they simply
                    // stay out of the report. Should not happen.
                    warn!(error = %err, "batch worker failed to join");
                }
            }
        }

        let report = BatchReport::new(outcomes);
        info!(
            total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            "batch finished"
        );
        report
    }
}
