//! # Statistics Aggregator
//!
//! Queries the parcel repository and the operation log; owns no state of
//! its own.

use crate::snapshot::StationSnapshot;
use pf_02_parcel_lifecycle::ports::outbound::ParcelRepository;
use pf_04_operation_log::filter::{OperationFilter, OutcomeKind};
use pf_04_operation_log::ports::OperationQuery;
use shared_types::{
    day_start, AuditError, ParcelStatus, RepositoryError, StationId, TimeSource,
};
use std::sync::Arc;
use tracing::debug;

/// Failure while assembling a snapshot.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StatsError {
    #[error("repository error: {0}")]
    Repository(String),

    #[error("operation log error: {0}")]
    Log(String),
}

impl From<RepositoryError> for StatsError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err.0)
    }
}

impl From<AuditError> for StatsError {
    fn from(err: AuditError) -> Self {
        Self::Log(err.0)
    }
}

/// Read-only station counter service.
pub struct StationStatsService {
    parcels: Arc<dyn ParcelRepository>,
    log: Arc<dyn OperationQuery>,
    time: Arc<dyn TimeSource>,
}

impl StationStatsService {
    pub fn new(
        parcels: Arc<dyn ParcelRepository>,
        log: Arc<dyn OperationQuery>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self { parcels, log, time }
    }

    /// Assembles the current counters for `station_id`.
    pub async fn snapshot(&self, station_id: &StationId) -> Result<StationSnapshot, StatsError> {
        let taken_at = self.time.now();
        let today = day_start(taken_at);

        let parcels = self.parcels.list_by_station(station_id, None).await?;
        let count_status = |status: ParcelStatus| {
            parcels.iter().filter(|p| p.status == status).count()
        };

        let today_filter = OperationFilter::new()
            .with_station(station_id.clone())
            .since(today);

        let attempts_today = self.log.count(&today_filter).await?;
        let rejected_today = self
            .log
            .count(&today_filter.clone().with_outcome(OutcomeKind::Rejected))
            .await?;
        let dispatched_today = self
            .log
            .count(
                &today_filter
                    .with_outcome(OutcomeKind::Applied)
                    .with_to_status(ParcelStatus::Dispatched),
            )
            .await?;

        let error_rate_today = if attempts_today == 0 {
            0.0
        } else {
            rejected_today as f64 / attempts_today as f64
        };

        let snapshot = StationSnapshot {
            station_id: station_id.clone(),
            inbound: count_status(ParcelStatus::InboundReceived),
            sorting: count_status(ParcelStatus::Sorting),
            sorted: count_status(ParcelStatus::Sorted),
            dispatched_today,
            error_rate_today,
            taken_at,
        };
        debug!(
            station = %station_id,
            inbound = snapshot.inbound,
            sorting = snapshot.sorting,
            sorted = snapshot.sorted,
            dispatched_today = snapshot.dispatched_today,
            "snapshot taken"
        );
        Ok(snapshot)
    }
}
