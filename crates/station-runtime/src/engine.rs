//! # Station Engine
//!
//! The composition root. Wires the resolver, the lifecycle state machine,
//! the batch coordinator, the operation log, and the statistics service
//! behind one facade, and exposes each subsystem's operations unchanged.

use crate::config::EngineConfig;
use pf_01_identifier_resolver::{IdentifierResolver, Resolution, ResolveError};
use pf_02_parcel_lifecycle::adapters::memory::{InMemoryManifestStore, InMemoryParcelStore};
use pf_02_parcel_lifecycle::domain::machine::LifecycleService;
use pf_02_parcel_lifecycle::ports::inbound::{
    ParcelLifecycleApi, TransitionReceipt, TransitionRequest,
};
use pf_02_parcel_lifecycle::ports::outbound::{AuditSink, ManifestRepository, ParcelRepository};
use pf_03_batch_sorting::{BatchCoordinator, BatchReport, CancelFlag};
use pf_04_operation_log::filter::OperationFilter;
use pf_04_operation_log::ports::{OperationQuery, OperationStream};
use pf_04_operation_log::InMemoryOperationLog;
use pf_05_station_stats::{StationSnapshot, StationStatsService, StatsError};
use shared_types::{
    AuditError, OperatorId, ParcelStatus, StationId, SystemTimeSource, TimeSource, TrackingNumber,
    TransitionError, TransitionMetadata,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Handles to the in-memory stores behind [`StationEngine::in_memory`],
/// kept for seeding and inspection.
pub struct StationStores {
    pub parcels: Arc<InMemoryParcelStore>,
    pub manifests: Arc<InMemoryManifestStore>,
    pub log: Arc<InMemoryOperationLog>,
}

/// A fully wired station engine.
pub struct StationEngine {
    config: EngineConfig,
    resolver: IdentifierResolver,
    lifecycle: Arc<dyn ParcelLifecycleApi>,
    coordinator: BatchCoordinator,
    query: Arc<dyn OperationQuery>,
    stats: StationStatsService,
}

impl StationEngine {
    /// Wires the engine onto caller-supplied ports.
    ///
    /// `sink` and `query` usually point at the same append-only log; the
    /// engine never assumes so.
    pub fn new(
        config: EngineConfig,
        parcels: Arc<dyn ParcelRepository>,
        manifests: Arc<dyn ManifestRepository>,
        sink: Arc<dyn AuditSink>,
        query: Arc<dyn OperationQuery>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let lifecycle: Arc<dyn ParcelLifecycleApi> = Arc::new(LifecycleService::new(
            parcels.clone(),
            manifests.clone(),
            sink,
            time.clone(),
        ));
        let resolver = IdentifierResolver::new(parcels.clone(), manifests);
        let coordinator = BatchCoordinator::new(lifecycle.clone(), config.batch.clone());
        let stats = StationStatsService::new(parcels, query.clone(), time);

        info!(
            max_in_flight = config.batch.max_in_flight,
            "station engine wired"
        );
        Self {
            config,
            resolver,
            lifecycle,
            coordinator,
            query,
            stats,
        }
    }

    /// An engine backed entirely by in-memory stores, plus handles to them.
    pub fn in_memory(config: EngineConfig) -> (Self, StationStores) {
        let parcels = Arc::new(InMemoryParcelStore::new());
        let manifests = Arc::new(InMemoryManifestStore::new());
        let log = Arc::new(InMemoryOperationLog::new());

        let engine = Self::new(
            config,
            parcels.clone(),
            manifests.clone(),
            log.clone(),
            log.clone(),
            Arc::new(SystemTimeSource),
        );
        let stores = StationStores {
            parcels,
            manifests,
            log,
        };
        (engine, stores)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves a scanned or typed code under the configured deadline.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, ResolveError> {
        self.resolver
            .resolve(code, Some(self.config.resolve_timeout))
            .await
    }

    /// Applies one status transition to one parcel.
    pub async fn apply_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionReceipt, TransitionError> {
        self.lifecycle.apply_transition(request).await
    }

    /// Fans one transition out over a selected parcel set.
    pub async fn apply_batch(
        &self,
        parcel_ids: HashSet<TrackingNumber>,
        to_status: ParcelStatus,
        shared_metadata: TransitionMetadata,
        operator_id: OperatorId,
        cancel: CancelFlag,
    ) -> BatchReport {
        self.coordinator
            .apply_batch(parcel_ids, to_status, shared_metadata, operator_id, cancel)
            .await
    }

    /// Streams audit records matching `filter`, oldest first.
    pub async fn operations(&self, filter: &OperationFilter) -> Result<OperationStream, AuditError> {
        self.query.query(filter).await
    }

    /// Full audit trail of one parcel, oldest first.
    pub async fn parcel_history(
        &self,
        tracking_number: impl Into<TrackingNumber>,
    ) -> Result<OperationStream, AuditError> {
        self.query
            .query(&OperationFilter::new().with_tracking_number(tracking_number))
            .await
    }

    /// Current counters for one station.
    pub async fn snapshot(&self, station_id: &StationId) -> Result<StationSnapshot, StatsError> {
        self.stats.snapshot(station_id).await
    }
}
