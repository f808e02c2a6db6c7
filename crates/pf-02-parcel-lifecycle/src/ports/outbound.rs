//! Outbound (Driven) ports for the parcel lifecycle subsystem.
//!
//! These traits define the dependencies on the external durable store and
//! the audit sink. Any persistence technology satisfying these contracts is
//! conformant; the engine carries no storage technology of its own.

use async_trait::async_trait;
use shared_types::{
    AuditError, Manifest, ManifestNumber, Operation, OperationId, Parcel, ParcelStatus,
    RepositoryError, StationId, TrackingNumber,
};

/// The parcel store.
///
/// `compare_and_swap` is the only mutation path, which is what serializes
/// same-parcel contention without a station-wide lock: two operators sorting
/// two different parcels never block each other.
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Fetch a parcel by tracking number.
    async fn get(&self, tracking_number: &TrackingNumber)
        -> Result<Option<Parcel>, RepositoryError>;

    /// Atomically replace the parcel iff its stored version equals
    /// `expected_version`.
    ///
    /// Returns `Ok(false)` on a version mismatch (or a vanished record); the
    /// caller maps that to `StaleState` and never overwrites.
    async fn compare_and_swap(
        &self,
        expected_version: u64,
        updated: Parcel,
    ) -> Result<bool, RepositoryError>;

    /// All parcels currently at `station_id`, optionally narrowed by status.
    async fn list_by_station(
        &self,
        station_id: &StationId,
        status: Option<ParcelStatus>,
    ) -> Result<Vec<Parcel>, RepositoryError>;
}

/// The manifest store (read-only from this subsystem's point of view).
#[async_trait]
pub trait ManifestRepository: Send + Sync {
    async fn get(
        &self,
        manifest_number: &ManifestNumber,
    ) -> Result<Option<Manifest>, RepositoryError>;

    async fn list_open_for_station(
        &self,
        station_id: &StationId,
    ) -> Result<Vec<Manifest>, RepositoryError>;
}

/// Durable, append-only audit sink.
///
/// Not best-effort: a failed insert fails the transition that triggered it.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends one immutable operation record.
    async fn insert(&self, record: Operation) -> Result<OperationId, AuditError>;
}
