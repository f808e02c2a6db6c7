//! In-memory implementations of the parcel and manifest repositories.
//!
//! Used by the station runtime's in-memory wiring and throughout the test
//! suites. The CAS runs under the write lock, which gives the same
//! serialization guarantee the contract asks of a real store.

use crate::ports::outbound::{ManifestRepository, ParcelRepository};
use async_trait::async_trait;
use shared_types::{
    Manifest, ManifestNumber, Parcel, ParcelStatus, RepositoryError, StationId, TrackingNumber,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory implementation of `ParcelRepository`.
pub struct InMemoryParcelStore {
    parcels: RwLock<HashMap<TrackingNumber, Parcel>>,
}

impl InMemoryParcelStore {
    pub fn new() -> Self {
        Self {
            parcels: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces a parcel unconditionally. Registration is the
    /// pickup/booking collaborator's job; this stands in for it.
    pub fn seed(&self, parcel: Parcel) {
        if let Ok(mut parcels) = self.parcels.write() {
            parcels.insert(parcel.tracking_number.clone(), parcel);
        }
    }

    pub fn len(&self) -> usize {
        self.parcels.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryParcelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParcelRepository for InMemoryParcelStore {
    async fn get(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Parcel>, RepositoryError> {
        let parcels = self
            .parcels
            .read()
            .map_err(|_| RepositoryError::new("parcel store lock poisoned"))?;
        Ok(parcels.get(tracking_number).cloned())
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        updated: Parcel,
    ) -> Result<bool, RepositoryError> {
        let mut parcels = self
            .parcels
            .write()
            .map_err(|_| RepositoryError::new("parcel store lock poisoned"))?;

        match parcels.get_mut(&updated.tracking_number) {
            Some(current) if current.version == expected_version => {
                *current = updated;
                Ok(true)
            }
            // Version mismatch or vanished record: the caller lost the race.
            Some(_) | None => Ok(false),
        }
    }

    async fn list_by_station(
        &self,
        station_id: &StationId,
        status: Option<ParcelStatus>,
    ) -> Result<Vec<Parcel>, RepositoryError> {
        let parcels = self
            .parcels
            .read()
            .map_err(|_| RepositoryError::new("parcel store lock poisoned"))?;
        Ok(parcels
            .values()
            .filter(|p| &p.station_id == station_id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect())
    }
}

/// In-memory implementation of `ManifestRepository`.
pub struct InMemoryManifestStore {
    manifests: RwLock<HashMap<ManifestNumber, Manifest>>,
}

impl InMemoryManifestStore {
    pub fn new() -> Self {
        Self {
            manifests: RwLock::new(HashMap::new()),
        }
    }

    pub fn seed(&self, manifest: Manifest) {
        if let Ok(mut manifests) = self.manifests.write() {
            manifests.insert(manifest.manifest_number.clone(), manifest);
        }
    }

    /// Closes a manifest, making it unavailable for further dispatches.
    pub fn close(&self, manifest_number: &ManifestNumber) {
        if let Ok(mut manifests) = self.manifests.write() {
            if let Some(manifest) = manifests.get_mut(manifest_number) {
                manifest.is_open = false;
            }
        }
    }
}

impl Default for InMemoryManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestRepository for InMemoryManifestStore {
    async fn get(
        &self,
        manifest_number: &ManifestNumber,
    ) -> Result<Option<Manifest>, RepositoryError> {
        let manifests = self
            .manifests
            .read()
            .map_err(|_| RepositoryError::new("manifest store lock poisoned"))?;
        Ok(manifests.get(manifest_number).cloned())
    }

    async fn list_open_for_station(
        &self,
        station_id: &StationId,
    ) -> Result<Vec<Manifest>, RepositoryError> {
        let manifests = self
            .manifests
            .read()
            .map_err(|_| RepositoryError::new("manifest store lock poisoned"))?;
        Ok(manifests
            .values()
            .filter(|m| m.is_open && &m.station_id == station_id)
            .cloned()
            .collect())
    }
}
