//! # Identifier Resolver
//!
//! Lookup order: exact match against parcel tracking numbers, then exact
//! match against manifest numbers. A code matching both classes should not
//! occur under correct numbering schemes, so it yields `Ambiguous` rather
//! than a guess.

use crate::normalize::normalize_code;
use pf_02_parcel_lifecycle::ports::outbound::{ManifestRepository, ParcelRepository};
use shared_types::{Manifest, ManifestNumber, Parcel, RepositoryError, TrackingNumber};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// What a scanned code resolved to. All four variants are ordinary,
/// expected outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Parcel(Parcel),
    Manifest(Manifest),
    /// No entity matches. Expected for mistyped codes; never escalated.
    NotFound,
    /// The code matched both a parcel and a manifest.
    Ambiguous,
}

/// Infrastructure failure during resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The caller-supplied deadline elapsed before both lookups finished.
    #[error("resolution timed out")]
    Timeout,

    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for ResolveError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err.0)
    }
}

/// Resolves scanned codes against the parcel and manifest stores.
pub struct IdentifierResolver {
    parcels: Arc<dyn ParcelRepository>,
    manifests: Arc<dyn ManifestRepository>,
}

impl IdentifierResolver {
    pub fn new(parcels: Arc<dyn ParcelRepository>, manifests: Arc<dyn ManifestRepository>) -> Self {
        Self { parcels, manifests }
    }

    /// Resolves a raw scanned or typed code.
    ///
    /// Normalizes the input first; a code that is empty after normalization
    /// is `NotFound` without touching the stores.
    pub async fn resolve(
        &self,
        code: &str,
        timeout: Option<Duration>,
    ) -> Result<Resolution, ResolveError> {
        let Some(normalized) = normalize_code(code) else {
            debug!(raw = code, "nothing scannable after normalization");
            return Ok(Resolution::NotFound);
        };

        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.lookup(&normalized))
                .await
                .map_err(|_| ResolveError::Timeout)?,
            None => self.lookup(&normalized).await,
        }
    }

    async fn lookup(&self, normalized: &str) -> Result<Resolution, ResolveError> {
        let parcel = self
            .parcels
            .get(&TrackingNumber::from(normalized))
            .await?;
        let manifest = self
            .manifests
            .get(&ManifestNumber::from(normalized))
            .await?;

        let resolution = match (parcel, manifest) {
            (Some(_), Some(_)) => Resolution::Ambiguous,
            (Some(parcel), None) => Resolution::Parcel(parcel),
            (None, Some(manifest)) => Resolution::Manifest(manifest),
            (None, None) => Resolution::NotFound,
        };

        debug!(
            code = normalized,
            outcome = match &resolution {
                Resolution::Parcel(_) => "parcel",
                Resolution::Manifest(_) => "manifest",
                Resolution::NotFound => "not_found",
                Resolution::Ambiguous => "ambiguous",
            },
            "code resolved"
        );
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_02_parcel_lifecycle::adapters::memory::{InMemoryManifestStore, InMemoryParcelStore};
    use shared_types::{ManifestType, Parcel};

    fn fixture() -> (Arc<InMemoryParcelStore>, Arc<InMemoryManifestStore>, IdentifierResolver) {
        let parcels = Arc::new(InMemoryParcelStore::new());
        let manifests = Arc::new(InMemoryManifestStore::new());
        let resolver = IdentifierResolver::new(parcels.clone(), manifests.clone());
        (parcels, manifests, resolver)
    }

    fn seed_manifest(manifests: &InMemoryManifestStore, number: &str) {
        manifests.seed(Manifest {
            manifest_number: number.into(),
            manifest_type: ManifestType::Inbound,
            station_id: "YGN-001".into(),
            is_open: true,
            parcels: vec![],
        });
    }

    #[tokio::test]
    async fn test_resolves_parcel_by_exact_tracking_number() {
        let (parcels, _, resolver) = fixture();
        parcels.seed(Parcel::registered("PKG-2024-001245".into(), "YGN-001".into(), 0));

        let resolution = resolver.resolve("PKG-2024-001245", None).await.unwrap();
        assert!(matches!(resolution, Resolution::Parcel(p) if p.tracking_number.as_str() == "PKG-2024-001245"));
    }

    #[tokio::test]
    async fn test_resolves_through_normalization() {
        let (parcels, _, resolver) = fixture();
        parcels.seed(Parcel::registered("PKG-2024-001245".into(), "YGN-001".into(), 0));

        let resolution = resolver.resolve("  pkg-2024-001245\n", None).await.unwrap();
        assert!(matches!(resolution, Resolution::Parcel(_)));
    }

    #[tokio::test]
    async fn test_resolves_manifest_after_parcel_miss() {
        let (_, manifests, resolver) = fixture();
        seed_manifest(&manifests, "MAN-IN-42");

        let resolution = resolver.resolve("man-in-42", None).await.unwrap();
        assert!(matches!(resolution, Resolution::Manifest(m) if m.manifest_number.as_str() == "MAN-IN-42"));
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let (_, _, resolver) = fixture();
        assert_eq!(resolver.resolve("NOPE-123", None).await.unwrap(), Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_blank_scan_is_not_found() {
        let (_, _, resolver) = fixture();
        assert_eq!(resolver.resolve("   ", None).await.unwrap(), Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_code_matching_both_classes_is_ambiguous() {
        let (parcels, manifests, resolver) = fixture();
        parcels.seed(Parcel::registered("SHARED-1".into(), "YGN-001".into(), 0));
        seed_manifest(&manifests, "SHARED-1");

        assert_eq!(resolver.resolve("shared-1", None).await.unwrap(), Resolution::Ambiguous);
    }
}
