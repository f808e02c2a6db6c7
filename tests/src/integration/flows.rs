//! # End-to-End Station Scenarios
//!
//! Drives a fully wired in-memory station engine through realistic shifts:
//! scan, sort, bulk-sort, dispatch, then checks the audit trail and the
//! station counters against what the scenario did.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use pf_01_identifier_resolver::Resolution;
    use pf_02_parcel_lifecycle::adapters::memory::{InMemoryManifestStore, InMemoryParcelStore};
    use pf_02_parcel_lifecycle::ports::inbound::TransitionRequest;
    use pf_02_parcel_lifecycle::ports::outbound::ParcelRepository;
    use pf_03_batch_sorting::{BatchOutcome, CancelFlag};
    use pf_04_operation_log::filter::{OperationFilter, OutcomeKind};
    use pf_04_operation_log::InMemoryOperationLog;
    use shared_types::{
        Manifest, ManifestType, MockTimeSource, Operation, Parcel, ParcelStatus,
        TransitionMetadata, MS_PER_DAY,
    };
    use station_runtime::{EngineConfig, StationEngine, StationStores};
    use tokio_stream::StreamExt;

    const STATION: &str = "YGN-001";
    const NOW: u64 = 10 * MS_PER_DAY + 3_600_000;

    fn engine_at(now: u64) -> (StationEngine, StationStores, Arc<MockTimeSource>) {
        let parcels = Arc::new(InMemoryParcelStore::new());
        let manifests = Arc::new(InMemoryManifestStore::new());
        let log = Arc::new(InMemoryOperationLog::new());
        let time = Arc::new(MockTimeSource::new(now));
        let engine = StationEngine::new(
            EngineConfig::default(),
            parcels.clone(),
            manifests.clone(),
            log.clone(),
            log.clone(),
            time.clone(),
        );
        (
            engine,
            StationStores {
                parcels,
                manifests,
                log,
            },
            time,
        )
    }

    fn seed_inbound(stores: &StationStores, tracking: &str) {
        stores
            .parcels
            .seed(Parcel::registered(tracking.into(), STATION.into(), NOW - 1000));
    }

    fn seed_open_outbound(stores: &StationStores, number: &str) {
        stores.manifests.seed(Manifest {
            manifest_number: number.into(),
            manifest_type: ManifestType::Outbound,
            station_id: STATION.into(),
            is_open: true,
            parcels: vec![],
        });
    }

    #[tokio::test]
    async fn test_single_parcel_full_lifecycle() {
        let (engine, stores, _) = engine_at(NOW);
        seed_inbound(&stores, "PKG-2024-001245");
        seed_open_outbound(&stores, "MAN-OUT-77");

        // The operator's scan arrives with stray whitespace and lowercase.
        let resolution = engine.resolve("  pkg-2024-001245\n").await.unwrap();
        let Resolution::Parcel(parcel) = resolution else {
            panic!("expected a parcel, got {resolution:?}");
        };
        assert_eq!(parcel.status, ParcelStatus::InboundReceived);

        for (to, metadata) in [
            (ParcelStatus::Sorting, TransitionMetadata::for_sorting()),
            (ParcelStatus::Sorted, TransitionMetadata::for_sorted("A4", "R002")),
            (ParcelStatus::Dispatched, TransitionMetadata::for_dispatch("MAN-OUT-77")),
        ] {
            let receipt = engine
                .apply_transition(TransitionRequest::new("PKG-2024-001245", to, metadata, "op-7"))
                .await
                .unwrap();
            assert_eq!(receipt.parcel.status, to);
            assert!(!receipt.no_op);
        }

        // Three scans, three records, oldest first, all applied.
        let history: Vec<Operation> = engine
            .parcel_history("PKG-2024-001245")
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at));
        assert!(history.iter().all(|r| !r.outcome.is_rejected()));
        assert_eq!(history[2].to_status, ParcelStatus::Dispatched);

        // The terminal parcel refuses further movement.
        let err = engine
            .apply_transition(TransitionRequest::new(
                "PKG-2024-001245",
                ParcelStatus::Sorting,
                TransitionMetadata::for_sorting(),
                "op-7",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, shared_types::TransitionError::InvalidTransition { .. }));

        let snapshot = engine.snapshot(&STATION.into()).await.unwrap();
        assert_eq!(snapshot.dispatched_today, 1);
        assert_eq!(snapshot.inbound, 0);
        // 4 attempts today, 1 rejected.
        assert!((snapshot.error_rate_today - 0.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_bulk_sort_with_partial_failure() {
        let (engine, stores, _) = engine_at(NOW);
        for i in 1..=4 {
            seed_inbound(&stores, &format!("PKG-{i}"));
        }
        // PKG-GHOST was never registered here; its label is in the pile anyway.
        let selection: HashSet<_> = ["PKG-1", "PKG-2", "PKG-3", "PKG-4", "PKG-GHOST"]
            .iter()
            .map(|n| (*n).into())
            .collect();

        let report = engine
            .apply_batch(
                selection,
                ParcelStatus::Sorting,
                TransitionMetadata::for_sorting(),
                "op-7".into(),
                CancelFlag::new(),
            )
            .await;

        assert_eq!(report.len(), 5);
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcome(&"PKG-GHOST".into()),
            Some(BatchOutcome::Failed(shared_types::TransitionError::ParcelNotFound(_)))
        ));

        // One failed item never blocks the rest.
        for i in 1..=4 {
            let parcel = stores
                .parcels
                .get(&format!("PKG-{i}").into())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(parcel.status, ParcelStatus::Sorting);
        }

        // Five attempts, five records, the ghost's rejection included.
        assert_eq!(stores.log.len(), 5);
        let rejected = engine
            .operations(&OperationFilter::new().with_outcome(OutcomeKind::Rejected))
            .await
            .unwrap()
            .collect::<Vec<_>>()
            .await;
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].tracking_number.as_str(), "PKG-GHOST");
    }

    #[tokio::test]
    async fn test_repeat_scan_audited_without_second_write() {
        let (engine, stores, _) = engine_at(NOW);
        seed_inbound(&stores, "PKG-1");

        let first = engine
            .apply_transition(TransitionRequest::new(
                "PKG-1",
                ParcelStatus::Sorting,
                TransitionMetadata::for_sorting(),
                "op-7",
            ))
            .await
            .unwrap();
        let second = engine
            .apply_transition(TransitionRequest::new(
                "PKG-1",
                ParcelStatus::Sorting,
                TransitionMetadata::for_sorting(),
                "op-7",
            ))
            .await
            .unwrap();

        assert!(!first.no_op);
        assert!(second.no_op);
        assert_eq!(first.parcel.version, second.parcel.version);

        let history: Vec<Operation> =
            engine.parcel_history("PKG-1").await.unwrap().collect().await;
        assert_eq!(history.len(), 2);
        assert_eq!(OutcomeKind::of(&history[1].outcome), OutcomeKind::NoOp);
    }

    #[tokio::test]
    async fn test_counters_roll_over_at_utc_midnight() {
        let (engine, stores, time) = engine_at(NOW);
        seed_inbound(&stores, "PKG-1");
        seed_open_outbound(&stores, "MAN-OUT-77");

        for (to, metadata) in [
            (ParcelStatus::Sorting, TransitionMetadata::for_sorting()),
            (ParcelStatus::Sorted, TransitionMetadata::for_sorted("A1", "R001")),
            (ParcelStatus::Dispatched, TransitionMetadata::for_dispatch("MAN-OUT-77")),
        ] {
            engine
                .apply_transition(TransitionRequest::new("PKG-1", to, metadata, "op-7"))
                .await
                .unwrap();
        }

        let today = engine.snapshot(&STATION.into()).await.unwrap();
        assert_eq!(today.dispatched_today, 1);

        // Next UTC day: throughput resets, current statuses persist.
        time.advance(MS_PER_DAY);
        let tomorrow = engine.snapshot(&STATION.into()).await.unwrap();
        assert_eq!(tomorrow.dispatched_today, 0);
        assert_eq!(tomorrow.error_rate_today, 0.0);
        assert_eq!(tomorrow.inbound, 0);
        assert_eq!(tomorrow.sorted, 0);
    }

    #[tokio::test]
    async fn test_resolver_distinguishes_parcels_and_manifests() {
        let (engine, stores, _) = engine_at(NOW);
        seed_inbound(&stores, "PKG-1");
        seed_open_outbound(&stores, "MAN-OUT-77");

        assert!(matches!(
            engine.resolve("PKG-1").await.unwrap(),
            Resolution::Parcel(_)
        ));
        assert!(matches!(
            engine.resolve("man-out-77").await.unwrap(),
            Resolution::Manifest(_)
        ));
        assert_eq!(engine.resolve("TYPO-999").await.unwrap(), Resolution::NotFound);
        assert_eq!(engine.resolve("   ").await.unwrap(), Resolution::NotFound);
    }
}
