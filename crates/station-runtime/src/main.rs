//! Demo station process: seeds one station, walks a parcel through its
//! lifecycle, runs a bulk sort, and prints the station snapshot.

use anyhow::Result;
use pf_01_identifier_resolver::Resolution;
use pf_02_parcel_lifecycle::ports::inbound::TransitionRequest;
use pf_03_batch_sorting::CancelFlag;
use pf_04_operation_log::filter::OperationFilter;
use shared_types::{
    Manifest, ManifestType, Parcel, ParcelStatus, SystemTimeSource, TimeSource, TransitionMetadata,
};
use station_runtime::{EngineConfig, StationEngine};
use std::collections::HashSet;
use tokio_stream::StreamExt;
use tracing::info;

const STATION: &str = "YGN-001";
const OPERATOR: &str = "op-demo";

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    station_runtime::init_tracing(&config.log_level)?;
    config.validate()?;

    let (engine, stores) = StationEngine::in_memory(config);

    // Seed a morning's inbound load plus an open outbound manifest.
    let now = SystemTimeSource.now();
    for i in 1..=6 {
        stores.parcels.seed(Parcel::registered(
            format!("PKG-2024-00{i}").into(),
            STATION.into(),
            now,
        ));
    }
    stores.manifests.seed(Manifest {
        manifest_number: "MAN-OUT-77".into(),
        manifest_type: ManifestType::Outbound,
        station_id: STATION.into(),
        is_open: true,
        parcels: vec![],
    });

    // A scan comes in with stray whitespace and lowercase.
    match engine.resolve("  pkg-2024-001 ").await? {
        Resolution::Parcel(parcel) => {
            info!(tracking = %parcel.tracking_number, status = %parcel.status, "scan resolved")
        }
        other => info!(?other, "scan resolved"),
    }

    // Walk PKG-2024-001 through the happy path, one scan at a time.
    for (to, metadata) in [
        (ParcelStatus::Sorting, TransitionMetadata::for_sorting()),
        (ParcelStatus::Sorted, TransitionMetadata::for_sorted("A4", "R002")),
        (ParcelStatus::Dispatched, TransitionMetadata::for_dispatch("MAN-OUT-77")),
    ] {
        let receipt = engine
            .apply_transition(TransitionRequest::new("PKG-2024-001", to, metadata, OPERATOR))
            .await?;
        info!(status = %receipt.parcel.status, version = receipt.parcel.version, "transition applied");
    }

    // Bulk-sort the rest of the morning load into the sorting area.
    let selection: HashSet<_> = (2..=6).map(|i| format!("PKG-2024-00{i}").into()).collect();
    let report = engine
        .apply_batch(
            selection,
            ParcelStatus::Sorting,
            TransitionMetadata::for_sorting(),
            OPERATOR.into(),
            CancelFlag::new(),
        )
        .await;
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "bulk sort finished"
    );

    // Full audit trail of the dispatched parcel.
    let mut history = engine.parcel_history("PKG-2024-001").await?;
    while let Some(record) = history.next().await {
        info!(
            to = %record.to_status,
            outcome = ?record.outcome,
            at = record.recorded_at,
            "audit record"
        );
    }

    let total = stores.log.len();
    let rejected = engine
        .operations(&OperationFilter::new())
        .await?
        .filter(|r| r.outcome.is_rejected())
        .collect::<Vec<_>>()
        .await
        .len();
    info!(total, rejected, "operation log");

    let snapshot = engine.snapshot(&STATION.into()).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
