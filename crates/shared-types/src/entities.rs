//! # Core Domain Entities
//!
//! Defines the entities a station node operates on.
//!
//! ## Clusters
//!
//! - **Physical**: `Parcel`, `PackageType`
//! - **Grouping**: `Manifest`, `ManifestType`
//! - **Audit**: `Operation`, `OperationOutcome`, `TransitionMetadata`
//! - **Identity**: `TrackingNumber`, `ManifestNumber`, `StationId`,
//!   `OperatorId`, `BinCode`, `RouteCode`

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Globally unique, immutable, human-scannable parcel identity.
    TrackingNumber
}

string_id! {
    /// Identity of a manifest (one inbound/outbound movement).
    ManifestNumber
}

string_id! {
    /// Identity of a physical network node (warehouse/branch).
    StationId
}

string_id! {
    /// Audit attribution for the human operator behind a scan.
    ///
    /// Supplied by an external identity collaborator; the engine never
    /// interprets it beyond equality.
    OperatorId
}

string_id! {
    /// Physical storage slot code assigned during sorting.
    BinCode
}

string_id! {
    /// Onward-transport route identifier assigned during sorting.
    RouteCode
}

/// Unique identifier of one appended audit record.
pub type OperationId = Uuid;

// =============================================================================
// CLUSTER B: THE PARCEL
// =============================================================================

/// The finite set of parcel statuses.
///
/// The happy path is `InboundReceived -> Sorting -> Sorted -> Dispatched`,
/// with `Returned` and `Lost` reachable from any non-terminal status as
/// operator-confirmed exceptions. `Dispatched`, `Returned`, and `Lost` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Received at this station, awaiting sorting.
    InboundReceived,
    /// Picked up by a sorting operator.
    Sorting,
    /// Assigned a sort bin and route code.
    Sorted,
    /// Left the station on an outbound manifest (terminal).
    Dispatched,
    /// Returned to sender after an operator override (terminal).
    Returned,
    /// Declared lost after an operator override (terminal).
    Lost,
}

impl ParcelStatus {
    /// True when no further transition is legal from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dispatched | Self::Returned | Self::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InboundReceived => "inbound_received",
            Self::Sorting => "sorting",
            Self::Sorted => "sorted",
            Self::Dispatched => "dispatched",
            Self::Returned => "returned",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical classification of a shipment unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Document,
    Standard,
    Oversize,
    ColdChain,
}

/// A physical shipment unit moving through the network.
///
/// Created by the pickup/booking collaborator when first registered at any
/// station; mutated exclusively through the lifecycle state machine; never
/// deleted, only terminally transitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    /// Globally unique, immutable identity.
    pub tracking_number: TrackingNumber,
    pub sender_name: String,
    pub receiver_name: String,
    pub package_type: PackageType,
    /// Gross weight in kilograms.
    pub weight_kg: f64,
    pub is_fragile: bool,
    /// Cash-on-delivery amount owed, in minor currency units. Zero when the
    /// shipment is prepaid; non-negative by construction.
    pub cod_amount: u64,
    /// Storage bin, set once the parcel has passed a `sorted` transition.
    pub sort_bin: Option<BinCode>,
    /// Onward route, set together with `sort_bin`.
    pub route_code: Option<RouteCode>,
    /// Outbound manifest, set by the `dispatched` transition.
    pub manifest_number: Option<ManifestNumber>,
    /// Operator-supplied reason, set by a `returned`/`lost` transition.
    pub exception_reason: Option<String>,
    /// The station currently holding the parcel.
    pub station_id: StationId,
    pub status: ParcelStatus,
    /// When the last applied transition landed.
    pub last_transition_at: Timestamp,
    /// Optimistic-concurrency token, bumped on every applied write.
    pub version: u64,
}

impl Parcel {
    /// A freshly registered parcel in `InboundReceived` at `station_id`.
    pub fn registered(
        tracking_number: TrackingNumber,
        station_id: StationId,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            tracking_number,
            sender_name: String::new(),
            receiver_name: String::new(),
            package_type: PackageType::Standard,
            weight_kg: 0.0,
            is_fragile: false,
            cod_amount: 0,
            sort_bin: None,
            route_code: None,
            manifest_number: None,
            exception_reason: None,
            station_id,
            status: ParcelStatus::InboundReceived,
            last_transition_at: registered_at,
            version: 1,
        }
    }
}

// =============================================================================
// CLUSTER C: MANIFESTS
// =============================================================================

/// Direction of a manifest movement relative to the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestType {
    Inbound,
    Outbound,
}

/// A logical grouping of parcels traveling together between stations.
///
/// A parcel may belong to at most one *open* manifest at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_number: ManifestNumber,
    pub manifest_type: ManifestType,
    pub station_id: StationId,
    /// Open manifests accept parcels; closed manifests are historical.
    pub is_open: bool,
    /// Member parcels, referenced by tracking number.
    pub parcels: Vec<TrackingNumber>,
}

impl Manifest {
    pub fn total_parcels(&self) -> usize {
        self.parcels.len()
    }

    pub fn contains(&self, tracking_number: &TrackingNumber) -> bool {
        self.parcels.contains(tracking_number)
    }
}

// =============================================================================
// CLUSTER D: AUDIT
// =============================================================================

/// Optional attributes accompanying a transition attempt.
///
/// Which fields are required depends on the target status; the transition
/// table in the lifecycle subsystem enforces that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMetadata {
    pub sort_bin: Option<BinCode>,
    pub route_code: Option<RouteCode>,
    pub manifest_number: Option<ManifestNumber>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl TransitionMetadata {
    /// Metadata for moving a parcel into the sorting area.
    pub fn for_sorting() -> Self {
        Self::default()
    }

    /// Metadata for a completed sort: bin plus onward route.
    pub fn for_sorted(sort_bin: impl Into<BinCode>, route_code: impl Into<RouteCode>) -> Self {
        Self {
            sort_bin: Some(sort_bin.into()),
            route_code: Some(route_code.into()),
            ..Self::default()
        }
    }

    /// Metadata for dispatch onto an outbound manifest.
    pub fn for_dispatch(manifest_number: impl Into<ManifestNumber>) -> Self {
        Self {
            manifest_number: Some(manifest_number.into()),
            ..Self::default()
        }
    }

    /// Metadata for an operator-confirmed exception (`Returned`/`Lost`).
    pub fn exception(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// How a recorded transition attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum OperationOutcome {
    /// The parcel state changed.
    Applied,
    /// Idempotent repeat: the parcel was already in the target status with
    /// equivalent metadata. No state change, but the scan is still on record.
    NoOp,
    /// The attempt was rejected; the parcel is unmodified.
    Rejected { reason: String },
}

impl OperationOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// One immutable audit record of an attempted status transition.
///
/// "At `recorded_at`, `operator_id` attempted `from_status -> to_status` on
/// `tracking_number` at `station_id`, with `outcome` and `metadata`."
/// Append-only; the sole source of truth for historical reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_id: OperationId,
    pub recorded_at: Timestamp,
    pub operator_id: OperatorId,
    pub tracking_number: TrackingNumber,
    /// `None` when the parcel was unknown at attempt time.
    pub station_id: Option<StationId>,
    /// `None` when the parcel was unknown at attempt time.
    pub from_status: Option<ParcelStatus>,
    pub to_status: ParcelStatus,
    pub outcome: OperationOutcome,
    pub metadata: TransitionMetadata,
}
