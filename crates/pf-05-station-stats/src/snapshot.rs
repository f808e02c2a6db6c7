//! The station snapshot value object.

use serde::{Deserialize, Serialize};
use shared_types::{StationId, Timestamp};

/// Point-in-time counters for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub station_id: StationId,
    /// Parcels in `inbound_received`.
    pub inbound: usize,
    /// Parcels in `sorting`.
    pub sorting: usize,
    /// Parcels in `sorted`, awaiting dispatch.
    pub sorted: usize,
    /// Applied `dispatched` transitions since the start of the UTC day.
    pub dispatched_today: usize,
    /// Rejected attempts / total attempts today; 0.0 when nothing happened.
    pub error_rate_today: f64,
    pub taken_at: Timestamp,
}
