//! # Station Statistics Subsystem
//!
//! Derives real-time station counters: how many parcels are waiting,
//! in sorting, sorted, how many dispatched today, and today's error rate.
//!
//! Pure read path: a snapshot is a function of current parcel states (for
//! counts by status) and today's operation-log records (for throughput and
//! error rate). Never mutates anything; safe to call at dashboard refresh
//! frequency.

pub mod service;
pub mod snapshot;

pub use service::{StationStatsService, StatsError};
pub use snapshot::StationSnapshot;
