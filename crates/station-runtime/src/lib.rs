//! # ParcelFlow Station Runtime
//!
//! The composition root for a single logistics station node.
//!
//! ## Modular Structure
//!
//! - `config` - runtime parameters with environment overrides
//! - `telemetry` - tracing subscriber setup
//! - `engine` - the [`StationEngine`] facade wiring all subsystems
//!
//! ## Subsystems
//!
//! 1. Identifier Resolver (pf-01) - scanned code to entity
//! 2. Parcel Lifecycle (pf-02) - the status state machine, single writer
//! 3. Batch Sorting (pf-03) - bounded fan-out over parcel sets
//! 4. Operation Log (pf-04) - append-only audit trail and queries
//! 5. Station Stats (pf-05) - real-time counters per station
//!
//! The engine defaults to in-memory adapters behind each outbound port;
//! a durable deployment swaps those through [`StationEngine::new`] without
//! touching subsystem code.

pub mod config;
pub mod engine;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use engine::{StationEngine, StationStores};
pub use telemetry::init_tracing;
