//! # Parcel Lifecycle Subsystem
//!
//! Owns the finite set of valid parcel statuses and the legal transition
//! table; validates and applies a single transition as one atomic
//! read-validate-write unit.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Only table edges are applied | `domain/transitions.rs` - `transition_allowed()` |
//! | Required metadata per edge | `domain/transitions.rs` - `missing_metadata()` |
//! | Exactly one audit record per attempt | `domain/machine.rs` - `apply_transition()` |
//! | Conflicts surface as `StaleState`, never overwrite | `domain/machine.rs` - CAS write |
//! | `sort_bin`/`route_code` set only by the `sorted` edge | `domain/machine.rs` - `apply_effect()` |
//!
//! ## Idempotency
//!
//! A repeat scan (parcel already in the target status with equivalent
//! metadata) succeeds without a state write and is audited as `NoOp`. This
//! protects against an operator re-scanning the same code under a flaky
//! camera feed while keeping the log truthful about what happened.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/memory.rs   - In-memory parcel/manifest stores (wiring + tests)
//!          ↑ implements ↑
//! ports/inbound.rs     - ParcelLifecycleApi trait
//! ports/outbound.rs    - ParcelRepository, ManifestRepository, AuditSink
//!          ↑ uses ↑
//! domain/transitions.rs - Transition table and metadata requirements
//! domain/machine.rs     - LifecycleService (the single writer of Parcel)
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryManifestStore, InMemoryParcelStore};
pub use domain::machine::LifecycleService;
pub use domain::transitions::{missing_metadata, required_metadata, transition_allowed};
pub use ports::inbound::{ParcelLifecycleApi, TransitionReceipt, TransitionRequest};
pub use ports::outbound::{AuditSink, ManifestRepository, ParcelRepository};
