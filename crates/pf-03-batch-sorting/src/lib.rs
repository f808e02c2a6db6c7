//! # Batch Sorting Subsystem
//!
//! Applies one transition, with shared attributes (destination bin, route
//! code, manifest), to a set of selected parcels as a bounded-concurrency
//! batch.
//!
//! ## Semantics
//!
//! - **Partial success is normal.** Each item goes through the lifecycle
//!   API independently; one parcel already dispatched by another operator
//!   never aborts the rest.
//! - **A batch is a set.** "Select all filtered", "clear selection", and
//!   manual multi-select all reduce to the same `HashSet` shape; the
//!   outcome is independent of submission order.
//! - **Bounded fan-out.** A fixed pool of workers drains a shared queue,
//!   so a several-hundred-parcel bulk sort cannot saturate the backing
//!   store.
//! - **Cooperative cancellation.** Items already committed stay committed;
//!   items not yet started report `Cancelled`, not `Failed`.

pub mod cancel;
pub mod config;
pub mod coordinator;
pub mod report;

pub use cancel::CancelFlag;
pub use config::BatchConfig;
pub use coordinator::BatchCoordinator;
pub use report::{BatchOutcome, BatchReport};
