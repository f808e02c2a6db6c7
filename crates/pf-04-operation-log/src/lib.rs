//! # Operation Log Subsystem (Audit Trail)
//!
//! Append-only record of every attempted and applied transition. The sole
//! source of truth for reconstructing "how did this parcel get here" and for
//! daily throughput/error statistics.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Records are never mutated or deleted | `log.rs` - the store only ever pushes |
//! | One record per transition attempt | written by the lifecycle subsystem |
//! | Queries are time-ascending and restartable | `log.rs` - fresh snapshot stream per call |

pub mod filter;
pub mod log;
pub mod ports;

pub use filter::{OperationFilter, OutcomeKind};
pub use log::InMemoryOperationLog;
pub use ports::{OperationQuery, OperationStream};
