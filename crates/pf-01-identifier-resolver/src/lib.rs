//! # Identifier Resolver Subsystem
//!
//! Maps a raw scanned code (barcode/QR payload or manually typed tracking
//! id) to exactly one domain entity, or reports that nothing (or more than
//! one thing) matched.
//!
//! A miss is a normal outcome, not an error: operators mistype codes
//! routinely, so `NotFound` and `Ambiguous` are [`Resolution`] variants the
//! caller matches on. Only infrastructure failures (store down, deadline
//! elapsed) surface as [`ResolveError`].
//!
//! Read-only: resolution never mutates anything.

pub mod normalize;
pub mod resolver;

pub use normalize::normalize_code;
pub use resolver::{IdentifierResolver, Resolution, ResolveError};
