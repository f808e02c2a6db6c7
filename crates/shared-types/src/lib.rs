//! # Shared Types Crate
//!
//! This crate contains the domain entities and error types shared by every
//! ParcelFlow subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Single Writer**: `Parcel.status`, `sort_bin`, and `route_code` are
//!   mutated exclusively by the parcel lifecycle subsystem; everything else
//!   reads them.
//! - **Append-Only Audit**: `Operation` records are immutable facts; they are
//!   written once and never updated or deleted.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{day_start, MockTimeSource, SystemTimeSource, TimeSource, Timestamp, MS_PER_DAY};
