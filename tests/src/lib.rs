//! # ParcelFlow Test Suite
//!
//! Unified test crate for cross-subsystem behavior.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # End-to-end station scenarios
//!     └── concurrency.rs  # Write races, cancellation, fan-out bounds
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pf-tests
//!
//! # By category
//! cargo test -p pf-tests integration::flows::
//! cargo test -p pf-tests integration::concurrency::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
