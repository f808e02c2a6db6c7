//! Adapters: in-memory port implementations for wiring and tests.

pub mod memory;

pub use memory::{InMemoryManifestStore, InMemoryParcelStore};
