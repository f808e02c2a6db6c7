//! Domain layer: the transition table and the state machine itself.

pub mod machine;
pub mod transitions;

pub use machine::LifecycleService;
pub use transitions::{missing_metadata, required_metadata, transition_allowed, MetadataField};
