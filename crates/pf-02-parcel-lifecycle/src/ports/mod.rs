//! Ports: the inbound API trait and the outbound dependency traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{ParcelLifecycleApi, TransitionReceipt, TransitionRequest};
pub use outbound::{AuditSink, ManifestRepository, ParcelRepository};
