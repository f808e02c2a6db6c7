//! Inbound port: read access to the audit trail.

use crate::filter::OperationFilter;
use async_trait::async_trait;
use shared_types::{AuditError, Operation};
use std::pin::Pin;
use tokio_stream::Stream;

/// A lazy sequence of operation records, time-ascending.
///
/// Each call to [`OperationQuery::query`] builds a fresh stream over a
/// snapshot, so consumers can restart from the top at any time.
pub type OperationStream = Pin<Box<dyn Stream<Item = Operation> + Send>>;

/// Read side of the operation log, consumed by statistics and by history
/// views ("how did this parcel get here").
#[async_trait]
pub trait OperationQuery: Send + Sync {
    /// Records matching `filter`, ordered by `recorded_at` ascending
    /// (stable on ties, in append order).
    async fn query(&self, filter: &OperationFilter) -> Result<OperationStream, AuditError>;

    /// Number of records matching `filter`.
    async fn count(&self, filter: &OperationFilter) -> Result<usize, AuditError>;
}
