//! In-memory append-only operation log.
//!
//! Implements the lifecycle subsystem's `AuditSink` (write side) and this
//! crate's `OperationQuery` (read side). A production deployment points the
//! sink at a durable append-only store instead; the contracts are identical.

use crate::filter::OperationFilter;
use crate::ports::{OperationQuery, OperationStream};
use async_trait::async_trait;
use pf_02_parcel_lifecycle::ports::outbound::AuditSink;
use shared_types::{AuditError, Operation, OperationId};
use std::sync::RwLock;
use tracing::debug;

/// Append-only, in-memory audit trail.
pub struct InMemoryOperationLog {
    records: RwLock<Vec<Operation>>,
}

impl InMemoryOperationLog {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filtered snapshot, time-ascending. The sort is stable, so records
    /// with equal timestamps keep their append order.
    fn snapshot(&self, filter: &OperationFilter) -> Result<Vec<Operation>, AuditError> {
        let records = self
            .records
            .read()
            .map_err(|_| AuditError::new("operation log lock poisoned"))?;
        let mut matching: Vec<Operation> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matching.sort_by_key(|record| record.recorded_at);
        Ok(matching)
    }
}

impl Default for InMemoryOperationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for InMemoryOperationLog {
    async fn insert(&self, record: Operation) -> Result<OperationId, AuditError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| AuditError::new("operation log lock poisoned"))?;
        let operation_id = record.operation_id;
        debug!(
            operation_id = %operation_id,
            tracking_number = %record.tracking_number,
            "operation appended"
        );
        records.push(record);
        Ok(operation_id)
    }
}

#[async_trait]
impl OperationQuery for InMemoryOperationLog {
    async fn query(&self, filter: &OperationFilter) -> Result<OperationStream, AuditError> {
        let matching = self.snapshot(filter)?;
        Ok(Box::pin(tokio_stream::iter(matching)))
    }

    async fn count(&self, filter: &OperationFilter) -> Result<usize, AuditError> {
        Ok(self.snapshot(filter)?.len())
    }
}
