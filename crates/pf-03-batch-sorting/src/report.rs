//! Per-item outcomes aggregated into one batch report.

use shared_types::{Parcel, TrackingNumber, TransitionError};
use std::collections::{HashMap, HashSet};

/// Outcome of one item within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The transition applied (or was an idempotent repeat).
    Updated(Parcel),
    /// The transition was rejected or timed out; the reason is retryable
    /// context for the operator.
    Failed(TransitionError),
    /// The batch was cancelled before this item started. Distinct from
    /// `Failed`: nothing was attempted.
    Cancelled,
}

/// Aggregated result of a batch, keyed by tracking number.
///
/// Sufficient to re-drive a retry of only the failed subset.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    outcomes: HashMap<TrackingNumber, BatchOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: HashMap<TrackingNumber, BatchOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &HashMap<TrackingNumber, BatchOutcome> {
        &self.outcomes
    }

    pub fn outcome(&self, tracking_number: &TrackingNumber) -> Option<&BatchOutcome> {
        self.outcomes.get(tracking_number)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, BatchOutcome::Updated(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, BatchOutcome::Failed(_)))
            .count()
    }

    pub fn cancelled(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, BatchOutcome::Cancelled))
            .count()
    }

    /// The failure list with reasons, for operator display.
    pub fn failures(&self) -> Vec<(&TrackingNumber, &TransitionError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                BatchOutcome::Failed(err) => Some((id, err)),
                _ => None,
            })
            .collect()
    }

    /// The subset to submit again: failed and cancelled items.
    pub fn retryable(&self) -> HashSet<TrackingNumber> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, BatchOutcome::Updated(_)))
            .map(|(id, _)| id.clone())
            .collect()
    }
}
