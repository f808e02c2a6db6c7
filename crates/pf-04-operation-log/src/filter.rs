//! Query filters over the operation log.

use shared_types::{Operation, OperationOutcome, OperatorId, ParcelStatus, StationId, Timestamp, TrackingNumber};

/// Outcome class, for filtering without matching on rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Applied,
    NoOp,
    Rejected,
}

impl OutcomeKind {
    pub fn of(outcome: &OperationOutcome) -> Self {
        match outcome {
            OperationOutcome::Applied => Self::Applied,
            OperationOutcome::NoOp => Self::NoOp,
            OperationOutcome::Rejected { .. } => Self::Rejected,
        }
    }
}

/// Conjunctive filter: a record matches when every set field matches.
/// An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct OperationFilter {
    pub tracking_number: Option<TrackingNumber>,
    pub station_id: Option<StationId>,
    pub operator_id: Option<OperatorId>,
    /// Inclusive lower bound on `recorded_at`.
    pub from: Option<Timestamp>,
    /// Exclusive upper bound on `recorded_at`.
    pub until: Option<Timestamp>,
    pub outcome: Option<OutcomeKind>,
    pub to_status: Option<ParcelStatus>,
}

impl OperationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracking_number(mut self, tracking_number: impl Into<TrackingNumber>) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    pub fn with_station(mut self, station_id: impl Into<StationId>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn with_operator(mut self, operator_id: impl Into<OperatorId>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    pub fn since(mut self, from: Timestamp) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_outcome(mut self, outcome: OutcomeKind) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_to_status(mut self, to_status: ParcelStatus) -> Self {
        self.to_status = Some(to_status);
        self
    }

    pub fn matches(&self, record: &Operation) -> bool {
        if let Some(tracking) = &self.tracking_number {
            if &record.tracking_number != tracking {
                return false;
            }
        }
        if let Some(station) = &self.station_id {
            if record.station_id.as_ref() != Some(station) {
                return false;
            }
        }
        if let Some(operator) = &self.operator_id {
            if &record.operator_id != operator {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.recorded_at < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.recorded_at >= until {
                return false;
            }
        }
        if let Some(outcome) = self.outcome {
            if OutcomeKind::of(&record.outcome) != outcome {
                return false;
            }
        }
        if let Some(to_status) = self.to_status {
            if record.to_status != to_status {
                return false;
            }
        }
        true
    }
}
