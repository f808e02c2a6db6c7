//! Configuration for the batch coordinator.

use std::time::Duration;

/// Batch fan-out configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum transitions in flight at once. A fixed worker budget, never
    /// one unbounded task per parcel.
    pub max_in_flight: usize,
    /// Deadline applied to each item's read-validate-write phase.
    pub item_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 16,
            item_timeout: Duration::from_secs(5),
        }
    }
}

impl BatchConfig {
    /// Clamps a zero `max_in_flight` to one worker.
    pub fn sanitized(mut self) -> Self {
        if self.max_in_flight == 0 {
            self.max_in_flight = 1;
        }
        self
    }
}
