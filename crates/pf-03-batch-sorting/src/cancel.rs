//! Cooperative cancellation flag for in-flight batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap cloneable handle the caller keeps to cancel a running batch.
///
/// Cancellation is cooperative: the coordinator checks the flag before
/// starting each item. Transitions already committed are never rolled back.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
