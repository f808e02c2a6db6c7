//! Time source abstraction.
//!
//! All timestamps are Unix milliseconds. The source is abstracted so tests
//! and simulations can drive deterministic time.

/// Unix timestamp in milliseconds.
pub type Timestamp = u64;

/// Milliseconds in one UTC day.
pub const MS_PER_DAY: Timestamp = 86_400_000;

/// Start of the UTC day containing `ts`.
///
/// Daily statistics ("dispatched today", "error rate today") bucket on UTC
/// days; station-local presentation is a dashboard concern.
pub fn day_start(ts: Timestamp) -> Timestamp {
    ts - ts % MS_PER_DAY
}

/// Clock for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Deterministic time source for tests and simulations.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
