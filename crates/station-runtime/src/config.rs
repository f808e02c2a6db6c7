//! # Engine Configuration
//!
//! Runtime parameters for a station engine process. Every knob has a sane
//! default and can be overridden from the environment:
//!
//! - `PF_MAX_IN_FLIGHT` - batch worker budget
//! - `PF_ITEM_TIMEOUT_MS` - per-item deadline inside a batch
//! - `PF_RESOLVE_TIMEOUT_MS` - deadline for identifier resolution
//! - `PF_LOG_LEVEL` - default tracing filter (overridden by `RUST_LOG`)

use pf_03_batch_sorting::BatchConfig;
use std::time::Duration;
use tracing::warn;

/// Complete station engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Batch fan-out parameters, handed to the batch coordinator.
    pub batch: BatchConfig,
    /// Deadline for resolving a scanned code.
    pub resolve_timeout: Duration,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            resolve_timeout: Duration::from_secs(2),
            log_level: "info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PF_MAX_IN_FLIGHT must be at least 1")]
    ZeroWorkerBudget,
}

impl EngineConfig {
    /// Defaults overridden by whatever `PF_*` variables are set.
    ///
    /// Unparseable values are logged and ignored rather than fatal; a
    /// station keeps booting on its defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("PF_MAX_IN_FLIGHT") {
            match raw.parse() {
                Ok(n) => config.batch.max_in_flight = n,
                Err(_) => warn!(raw, "ignoring unparseable PF_MAX_IN_FLIGHT"),
            }
        }
        if let Ok(raw) = std::env::var("PF_ITEM_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => config.batch.item_timeout = Duration::from_millis(ms),
                Err(_) => warn!(raw, "ignoring unparseable PF_ITEM_TIMEOUT_MS"),
            }
        }
        if let Ok(raw) = std::env::var("PF_RESOLVE_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => config.resolve_timeout = Duration::from_millis(ms),
                Err(_) => warn!(raw, "ignoring unparseable PF_RESOLVE_TIMEOUT_MS"),
            }
        }
        if let Ok(level) = std::env::var("PF_LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate before wiring subsystems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.max_in_flight == 0 {
            return Err(ConfigError::ZeroWorkerBudget);
        }
        Ok(())
    }
}
