//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TaoteError, TaoteResult};

/// Environment variable holding the exhaustion budget in seconds.
pub const EXHAUSTION_ENV: &str = "TAOTE_EXHAUSTION_SECS";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds after which an unfinished run is considered infinite.
    pub exhaustion_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exhaustion_secs: 2.0,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `TAOTE_EXHAUSTION_SECS` when it is set.
    ///
    /// # Errors
    ///
    /// Returns `TaoteError::Settings` if the variable is not a valid budget.
    pub fn from_env() -> TaoteResult<Self> {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(EXHAUSTION_ENV) {
            cfg.exhaustion_secs = raw
                .trim()
                .parse()
                .map_err(|e| TaoteError::settings(EXHAUSTION_ENV, format!("{raw:?}: {e}")))?;
            cfg.exhaustion()?;
        }
        Ok(cfg)
    }

    /// The budget as a `Duration`.
    ///
    /// # Errors
    ///
    /// Returns `TaoteError::Settings` for negative, NaN or infinite budgets.
    pub fn exhaustion(&self) -> TaoteResult<Duration> {
        Duration::try_from_secs_f64(self.exhaustion_secs).map_err(|_| {
            TaoteError::settings(
                "exhaustion_secs",
                format!(
                    "{} must be a finite, non-negative number of seconds",
                    self.exhaustion_secs
                ),
            )
        })
    }
}
