//! Error types for TAOTE.
//!
//! All errors in TAOTE are strongly typed using thiserror. Only invalid
//! combinator arguments are errors: `halted` and `exhausted` are ordinary
//! outcomes and travel through the produced sequence as
//! [`Emission::Terminal`](crate::Emission::Terminal).

use thiserror::Error;

/// Invalid arguments passed to a combinator.
///
/// Raised synchronously when the operator is called, before any value is
/// produced. Never retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// `repeater` was given a zero round.
    #[error("Round cannot be zero")]
    ZeroRound,

    /// `until` was given a zero window.
    #[error("Window must be a positive integer")]
    ZeroWindow,

    /// `impurify` was called without any shape mode.
    #[error("One shape mode must be provided")]
    NoShapeMode,

    /// `end_before_start` was combined with another shape mode.
    #[error("endBeforeStart cannot be combined with other shape modes")]
    EndBeforeStartCombined,

    /// The selected shape mode is reserved but not implemented.
    #[error("Shape mode '{mode}' is not supported yet")]
    UnsupportedMode {
        /// Name of the mode.
        mode: String,
    },

    /// No shape mode survived resolution.
    #[error("Shape configuration reached no mode; verify parameters")]
    UnreachableConfiguration,

    /// `retry` was called before any control operator ran.
    #[error("No operation has been recorded to retry")]
    NoRecordedOperation,
}

/// Top-level error type for TAOTE.
#[derive(Debug, Error)]
pub enum TaoteError {
    /// Invalid combinator arguments.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Invalid engine setting.
    #[error("Invalid setting '{key}': {reason}")]
    Settings {
        /// Setting name.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl TaoteError {
    /// Creates a settings error for `key`.
    #[must_use]
    pub fn settings(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Settings {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if this is a settings error.
    #[must_use]
    pub const fn is_settings(&self) -> bool {
        matches!(self, Self::Settings { .. })
    }

    /// Returns the configuration error, if any.
    #[must_use]
    pub const fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Settings { .. } => None,
        }
    }
}

/// Result type alias for TAOTE operations.
pub type TaoteResult<T> = Result<T, TaoteError>;
