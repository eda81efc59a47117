//! Terminal states and the values control operators emit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A modeled end of a run. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// A value failed (or, for `some`, satisfied) the operator's condition.
    Halted,
    /// The exhaustion deadline passed.
    Exhausted,
}

impl TerminalState {
    /// The literal marker string: `"halted"` or `"exhausted"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Halted => "halted",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sticky per-run state. Once it leaves `Running` it never goes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionState {
    /// Still consuming the source.
    #[default]
    Running,
    /// The condition settled the run.
    Halted,
    /// The exhaustion budget ran out.
    Exhausted,
}

impl ExhaustionState {
    /// True while no terminal state has been reached.
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// The terminal state, if one has been reached.
    #[must_use]
    pub const fn terminal(&self) -> Option<TerminalState> {
        match self {
            Self::Running => None,
            Self::Halted => Some(TerminalState::Halted),
            Self::Exhausted => Some(TerminalState::Exhausted),
        }
    }
}

impl From<TerminalState> for ExhaustionState {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Halted => Self::Halted,
            TerminalState::Exhausted => Self::Exhausted,
        }
    }
}

/// One item produced by a control operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Emission<V> {
    /// A surfaced (possibly transformed) value.
    Value(V),
    /// The boolean answer of `every` / `some`.
    Verdict(bool),
    /// A terminal marker.
    Terminal(TerminalState),
}

impl<V> Emission<V> {
    /// True for a surfaced value.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// True for a terminal marker.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// The surfaced value, if this is one.
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The verdict of `every` / `some`, if this is one.
    pub const fn as_verdict(&self) -> Option<bool> {
        match self {
            Self::Verdict(v) => Some(*v),
            _ => None,
        }
    }

    /// The terminal marker, if this is one.
    pub const fn as_terminal(&self) -> Option<TerminalState> {
        match self {
            Self::Terminal(t) => Some(*t),
            _ => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Emission<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Verdict(v) => write!(f, "{v}"),
            Self::Terminal(t) => write!(f, "{t}"),
        }
    }
}
