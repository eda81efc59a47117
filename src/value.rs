//! Values held in `Memory::result`.
//!
//! `process` callbacks accumulate whatever they like under string keys:
//! numbers for running aggregates, labels, or structured JSON.

use serde::{Deserialize, Serialize};

/// A free-form accumulator value.
///
/// # Examples
///
/// ```
/// use taote::Value;
///
/// let sum = Value::Int(40).checked_add(&Value::from(2)).unwrap();
/// assert_eq!(sum.as_int(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Integer; sums of integers stay integral.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text label.
    String(String),
    /// Arbitrary JSON.
    Structured(serde_json::Value),
    /// Absent value.
    Null,
}

impl Value {
    /// The integer, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The number as a float, widening integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Numeric sum of two values.
    ///
    /// Int + Int stays Int (saturating); any Float operand yields Float.
    /// Non-numeric operands yield `None`.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(Self::Int(a.saturating_add(*b))),
            _ => Some(Self::Float(self.as_float()? + other.as_float()?)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Structured(v)
    }
}
