//! Recorded control operations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::operations::{AUntilBConfig, EveryConfig, SomeConfig, UntilConfig};

/// Unique identifier for a recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Create a new random operation id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which control operator ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// `until`
    Until,
    /// `every`
    Every,
    /// `some`
    Some,
    /// `AUntilB`
    AUntilB,
}

impl OperationKind {
    /// The operator's name as drivers know it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Until => "until",
            Self::Every => "every",
            Self::Some => "some",
            Self::AUntilB => "AUntilB",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A control operator together with the exact configuration it was given.
pub enum Operation<C, V> {
    /// `until` and its configuration.
    Until(UntilConfig<C, V>),
    /// `every` and its configuration.
    Every(EveryConfig<C, V>),
    /// `some` and its configuration.
    Some(SomeConfig<C, V>),
    /// `AUntilB` and its configuration.
    AUntilB(AUntilBConfig<C, V>),
}

impl<C, V> Operation<C, V> {
    /// Which operator this is.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Until(_) => OperationKind::Until,
            Self::Every(_) => OperationKind::Every,
            Self::Some(_) => OperationKind::Some,
            Self::AUntilB(_) => OperationKind::AUntilB,
        }
    }
}

impl<C, V> Clone for Operation<C, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Until(cfg) => Self::Until(cfg.clone()),
            Self::Every(cfg) => Self::Every(cfg.clone()),
            Self::Some(cfg) => Self::Some(cfg.clone()),
            Self::AUntilB(cfg) => Self::AUntilB(cfg.clone()),
        }
    }
}

impl<C, V> fmt::Debug for Operation<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Until(cfg) => f.debug_tuple("Until").field(cfg).finish(),
            Self::Every(cfg) => f.debug_tuple("Every").field(cfg).finish(),
            Self::Some(cfg) => f.debug_tuple("Some").field(cfg).finish(),
            Self::AUntilB(cfg) => f.debug_tuple("AUntilB").field(cfg).finish(),
        }
    }
}

/// The most recently invoked control operator, kept for `retry`.
///
/// Written when the operator is called, not when its run completes.
pub struct OperationRecord<C, V> {
    /// Unique identifier for this invocation.
    pub id: OperationId,

    /// When the operator was invoked.
    pub recorded_at: DateTime<Utc>,

    /// The operator and its configuration.
    pub operation: Operation<C, V>,
}

impl<C, V> OperationRecord<C, V> {
    /// Records `operation` now.
    pub fn new(operation: Operation<C, V>) -> Self {
        Self {
            id: OperationId::new(),
            recorded_at: Utc::now(),
            operation,
        }
    }

    /// Which operator was recorded.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

impl<C, V> Clone for OperationRecord<C, V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            recorded_at: self.recorded_at,
            operation: self.operation.clone(),
        }
    }
}

impl<C, V> fmt::Debug for OperationRecord<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRecord")
            .field("id", &self.id)
            .field("recorded_at", &self.recorded_at)
            .field("operation", &self.operation)
            .finish()
    }
}
