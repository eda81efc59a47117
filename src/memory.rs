//! Engine memory: side effects accumulated by `until`.
//!
//! Memory lives as long as the engine. Nothing clears it except
//! `retry(true)` or an explicit [`Memory::reset`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;

/// Fixed-capacity circular buffer of the most recently accepted values.
///
/// Writes land at `step mod capacity`, so after `k >= capacity` writes the
/// buffer holds exactly the last `capacity` values. [`Window::recent`] returns
/// them in production order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window<V> {
    slots: Vec<V>,
    #[serde(skip)]
    last_written: Option<usize>,
}

impl<V> Window<V> {
    /// Creates an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            last_written: None,
        }
    }

    /// Writes `value` into slot `step mod capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Operators validate their window size
    /// before any write.
    pub fn record(&mut self, step: usize, capacity: usize, value: V) {
        assert!(capacity > 0, "window capacity must be positive");
        let index = step % capacity;
        if index < self.slots.len() {
            self.slots[index] = value;
        } else {
            self.slots.push(value);
        }
        self.last_written = Some(index.min(self.slots.len() - 1));
    }

    /// Raw slots in buffer order.
    #[must_use]
    pub fn slots(&self) -> &[V] {
        &self.slots
    }

    /// Contents ordered oldest to newest.
    pub fn recent(&self) -> impl Iterator<Item = &V> {
        let split = self.last_written.map_or(self.slots.len(), |i| i + 1);
        let (head, tail) = self.slots.split_at(split);
        tail.iter().chain(head.iter())
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True before the first write.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Empties the window.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.last_written = None;
    }
}

impl<V> Default for Window<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable record shared by the engine's control operators.
///
/// `result` is free-form: `process` callbacks write whatever they need under
/// string keys. `window` is written by `until`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Memory<V> {
    /// Free-form results keyed by name.
    pub result: BTreeMap<String, Value>,
    /// Most recently accepted values.
    pub window: Window<V>,
}

impl<V> Memory<V> {
    /// Creates empty memory (`result: {}`, `window: []`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            result: BTreeMap::new(),
            window: Window::new(),
        }
    }

    /// Reinitializes to empty.
    pub fn reset(&mut self) {
        self.result.clear();
        self.window.clear();
    }

    /// The result stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.result.get(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.result.insert(key.into(), value.into())
    }

    /// Adds `amount` to the numeric value under `key`.
    ///
    /// A missing or non-numeric entry is replaced by `amount`.
    pub fn add(&mut self, key: impl Into<String>, amount: impl Into<Value>) -> &Value {
        let amount = amount.into();
        let entry = self.result.entry(key.into()).or_insert(Value::Null);
        *entry = entry.checked_add(&amount).unwrap_or(amount);
        entry
    }
}

impl<V> Default for Memory<V> {
    fn default() -> Self {
        Self::new()
    }
}
