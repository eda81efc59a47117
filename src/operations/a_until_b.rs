//! AUntilB: composition after LTL's "until" operator.
//!
//! Two sources are stepped in lockstep (zip to the shortest). For each pair,
//! B's condition has priority: when it holds, `b` is surfaced; otherwise `a`
//! is surfaced if A's condition holds; otherwise nothing is emitted for the
//! pair. The run only ends on exhaustion or when either source ends.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::source::Source;
use crate::state::{Emission, ExhaustionState, TerminalState};
use crate::time::ExhaustionClock;

use super::{always, emit_step, Condition};

/// Configuration for `AUntilB`. Both conditions default to always false.
pub struct AUntilBConfig<C, V> {
    pub(crate) generator_a: Source<C, V>,
    pub(crate) generator_b: Source<C, V>,
    pub(crate) condition_a: Condition<V>,
    pub(crate) condition_b: Condition<V>,
}

impl<C, V: 'static> AUntilBConfig<C, V> {
    /// Creates a configuration pairing `generator_a` with `generator_b`.
    pub fn new(generator_a: Source<C, V>, generator_b: Source<C, V>) -> Self {
        Self {
            generator_a,
            generator_b,
            condition_a: always(false),
            condition_b: always(false),
        }
    }

    /// The in-progress condition on A.
    #[must_use]
    pub fn condition_a(mut self, condition: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.condition_a = Arc::new(condition);
        self
    }

    /// The terminating condition on B.
    #[must_use]
    pub fn condition_b(mut self, condition: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.condition_b = Arc::new(condition);
        self
    }
}

impl<C, V> Clone for AUntilBConfig<C, V> {
    fn clone(&self) -> Self {
        Self {
            generator_a: self.generator_a.clone(),
            generator_b: self.generator_b.clone(),
            condition_a: Arc::clone(&self.condition_a),
            condition_b: Arc::clone(&self.condition_b),
        }
    }
}

impl<C, V> fmt::Debug for AUntilBConfig<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AUntilBConfig").finish_non_exhaustive()
    }
}

/// A running `AUntilB`.
pub struct AUntilBRun<V> {
    pairs: Box<dyn Iterator<Item = (V, V)>>,
    condition_a: Condition<V>,
    condition_b: Condition<V>,
    clock: ExhaustionClock,
    state: ExhaustionState,
    pending: Option<Emission<V>>,
    drained: bool,
    paired: usize,
}

impl<V: 'static> AUntilBRun<V> {
    pub(crate) fn start<C>(config: &AUntilBConfig<C, V>, ctx: &C, exhaustion: Duration) -> Self {
        let a = config.generator_a.open(ctx);
        let b = config.generator_b.open(ctx);
        Self {
            pairs: Box::new(a.zip(b)),
            condition_a: Arc::clone(&config.condition_a),
            condition_b: Arc::clone(&config.condition_b),
            clock: ExhaustionClock::new(exhaustion),
            state: ExhaustionState::Running,
            pending: None,
            drained: false,
            paired: 0,
        }
    }
}

impl<V> AUntilBRun<V> {
    /// Sticky state of this run.
    #[must_use]
    pub const fn state(&self) -> ExhaustionState {
        self.state
    }
}

impl<V> Iterator for AUntilBRun<V> {
    type Item = Emission<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(held) = self.pending.take() {
            return Some(held);
        }
        if self.state.terminal().is_some() || self.drained {
            return None;
        }

        self.clock.start();
        loop {
            let Some((a, b)) = self.pairs.next() else {
                self.drained = true;
                tracing::debug!(operation = "a_until_b", paired = self.paired, "source drained");
                return None;
            };
            self.paired += 1;

            let marker = if self.clock.is_expired() {
                self.state = ExhaustionState::Exhausted;
                tracing::debug!(operation = "a_until_b", paired = self.paired, "exhaustion deadline reached");
                Some(Emission::Terminal(TerminalState::Exhausted))
            } else {
                None
            };

            let outcome = if (self.condition_b)(&b) {
                Some(Emission::Value(b))
            } else if (self.condition_a)(&a) {
                Some(Emission::Value(a))
            } else {
                None
            };

            if let Some(emission) = emit_step(marker, outcome, &mut self.pending) {
                return Some(emission);
            }
        }
    }
}

impl<V> fmt::Debug for AUntilBRun<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AUntilBRun")
            .field("state", &self.state)
            .field("paired", &self.paired)
            .finish_non_exhaustive()
    }
}
