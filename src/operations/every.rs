//! EVERY: universally quantified check over a sequence.
//!
//! Yields `false` the first time a value fails the condition. Reaching the
//! exhaustion deadline without a failure counts as success and yields `true`.
//! A source that ends naturally produces nothing further.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::source::{Sequence, Source};
use crate::state::{Emission, ExhaustionState};
use crate::time::ExhaustionClock;

use super::{always, emit_step, Condition};

/// Configuration for `every`. Default condition: always true.
pub struct EveryConfig<C, V> {
    pub(crate) generator: Source<C, V>,
    pub(crate) condition: Condition<V>,
}

impl<C, V: 'static> EveryConfig<C, V> {
    /// Creates a configuration over `generator`.
    pub fn new(generator: Source<C, V>) -> Self {
        Self {
            generator,
            condition: always(true),
        }
    }

    /// The property every value must satisfy.
    #[must_use]
    pub fn condition(mut self, condition: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Arc::new(condition);
        self
    }
}

impl<C, V> Clone for EveryConfig<C, V> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            condition: Arc::clone(&self.condition),
        }
    }
}

impl<C, V> fmt::Debug for EveryConfig<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EveryConfig").finish_non_exhaustive()
    }
}

/// A running `every`.
///
/// Once a terminal state is reached the next pull reports it as
/// [`Emission::Terminal`] and the run ends.
pub struct EveryRun<V> {
    sequence: Sequence<V>,
    condition: Condition<V>,
    clock: ExhaustionClock,
    state: ExhaustionState,
    pending: Option<Emission<V>>,
    reported: bool,
    drained: bool,
    checked: usize,
}

impl<V> EveryRun<V> {
    pub(crate) fn start<C>(config: &EveryConfig<C, V>, ctx: &C, exhaustion: Duration) -> Self {
        Self {
            sequence: config.generator.open(ctx),
            condition: Arc::clone(&config.condition),
            clock: ExhaustionClock::new(exhaustion),
            state: ExhaustionState::Running,
            pending: None,
            reported: false,
            drained: false,
            checked: 0,
        }
    }

    /// Sticky state of this run.
    #[must_use]
    pub const fn state(&self) -> ExhaustionState {
        self.state
    }
}

impl<V> Iterator for EveryRun<V> {
    type Item = Emission<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(held) = self.pending.take() {
            return Some(held);
        }
        if let Some(terminal) = self.state.terminal() {
            if self.reported {
                return None;
            }
            self.reported = true;
            return Some(Emission::Terminal(terminal));
        }
        if self.drained {
            return None;
        }

        self.clock.start();
        loop {
            let Some(value) = self.sequence.next() else {
                self.drained = true;
                tracing::debug!(operation = "every", checked = self.checked, "source drained");
                return None;
            };
            self.checked += 1;

            // Expiry is vacuous success; the value is still checked below.
            let marker = if self.clock.is_expired() {
                self.state = ExhaustionState::Exhausted;
                tracing::debug!(operation = "every", checked = self.checked, "exhaustion deadline reached");
                Some(Emission::Verdict(true))
            } else {
                None
            };

            let outcome = if (self.condition)(&value) {
                None
            } else {
                self.state = ExhaustionState::Halted;
                tracing::debug!(operation = "every", checked = self.checked, "counterexample found");
                Some(Emission::Verdict(false))
            };

            if let Some(emission) = emit_step(marker, outcome, &mut self.pending) {
                return Some(emission);
            }
        }
    }
}

impl<V> fmt::Debug for EveryRun<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EveryRun")
            .field("state", &self.state)
            .field("checked", &self.checked)
            .finish_non_exhaustive()
    }
}
