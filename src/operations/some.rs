//! SOME: existential dual of `every`.
//!
//! Yields `true` on the first value satisfying the condition, `false` if the
//! exhaustion deadline passes first.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::source::{Sequence, Source};
use crate::state::{Emission, ExhaustionState};
use crate::time::ExhaustionClock;

use super::{always, emit_step, Condition};

/// Configuration for `some`. Default condition: always false.
pub struct SomeConfig<C, V> {
    pub(crate) generator: Source<C, V>,
    pub(crate) condition: Condition<V>,
}

impl<C, V: 'static> SomeConfig<C, V> {
    /// Creates a configuration over `generator`.
    pub fn new(generator: Source<C, V>) -> Self {
        Self {
            generator,
            condition: always(false),
        }
    }

    /// The property a witness must satisfy.
    #[must_use]
    pub fn condition(mut self, condition: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Arc::new(condition);
        self
    }
}

impl<C, V> Clone for SomeConfig<C, V> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            condition: Arc::clone(&self.condition),
        }
    }
}

impl<C, V> fmt::Debug for SomeConfig<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SomeConfig").finish_non_exhaustive()
    }
}

/// A running `some`.
pub struct SomeRun<V> {
    sequence: Sequence<V>,
    condition: Condition<V>,
    clock: ExhaustionClock,
    state: ExhaustionState,
    pending: Option<Emission<V>>,
    reported: bool,
    drained: bool,
    checked: usize,
}

impl<V> SomeRun<V> {
    pub(crate) fn start<C>(config: &SomeConfig<C, V>, ctx: &C, exhaustion: Duration) -> Self {
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

impl<V> Iterator for SomeRun<V> {
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
                tracing::debug!(operation = "some", checked = self.checked, "source drained");
                return None;
            };
            self.checked += 1;

            let marker = if self.clock.is_expired() {
                self.state = ExhaustionState::Exhausted;
                tracing::debug!(operation = "some", checked = self.checked, "exhaustion deadline reached");
                Some(Emission::Verdict(false))
            } else {
                None
            };

            let outcome = if (self.condition)(&value) {
                self.state = ExhaustionState::Halted;
                tracing::debug!(operation = "some", checked = self.checked, "witness found");
                Some(Emission::Verdict(true))
            } else {
                None
            };

            if let Some(emission) = emit_step(marker, outcome, &mut self.pending) {
                return Some(emission);
            }
        }
    }
}

impl<V> fmt::Debug for SomeRun<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SomeRun")
            .field("state", &self.state)
            .field("checked", &self.checked)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TerminalState;

    fn run(config: &SomeConfig<(), i64>, exhaustion: Duration) -> Vec<Emission<i64>> {
        SomeRun::start(config, &(), exhaustion).collect()
    }

    #[test]
    fn test_witness_yields_true_then_halted() {
        let cfg = SomeConfig::<(), i64>::new(Source::new(|_: &()| 0i64..)).condition(|v| *v > 300);
        assert_eq!(
            run(&cfg, Duration::from_secs(60)),
            vec![
                Emission::Verdict(true),
                Emission::Terminal(TerminalState::Halted)
            ]
        );
    }

    #[test]
    fn test_no_witness_before_deadline_yields_false() {
        let cfg = SomeConfig::<(), i64>::new(Source::new(|_: &()| 0i64..)).condition(|v| *v < 0);
        assert_eq!(
            run(&cfg, Duration::from_millis(20)),
            vec![
                Emission::Verdict(false),
                Emission::Terminal(TerminalState::Exhausted)
            ]
        );
    }

    #[test]
    fn test_default_condition_never_matches() {
        let cfg = SomeConfig::<(), i64>::new(Source::from_values(vec![1, 2, 3]));
        assert!(run(&cfg, Duration::from_secs(60)).is_empty());
    }
}
