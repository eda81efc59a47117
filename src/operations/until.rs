//! UNTIL: emit values for as long as a condition holds.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::memory::Memory;
use crate::source::{Sequence, Source};
use crate::state::{Emission, ExhaustionState, TerminalState};
use crate::time::ExhaustionClock;

use super::{always, emit_step, Condition, Process, Transformer};

/// Configuration for `until`.
///
/// Defaults: condition always true, identity transformer, no-op process,
/// window of 1.
///
/// # Example
/// ```rust,ignore
/// let cfg = UntilConfig::new(producers::naturals())
///     .condition(|v| *v < 100)
///     .transformer(|v| v * 2)
///     .process(|v, memory| { memory.add("sum", *v); })
///     .window(5);
/// ```
pub struct UntilConfig<C, V> {
    pub(crate) generator: Source<C, V>,
    pub(crate) condition: Condition<V>,
    pub(crate) transformer: Transformer<V>,
    pub(crate) process: Process<V>,
    pub(crate) window: usize,
}

impl<C, V: 'static> UntilConfig<C, V> {
    /// Creates a configuration over `generator` with default fields.
    pub fn new(generator: Source<C, V>) -> Self {
        Self {
            generator,
            condition: always(true),
            transformer: Arc::new(|v: V| v),
            process: Arc::new(|_: &V, _: &mut Memory<V>| {}),
            window: 1,
        }
    }

    /// Values are accepted while this holds.
    #[must_use]
    pub fn condition(mut self, condition: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Arc::new(condition);
        self
    }

    /// Applied to each accepted value before it is emitted.
    #[must_use]
    pub fn transformer(mut self, transformer: impl Fn(V) -> V + Send + Sync + 'static) -> Self {
        self.transformer = Arc::new(transformer);
        self
    }

    /// Called with each accepted value and the engine memory.
    #[must_use]
    pub fn process(
        mut self,
        process: impl Fn(&V, &mut Memory<V>) + Send + Sync + 'static,
    ) -> Self {
        self.process = Arc::new(process);
        self
    }

    /// Capacity of the memory window (default: 1).
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl<C, V> UntilConfig<C, V> {
    /// Capacity of the memory window.
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.window == 0 {
            return Err(ConfigurationError::ZeroWindow);
        }
        Ok(())
    }
}

impl<C, V> Clone for UntilConfig<C, V> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            condition: Arc::clone(&self.condition),
            transformer: Arc::clone(&self.transformer),
            process: Arc::clone(&self.process),
            window: self.window,
        }
    }
}

impl<C, V> fmt::Debug for UntilConfig<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntilConfig")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// A running `until`.
///
/// Per step: a sticky terminal state from an earlier step stops the run
/// without pulling another value. Expiry emits `exhausted` and the step still
/// evaluates its condition. An accepted value is written to
/// `window[step mod W]`, handed to `process`, and emitted transformed; a
/// rejected one emits `halted`.
pub struct UntilRun<'a, V> {
    sequence: Sequence<V>,
    condition: Condition<V>,
    transformer: Transformer<V>,
    process: Process<V>,
    window: usize,
    memory: &'a mut Memory<V>,
    clock: ExhaustionClock,
    state: ExhaustionState,
    accepted: usize,
    pending: Option<Emission<V>>,
    drained: bool,
}

impl<'a, V: Clone> UntilRun<'a, V> {
    pub(crate) fn start<C>(
        config: &UntilConfig<C, V>,
        ctx: &C,
        exhaustion: Duration,
        memory: &'a mut Memory<V>,
    ) -> Self {
        Self {
            sequence: config.generator.open(ctx),
            condition: Arc::clone(&config.condition),
            transformer: Arc::clone(&config.transformer),
            process: Arc::clone(&config.process),
            window: config.window,
            memory,
            clock: ExhaustionClock::new(exhaustion),
            state: ExhaustionState::Running,
            accepted: 0,
            pending: None,
            drained: false,
        }
    }

    /// Sticky state of this run.
    #[must_use]
    pub const fn state(&self) -> ExhaustionState {
        self.state
    }

    /// Number of values accepted so far.
    #[must_use]
    pub const fn accepted(&self) -> usize {
        self.accepted
    }

    /// Read access to the engine memory while the run is alive.
    #[must_use]
    pub fn memory(&self) -> &Memory<V> {
        &*self.memory
    }
}

impl<V: Clone> Iterator for UntilRun<'_, V> {
    type Item = Emission<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(held) = self.pending.take() {
            return Some(held);
        }
        if self.state.terminal().is_some() || self.drained {
            return None;
        }

        self.clock.start();
        let Some(value) = self.sequence.next() else {
            self.drained = true;
            tracing::debug!(operation = "until", accepted = self.accepted, "source drained");
            return None;
        };

        let marker = if self.clock.is_expired() {
            self.state = ExhaustionState::Exhausted;
            tracing::debug!(operation = "until", accepted = self.accepted, "exhaustion deadline reached");
            Some(Emission::Terminal(TerminalState::Exhausted))
        } else {
            None
        };

        let outcome = if (self.condition)(&value) {
            self.memory.window.record(self.accepted, self.window, value.clone());
            (self.process)(&value, self.memory);
            self.accepted += 1;
            Emission::Value((self.transformer)(value))
        } else {
            self.state = ExhaustionState::Halted;
            tracing::debug!(operation = "until", accepted = self.accepted, "condition failed");
            Emission::Terminal(TerminalState::Halted)
        };

        emit_step(marker, Some(outcome), &mut self.pending)
    }
}

impl<V> fmt::Debug for UntilRun<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntilRun")
            .field("state", &self.state)
            .field("accepted", &self.accepted)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}
