//! The TAOTE engine.
//!
//! An `Engine` binds an application context and an exhaustion budget. It owns
//! the memory written by `until` and the record of the last control operator,
//! both readable by the driver. At most one control run should be alive per
//! engine; runs that touch memory borrow the engine mutably, so the compiler
//! enforces this for `until`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::{ConfigurationError, TaoteResult};
use crate::ir::{Operation, OperationKind, OperationRecord};
use crate::memory::Memory;
use crate::operations::{
    AUntilBConfig, AUntilBRun, EveryConfig, EveryRun, Impure, ImpurifyConfig, RateLimitConfig,
    RateLimited, Repeat, RepeaterConfig, SomeConfig, SomeRun, UntilConfig, UntilRun,
};
#[cfg(feature = "async")]
use crate::operations::RateLimitedStream;
use crate::state::Emission;

/// Combinator engine over sequence sources.
///
/// `C` is the opaque application context handed to every source; `V` is the
/// value type of the control operators and of the memory window.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taote::{producers, Emission, Engine, UntilConfig};
///
/// let mut engine: Engine<(), i64> = Engine::new((), Duration::from_secs(2));
/// let doubled: Vec<Emission<i64>> = engine
///     .until(
///         UntilConfig::new(producers::naturals())
///             .condition(|v| *v < 3)
///             .transformer(|v| v * 2),
///     )
///     .unwrap()
///     .collect();
///
/// assert_eq!(doubled.len(), 4); // 0, 2, 4, then "halted"
/// assert_eq!(engine.memory().window.slots(), &[2]);
/// ```
pub struct Engine<C, V> {
    app: Arc<C>,
    exhaustion: Duration,
    memory: Memory<V>,
    last: Option<OperationRecord<C, V>>,
}

impl<C, V> Engine<C, V> {
    /// Creates an engine with empty memory and no recorded operation.
    pub fn new(app: C, exhaustion: Duration) -> Self {
        Self {
            app: Arc::new(app),
            exhaustion,
            memory: Memory::new(),
            last: None,
        }
    }

    /// Creates an engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TaoteError::Settings` if the exhaustion budget is invalid.
    pub fn with_config(app: C, config: &EngineConfig) -> TaoteResult<Self> {
        Ok(Self::new(app, config.exhaustion()?))
    }

    /// The application context forwarded to every source.
    #[must_use]
    pub fn app(&self) -> &C {
        &self.app
    }

    /// Budget after which a run is treated as infinite.
    #[must_use]
    pub const fn exhaustion(&self) -> Duration {
        self.exhaustion
    }

    /// Memory written by `until`.
    #[must_use]
    pub const fn memory(&self) -> &Memory<V> {
        &self.memory
    }

    /// Mutable access to memory, for drivers seeding or clearing results.
    pub fn memory_mut(&mut self) -> &mut Memory<V> {
        &mut self.memory
    }

    /// The last control operator invoked, if any.
    #[must_use]
    pub const fn last(&self) -> Option<&OperationRecord<C, V>> {
        self.last.as_ref()
    }

    fn record(&mut self, operation: Operation<C, V>) {
        let record = OperationRecord::new(operation);
        tracing::trace!(operation = %record.kind(), id = %record.id, "recorded operation");
        self.last = Some(record);
    }
}

impl<C, V> Engine<C, V>
where
    V: Clone + 'static,
{
    /// Emit values while `condition` holds; see [`UntilRun`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ZeroWindow` for a zero window.
    pub fn until(&mut self, config: UntilConfig<C, V>) -> TaoteResult<UntilRun<'_, V>> {
        config.validate()?;
        self.record(Operation::Until(config.clone()));
        Ok(UntilRun::start(&config, &*self.app, self.exhaustion, &mut self.memory))
    }

    /// Check that every value satisfies `condition`; see [`EveryRun`].
    pub fn every(&mut self, config: EveryConfig<C, V>) -> EveryRun<V> {
        self.record(Operation::Every(config.clone()));
        EveryRun::start(&config, &*self.app, self.exhaustion)
    }

    /// Look for a value satisfying `condition`; see [`SomeRun`].
    pub fn some(&mut self, config: SomeConfig<C, V>) -> SomeRun<V> {
        self.record(Operation::Some(config.clone()));
        SomeRun::start(&config, &*self.app, self.exhaustion)
    }

    /// Surface A's values until B's condition takes over; see [`AUntilBRun`].
    pub fn a_until_b(&mut self, config: AUntilBConfig<C, V>) -> AUntilBRun<V> {
        self.record(Operation::AUntilB(config.clone()));
        AUntilBRun::start(&config, &*self.app, self.exhaustion)
    }

    /// Replay the last control operator with the same configuration.
    ///
    /// With `reset_memory`, memory is emptied first; otherwise the replay keeps
    /// accumulating into it. The replay is recorded as a new invocation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::NoRecordedOperation` if nothing ran yet.
    pub fn retry(&mut self, reset_memory: bool) -> TaoteResult<Replay<'_, V>> {
        let record = self.last.as_ref().ok_or(ConfigurationError::NoRecordedOperation)?;
        let operation = record.operation.clone();
        tracing::info!(
            operation = %record.kind(),
            previous = %record.id,
            reset_memory,
            "retrying last operation"
        );

        if reset_memory {
            self.memory.reset();
        }

        Ok(match operation {
            Operation::Until(config) => Replay::Until(self.until(config)?),
            Operation::Every(config) => Replay::Every(self.every(config)),
            Operation::Some(config) => Replay::Some(self.some(config)),
            Operation::AUntilB(config) => Replay::AUntilB(self.a_until_b(config)),
        })
    }
}

impl<C, V> Engine<C, V> {
    /// Endlessly re-sample a source; see [`Repeat`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ZeroRound` for a zero round.
    pub fn repeater<T>(&self, config: RepeaterConfig<C, T>) -> TaoteResult<Repeat<C, T>> {
        Ok(Repeat::start(config, Arc::clone(&self.app))?)
    }

    /// Distort the shape of a source; see [`Impure`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when no mode, or a conflicting or
    /// unsupported mode, is configured.
    pub fn impurify<T>(&self, config: ImpurifyConfig<C, T>) -> TaoteResult<Impure<T>> {
        Ok(Impure::start(&config, &*self.app)?)
    }

    /// Delay each value of a source, blocking the calling thread.
    pub fn rate_limit<T>(&self, config: RateLimitConfig<C, T>) -> RateLimited<T> {
        RateLimited::start(&config, &*self.app)
    }

    /// Delay each value of a source on a tokio timer.
    #[cfg(feature = "async")]
    pub fn rate_limit_stream<T>(&self, config: RateLimitConfig<C, T>) -> RateLimitedStream<T> {
        RateLimitedStream::start(&config, &*self.app)
    }
}

impl<C, V> fmt::Debug for Engine<C, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("exhaustion", &self.exhaustion)
            .field("memory", &self.memory)
            .field("last", &self.last.as_ref().map(OperationRecord::kind))
            .finish_non_exhaustive()
    }
}

/// A replayed control run.
pub enum Replay<'a, V> {
    /// Replay of `until`.
    Until(UntilRun<'a, V>),
    /// Replay of `every`.
    Every(EveryRun<V>),
    /// Replay of `some`.
    Some(SomeRun<V>),
    /// Replay of `a_until_b`.
    AUntilB(AUntilBRun<V>),
}

impl<V> Replay<'_, V> {
    /// Which operator is being replayed.
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

impl<V: Clone> Iterator for Replay<'_, V> {
    type Item = Emission<V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Until(run) => run.next(),
            Self::Every(run) => run.next(),
            Self::Some(run) => run.next(),
            Self::AUntilB(run) => run.next(),
        }
    }
}

impl<V> fmt::Debug for Replay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Until(run) => f.debug_tuple("Until").field(run).finish(),
            Self::Every(run) => f.debug_tuple("Every").field(run).finish(),
            Self::Some(run) => f.debug_tuple("Some").field(run).finish(),
            Self::AUntilB(run) => f.debug_tuple("AUntilB").field(run).finish(),
        }
    }
}
