//! IMPURIFY: distort the shape of a sequence without touching its values.
//!
//! Sources are pure; tests of shape-sensitive consumers need sequences that
//! end early, skip, or gain extra items. Surviving values are tagged with
//! their original 0-based position so a consumer can tell what changed.
//!
//! Exactly one mode is expected:
//! - `end_before_start`: a single sentinel, the source is never opened.
//! - `ignore_some(n)`: a countdown from `n`, one tick per value. Values are
//!   emitted while it is running and again after it goes past zero; only the
//!   value at position `n`, where it reads exactly zero, is dropped.
//! - `hop(n)`: drops every value whose occurrence index is a multiple of `n`.
//! - `expander(n)`: before each odd-indexed value, injects `n` random fillers
//!   at position `-1`.
//! - `shrinker`: reserved, rejected as unsupported.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigurationError;
use crate::source::{Sequence, Source};

/// Configuration for `impurify`.
pub struct ImpurifyConfig<C, T> {
    pub(crate) generator: Source<C, T>,
    pub(crate) end_before_start: bool,
    pub(crate) ignore_some: usize,
    pub(crate) hop: usize,
    pub(crate) expander: usize,
    pub(crate) shrinker: usize,
    pub(crate) seed: Option<u64>,
}

impl<C, T> ImpurifyConfig<C, T> {
    /// Creates a configuration with no mode selected.
    pub fn new(generator: Source<C, T>) -> Self {
        Self {
            generator,
            end_before_start: false,
            ignore_some: 0,
            hop: 0,
            expander: 0,
            shrinker: 0,
            seed: None,
        }
    }

    /// Emit a single end sentinel without opening the source.
    #[must_use]
    pub fn end_before_start(mut self, enabled: bool) -> Self {
        self.end_before_start = enabled;
        self
    }

    /// Drop the value at position `count`; see the module docs.
    #[must_use]
    pub fn ignore_some(mut self, count: usize) -> Self {
        self.ignore_some = count;
        self
    }

    /// Drop every value whose position is a multiple of `every`.
    #[must_use]
    pub fn hop(mut self, every: usize) -> Self {
        self.hop = every;
        self
    }

    /// Inject `fillers` random values before each odd-positioned value.
    #[must_use]
    pub fn expander(mut self, fillers: usize) -> Self {
        self.expander = fillers;
        self
    }

    /// Reserved. Set on its own it is rejected as unsupported.
    #[must_use]
    pub fn shrinker(mut self, amount: usize) -> Self {
        self.shrinker = amount;
        self
    }

    /// Seed for expander fillers. Without one the RNG is seeded from entropy.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl<C, T> Clone for ImpurifyConfig<C, T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            end_before_start: self.end_before_start,
            ignore_some: self.ignore_some,
            hop: self.hop,
            expander: self.expander,
            shrinker: self.shrinker,
            seed: self.seed,
        }
    }
}

impl<C, T> fmt::Debug for ImpurifyConfig<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpurifyConfig")
            .field("end_before_start", &self.end_before_start)
            .field("ignore_some", &self.ignore_some)
            .field("hop", &self.hop)
            .field("expander", &self.expander)
            .field("shrinker", &self.shrinker)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeMode {
    EndBeforeStart,
    IgnoreSome(usize),
    Hop(usize),
    Expander(usize),
}

impl ShapeMode {
    fn resolve<C, T>(config: &ImpurifyConfig<C, T>) -> Result<Self, ConfigurationError> {
        let others = config.ignore_some > 0 || config.hop > 0 || config.expander > 0 || config.shrinker > 0;
        if !config.end_before_start && !others {
            return Err(ConfigurationError::NoShapeMode);
        }
        if config.end_before_start && others {
            return Err(ConfigurationError::EndBeforeStartCombined);
        }
        if config.shrinker > 0 && config.expander > 0 {
            tracing::warn!("shrinker along with expander is confusing; running expander");
        }

        if config.end_before_start {
            return Ok(Self::EndBeforeStart);
        }
        if config.ignore_some > 0 {
            if config.hop > 0 || config.expander > 0 {
                tracing::warn!("several shape modes set; ignore_some takes precedence");
            }
            return Ok(Self::IgnoreSome(config.ignore_some));
        }
        if config.hop > 0 {
            if config.expander > 0 {
                tracing::warn!("several shape modes set; hop takes precedence");
            }
            return Ok(Self::Hop(config.hop));
        }
        if config.expander > 0 {
            return Ok(Self::Expander(config.expander));
        }
        if config.shrinker > 0 {
            return Err(ConfigurationError::UnsupportedMode {
                mode: "shrinker".to_string(),
            });
        }
        Err(ConfigurationError::UnreachableConfiguration)
    }
}

/// One item of an impurified sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped<T> {
    /// The null sentinel of `end_before_start`.
    EndBeforeStart,
    /// An original value and its 0-based position in the source.
    Original {
        /// 0-based index in the source.
        position: usize,
        /// The untouched value.
        value: T,
    },
    /// A random filler injected by `expander`.
    Injected(f64),
}

impl<T> Shaped<T> {
    /// Position tag: the original index, `-1` for injected fillers, none for
    /// the sentinel.
    #[must_use]
    pub fn position(&self) -> Option<i64> {
        match self {
            Self::EndBeforeStart => None,
            Self::Original { position, .. } => Some(i64::try_from(*position).unwrap_or(i64::MAX)),
            Self::Injected(_) => Some(-1),
        }
    }

    /// True for an injected filler.
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::Injected(_))
    }

    /// The original position and value, if this is one.
    pub fn into_original(self) -> Option<(usize, T)> {
        match self {
            Self::Original { position, value } => Some((position, value)),
            _ => None,
        }
    }
}

/// The impurified sequence.
pub struct Impure<T> {
    sequence: Option<Sequence<T>>,
    mode: ShapeMode,
    position: usize,
    fillers_left: usize,
    held: Option<(usize, T)>,
    rng: StdRng,
    done: bool,
}

impl<T> Impure<T> {
    pub(crate) fn start<C>(config: &ImpurifyConfig<C, T>, ctx: &C) -> Result<Self, ConfigurationError> {
        let mode = ShapeMode::resolve(config)?;
        let sequence = match mode {
            ShapeMode::EndBeforeStart => None,
            _ => Some(config.generator.open(ctx)),
        };
        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self {
            sequence,
            mode,
            position: 0,
            fillers_left: 0,
            held: None,
            rng,
            done: false,
        })
    }

    fn pull(&mut self) -> Option<(usize, T)> {
        let value = self.sequence.as_mut()?.next()?;
        let position = self.position;
        self.position += 1;
        Some((position, value))
    }
}

impl<T> Iterator for Impure<T> {
    type Item = Shaped<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.mode {
            ShapeMode::EndBeforeStart => {
                self.done = true;
                return Some(Shaped::EndBeforeStart);
            }
            // The countdown passes through zero exactly once, at position `n`.
            ShapeMode::IgnoreSome(skip) => loop {
                let (position, value) = self.pull()?;
                if position != skip {
                    break Shaped::Original { position, value };
                }
            },
            ShapeMode::Hop(every) => loop {
                let (position, value) = self.pull()?;
                if position % every != 0 {
                    break Shaped::Original { position, value };
                }
            },
            ShapeMode::Expander(fillers) => {
                if self.fillers_left > 0 {
                    self.fillers_left -= 1;
                    return Some(Shaped::Injected(self.rng.gen()));
                }
                if let Some((position, value)) = self.held.take() {
                    return Some(Shaped::Original { position, value });
                }
                let (position, value) = self.pull()?;
                if position % 2 == 1 && fillers > 0 {
                    self.held = Some((position, value));
                    self.fillers_left = fillers - 1;
                    return Some(Shaped::Injected(self.rng.gen()));
                }
                Shaped::Original { position, value }
            }
        };
        Some(item)
    }
}

impl<T> fmt::Debug for Impure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Impure")
            .field("mode", &self.mode)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
