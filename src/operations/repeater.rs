//! REPEATER: round-robin re-sampling of a source.
//!
//! Each pass opens a fresh sequence and counts its values from 1. Values whose
//! count is not a multiple of `round` are emitted; the first value whose count
//! is a multiple is dropped and the pass is abandoned for a new one. A finite
//! source is simply repeated.

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::source::{Sequence, Source};

/// Configuration for `repeater`. Default round: 1.
pub struct RepeaterConfig<C, T> {
    pub(crate) generator: Source<C, T>,
    pub(crate) round: usize,
}

impl<C, T> RepeaterConfig<C, T> {
    /// Creates a configuration over `generator`.
    pub fn new(generator: Source<C, T>) -> Self {
        Self {
            generator,
            round: 1,
        }
    }

    /// Pass length; `round - 1` values are emitted per full pass.
    #[must_use]
    pub fn round(mut self, round: usize) -> Self {
        self.round = round;
        self
    }
}

impl<C, T> Clone for RepeaterConfig<C, T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            round: self.round,
        }
    }
}

impl<C, T> fmt::Debug for RepeaterConfig<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeaterConfig")
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

/// The repeating sequence.
///
/// Unbounded as long as passes keep producing values. A pass that emits
/// nothing (an empty source, or `round == 1`) would repeat identically
/// forever, so the repeater ends instead.
pub struct Repeat<C, T> {
    app: Arc<C>,
    generator: Source<C, T>,
    round: usize,
    pass: Option<Sequence<T>>,
    count: usize,
    pass_emitted: bool,
    passes: u64,
    finished: bool,
}

impl<C, T> Repeat<C, T> {
    pub(crate) fn start(config: RepeaterConfig<C, T>, app: Arc<C>) -> Result<Self, ConfigurationError> {
        if config.round == 0 {
            return Err(ConfigurationError::ZeroRound);
        }
        Ok(Self {
            app,
            generator: config.generator,
            round: config.round,
            pass: None,
            count: 0,
            pass_emitted: false,
            passes: 0,
            finished: false,
        })
    }

    /// Passes opened so far.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    fn end_pass(&mut self) {
        self.pass = None;
        if !self.pass_emitted {
            tracing::debug!(round = self.round, passes = self.passes, "repeater pass emitted nothing; stopping");
            self.finished = true;
        }
    }
}

impl<C, T> Iterator for Repeat<C, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let Some(pass) = self.pass.as_mut() else {
                self.passes += 1;
                self.count = 0;
                self.pass_emitted = false;
                self.pass = Some(self.generator.open(&self.app));
                continue;
            };

            match pass.next() {
                Some(value) => {
                    self.count += 1;
                    if self.count % self.round != 0 {
                        self.pass_emitted = true;
                        return Some(value);
                    }
                    self.end_pass();
                }
                None => self.end_pass(),
            }
        }
        None
    }
}

impl<C, T> fmt::Debug for Repeat<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repeat")
            .field("round", &self.round)
            .field("passes", &self.passes)
            .field("count", &self.count)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
