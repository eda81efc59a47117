//! # TAOTE - Temporal Assertions Over Timed Emissions
//!
//! TAOTE composes lazy, possibly infinite sequence producers and runs
//! temporal-logic style checks over them without materializing their output.
//! A wall-clock *exhaustion* budget stands in for "infinity": a producer that
//! outlives the budget is reported as `exhausted` instead of hanging the test.
//!
//! ## Core Concepts
//!
//! - **Source**: a restartable factory of lazy sequences, invoked with the app context
//! - **Control operators**: `until`, `every`, `some` and `a_until_b`, yielding [`Emission`]s
//! - **Shape combinators**: `repeater`, `impurify` and `rate_limit`, wrapping a source
//! - **Memory**: the result map and circular window written by `until`
//! - **Retry**: replay of the last control operator, with or without fresh memory
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use taote::{producers, Emission, Engine, EveryConfig, TerminalState};
//!
//! let mut engine: Engine<(), i64> = Engine::new((), Duration::from_secs(2));
//!
//! let verdicts: Vec<Emission<i64>> = engine
//!     .every(EveryConfig::new(producers::naturals()).condition(|v| *v < 10))
//!     .collect();
//!
//! assert_eq!(
//!     verdicts,
//!     vec![Emission::Verdict(false), Emission::Terminal(TerminalState::Halted)]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod error;
pub mod memory;
pub mod source;
pub mod state;
pub mod time;
pub mod value;

// Engine and combinators
pub mod config;
pub mod engine;
pub mod ir;
pub mod operations;
pub mod producers;

pub use config::{EngineConfig, EXHAUSTION_ENV};
pub use engine::{Engine, Replay};
pub use error::{ConfigurationError, TaoteError, TaoteResult};
pub use ir::{Operation, OperationId, OperationKind, OperationRecord};
pub use memory::{Memory, Window};
pub use source::{Sequence, SequenceSource, Source};
pub use state::{Emission, ExhaustionState, TerminalState};
pub use time::ExhaustionClock;
pub use value::Value;

pub use operations::{
    AUntilBConfig, AUntilBRun, EveryConfig, EveryRun, Impure, ImpurifyConfig, RateLimitConfig,
    RateLimited, Repeat, RepeaterConfig, Shaped, SomeConfig, SomeRun, UntilConfig, UntilRun,
};
#[cfg(feature = "async")]
pub use operations::RateLimitedStream;
