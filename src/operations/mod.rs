//! Combinators over sequence sources.
//!
//! Each combinator takes a single configuration built fluently from its
//! source, with every other field defaulted. The control operators
//! (`until`, `every`, `some`, `AUntilB`) yield [`Emission`]s and are
//! remembered by the engine for `retry`; the shape combinators (`repeater`,
//! `impurify`, `rateLimit`) wrap a source into a new lazy sequence.

use std::sync::Arc;

use crate::memory::Memory;
use crate::state::Emission;

mod a_until_b;
mod every;
mod impurify;
mod rate_limit;
mod repeater;
mod some;
mod until;

pub use a_until_b::{AUntilBConfig, AUntilBRun};
pub use every::{EveryConfig, EveryRun};
pub use impurify::{Impure, ImpurifyConfig, Shaped};
pub use rate_limit::{RateLimitConfig, RateLimited};
#[cfg(feature = "async")]
pub use rate_limit::RateLimitedStream;
pub use repeater::{Repeat, RepeaterConfig};
pub use some::{SomeConfig, SomeRun};
pub use until::{UntilConfig, UntilRun};

/// Predicate over a produced value.
pub type Condition<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

/// Maps an accepted value to the value `until` emits.
pub type Transformer<V> = Arc<dyn Fn(V) -> V + Send + Sync>;

/// Side effect run on every value `until` accepts.
pub type Process<V> = Arc<dyn Fn(&V, &mut Memory<V>) + Send + Sync>;

pub(crate) fn always<V: 'static>(answer: bool) -> Condition<V> {
    Arc::new(move |_: &V| answer)
}

/// Splits the output of one step into what to emit now and what to hold.
///
/// A step that observed expiry emits its marker first and still evaluates its
/// condition; that second outcome is held for the following `next()`.
pub(crate) fn emit_step<V>(
    marker: Option<Emission<V>>,
    outcome: Option<Emission<V>>,
    pending: &mut Option<Emission<V>>,
) -> Option<Emission<V>> {
    match marker {
        Some(marker) => {
            *pending = outcome;
            Some(marker)
        }
        None => outcome,
    }
}
