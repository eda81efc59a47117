//! Ready-made sequence producers.
//!
//! Handy for drivers and tests. Each ignores the application context and
//! restarts from its first value on every open.

use std::iter;

use crate::source::Source;

/// 0, 1, 2, ...
#[must_use]
pub fn naturals<C: 'static>() -> Source<C, i64> {
    Source::new(|_: &C| 0_i64..)
}

/// 0, -1, -2, ...
#[must_use]
pub fn negatives<C: 'static>() -> Source<C, i64> {
    Source::new(|_: &C| (0_i64..).map(|n| -n))
}

/// 0, 1, 1, 2, 3, 5, ...
///
/// Ends after the last term that fits in a `u64`.
#[must_use]
pub fn fibonacci<C: 'static>() -> Source<C, u64> {
    Source::new(|_: &C| {
        iter::successors(Some((0_u64, Some(1_u64))), |&(current, next)| {
            let next = next?;
            Some((next, current.checked_add(next)))
        })
        .map(|(term, _)| term)
    })
}
