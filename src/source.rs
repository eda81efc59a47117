//! Sequence sources: restartable factories of lazy sequences.
//!
//! A source is invoked with the engine's application context and must return
//! a fresh, independent sequence every time. `repeater` and `retry` depend on
//! this: they re-invoke the source to start over from the beginning.

use std::fmt;
use std::sync::Arc;

/// A lazy, possibly infinite sequence of values.
pub type Sequence<V> = Box<dyn Iterator<Item = V>>;

/// Factory contract for lazy sequences.
///
/// Implemented for every `Fn(&C) -> impl IntoIterator<Item = V>` closure
/// whose iterator owns its state.
pub trait SequenceSource<C, V>: Send + Sync {
    /// Produce a fresh sequence starting from its initial state.
    fn open(&self, ctx: &C) -> Sequence<V>;
}

impl<C, V, F, I> SequenceSource<C, V> for F
where
    F: Fn(&C) -> I + Send + Sync,
    I: IntoIterator<Item = V>,
    I::IntoIter: 'static,
{
    fn open(&self, ctx: &C) -> Sequence<V> {
        Box::new(self(ctx).into_iter())
    }
}

/// Shared handle to a [`SequenceSource`].
///
/// Cloning is cheap; clones open the same underlying factory.
///
/// # Examples
///
/// ```
/// use taote::Source;
///
/// let evens: Source<(), u64> = Source::new(|_: &()| (0u64..).step_by(2));
/// let first: Vec<u64> = evens.open(&()).take(3).collect();
/// assert_eq!(first, vec![0, 2, 4]);
///
/// // Every open starts over.
/// assert_eq!(evens.open(&()).next(), Some(0));
/// ```
pub struct Source<C, V> {
    inner: Arc<dyn SequenceSource<C, V>>,
}

impl<C, V> Source<C, V> {
    /// Wrap a factory.
    pub fn new(source: impl SequenceSource<C, V> + 'static) -> Self {
        Self {
            inner: Arc::new(source),
        }
    }

    /// Open a fresh sequence.
    #[must_use]
    pub fn open(&self, ctx: &C) -> Sequence<V> {
        self.inner.open(ctx)
    }
}

impl<C, V> Source<C, V>
where
    V: Clone + Send + Sync + 'static,
{
    /// A finite source replaying `values` from the start on every open.
    #[must_use]
    pub fn from_values(values: Vec<V>) -> Self {
        let values: Arc<[V]> = values.into();
        Self::new(move |_: &C| {
            let values = Arc::clone(&values);
            (0..values.len()).map(move |i| values[i].clone())
        })
    }
}

impl<C, V> Clone for Source<C, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, V> fmt::Debug for Source<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}
