//! RATE LIMIT: pace a source with a fixed delay before each value.
//!
//! Used to simulate backpressure. Order and content are untouched: each value
//! is pulled, held for `delay`, then yielded.

use std::fmt;
use std::time::Duration;

use crate::source::{Sequence, Source};

/// Configuration for `rate_limit`.
pub struct RateLimitConfig<C, T> {
    pub(crate) generator: Source<C, T>,
    pub(crate) delay: Duration,
}

impl<C, T> RateLimitConfig<C, T> {
    /// Creates a configuration delaying every value of `generator` by `delay`.
    pub fn new(generator: Source<C, T>, delay: Duration) -> Self {
        Self { generator, delay }
    }
}

impl<C, T> Clone for RateLimitConfig<C, T> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
            delay: self.delay,
        }
    }
}

impl<C, T> fmt::Debug for RateLimitConfig<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitConfig")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Blocking rate limiter: the calling thread sleeps before each value.
pub struct RateLimited<T> {
    sequence: Sequence<T>,
    delay: Duration,
}

impl<T> RateLimited<T> {
    pub(crate) fn start<C>(config: &RateLimitConfig<C, T>, ctx: &C) -> Self {
        Self {
            sequence: config.generator.open(ctx),
            delay: config.delay,
        }
    }
}

impl<T> Iterator for RateLimited<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.sequence.next()?;
        std::thread::sleep(self.delay);
        Some(value)
    }
}

impl<T> fmt::Debug for RateLimited<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimited")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "async")]
pub use self::stream::RateLimitedStream;

#[cfg(feature = "async")]
mod stream {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{ready, Context, Poll};
    use std::time::Duration;

    use tokio::time::Sleep;
    use tokio_stream::Stream;

    use crate::source::Sequence;

    use super::RateLimitConfig;

    /// Async rate limiter: suspends on a tokio timer before each value.
    ///
    /// Must be polled inside a tokio runtime with the time driver enabled.
    pub struct RateLimitedStream<T> {
        sequence: Sequence<T>,
        delay: Duration,
        held: Option<T>,
        timer: Option<Pin<Box<Sleep>>>,
    }

    // `held` is never pinned; only the boxed timer is polled through a pin.
    impl<T> Unpin for RateLimitedStream<T> {}

    impl<T> RateLimitedStream<T> {
        pub(crate) fn start<C>(config: &RateLimitConfig<C, T>, ctx: &C) -> Self {
            Self {
                sequence: config.generator.open(ctx),
                delay: config.delay,
                held: None,
                timer: None,
            }
        }
    }

    impl<T> Stream for RateLimitedStream<T> {
        type Item = T;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let this = self.get_mut();
            if this.held.is_none() {
                let Some(value) = this.sequence.next() else {
                    return Poll::Ready(None);
                };
                this.held = Some(value);
                this.timer = Some(Box::pin(tokio::time::sleep(this.delay)));
            }
            if let Some(timer) = this.timer.as_mut() {
                ready!(timer.as_mut().poll(cx));
                this.timer = None;
            }
            Poll::Ready(this.held.take())
        }
    }

    impl<T> fmt::Debug for RateLimitedStream<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("RateLimitedStream")
                .field("delay", &self.delay)
                .field("waiting", &self.timer.is_some())
                .finish_non_exhaustive()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::source::Source;
        use tokio_stream::StreamExt;

        #[tokio::test(start_paused = true)]
        async fn test_stream_waits_before_each_value() {
            let cfg = RateLimitConfig::new(Source::<(), u32>::from_values(vec![1, 2, 3]), Duration::from_millis(100));
            let start = tokio::time::Instant::now();
            let out: Vec<u32> = RateLimitedStream::start(&cfg, &()).collect().await;
            assert_eq!(out, vec![1, 2, 3]);
            assert!(start.elapsed() >= Duration::from_millis(300));
        }

        #[tokio::test(start_paused = true)]
        async fn test_stream_first_value_is_delayed() {
            let cfg = RateLimitConfig::new(Source::<(), u32>::new(|_: &()| 0u32..), Duration::from_secs(5));
            let mut stream = RateLimitedStream::start(&cfg, &());
            let start = tokio::time::Instant::now();
            assert_eq!(stream.next().await, Some(0));
            assert!(start.elapsed() >= Duration::from_secs(5));
        }
    }
}
