#![cfg(feature = "async")]

use std::time::Duration;

use tokio::time::Instant;
use tokio_stream::StreamExt;

use taote::{producers, Engine, RateLimitConfig, Source};

fn engine() -> Engine<(), i64> {
    Engine::new((), Duration::from_secs(2))
}

#[tokio::test(start_paused = true)]
async fn stream_paces_every_value() {
    let engine = engine();
    let start = Instant::now();
    let out: Vec<i64> = engine
        .rate_limit_stream(RateLimitConfig::new(
            Source::from_values(vec![4, 8, 15, 16]),
            Duration::from_millis(250),
        ))
        .collect()
        .await;

    assert_eq!(out, vec![4, 8, 15, 16]);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn stream_over_infinite_source_is_lazy() {
    let engine = engine();
    let mut stream = engine
        .rate_limit_stream(RateLimitConfig::new(producers::naturals(), Duration::from_secs(1)))
        .take(3);

    let mut seen = Vec::new();
    while let Some(value) = stream.next().await {
        seen.push(value);
    }
    assert_eq!(seen, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn stream_holds_value_until_timer_fires() {
    let engine = engine();
    let mut stream = engine.rate_limit_stream(RateLimitConfig::new(
        Source::from_values(vec![42_i64]),
        Duration::from_secs(10),
    ));

    let early = tokio::time::timeout(Duration::from_secs(5), stream.next()).await;
    assert!(early.is_err());

    // The value pulled before the timeout is still delivered.
    assert_eq!(stream.next().await, Some(42));
    assert_eq!(stream.next().await, None);
}
