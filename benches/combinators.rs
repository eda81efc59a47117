use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use taote::{
    producers, AUntilBConfig, Engine, EveryConfig, ImpurifyConfig, RepeaterConfig, UntilConfig,
};

const STEPS: u64 = 10_000;

fn engine() -> Engine<(), i64> {
    Engine::new((), Duration::from_secs(60))
}

fn bench_until(c: &mut Criterion) {
    let mut group = c.benchmark_group("until");
    group.throughput(Throughput::Elements(STEPS));

    group.bench_function("accept_10k_with_process", |b| {
        let mut engine = engine();
        b.iter(|| {
            engine.memory_mut().reset();
            let limit = i64::try_from(STEPS).unwrap_or(i64::MAX);
            let run = engine
                .until(
                    UntilConfig::new(producers::naturals())
                        .condition(move |v| *v < limit)
                        .transformer(|v| v * 2)
                        .process(|v, memory| {
                            memory.add("sum", *v);
                        })
                        .window(64),
                )
                .unwrap();
            black_box(run.count())
        });
    });

    group.finish();
}

fn bench_every(c: &mut Criterion) {
    let mut group = c.benchmark_group("every");
    group.throughput(Throughput::Elements(STEPS));

    group.bench_function("scan_10k_until_counterexample", |b| {
        let mut engine = engine();
        let limit = i64::try_from(STEPS).unwrap_or(i64::MAX);
        b.iter(|| {
            let run = engine.every(EveryConfig::new(producers::naturals()).condition(move |v| *v < limit));
            black_box(run.count())
        });
    });

    group.finish();
}

fn bench_a_until_b(c: &mut Criterion) {
    let mut group = c.benchmark_group("a_until_b");
    group.throughput(Throughput::Elements(STEPS));

    group.bench_function("lockstep_10k", |b| {
        let mut engine = engine();
        let steps = usize::try_from(STEPS).unwrap_or(usize::MAX);
        b.iter(|| {
            let run = engine.a_until_b(
                AUntilBConfig::new(producers::naturals(), producers::negatives())
                    .condition_a(|v| *v >= 0)
                    .condition_b(|v| *v < -300),
            );
            black_box(run.take(steps).count())
        });
    });

    group.finish();
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("shapes");
    group.throughput(Throughput::Elements(STEPS));
    let steps = usize::try_from(STEPS).unwrap_or(usize::MAX);
    let engine = engine();

    group.bench_function("repeater_round_8", |b| {
        b.iter(|| {
            let repeat = engine
                .repeater(RepeaterConfig::new(producers::naturals()).round(8))
                .unwrap();
            black_box(repeat.take(steps).count())
        });
    });

    group.bench_function("impurify_expander_4", |b| {
        b.iter(|| {
            let impure = engine
                .impurify(ImpurifyConfig::new(producers::naturals()).expander(4).seed(1))
                .unwrap();
            black_box(impure.take(steps).count())
        });
    });

    group.finish();
}

criterion_group!(combinators, bench_until, bench_every, bench_a_until_b, bench_shapes);
criterion_main!(combinators);
