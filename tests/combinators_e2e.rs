use std::thread;
use std::time::Duration;

use taote::{
    producers, AUntilBConfig, ConfigurationError, Emission, Engine, EveryConfig, ImpurifyConfig,
    RateLimitConfig, RepeaterConfig, Shaped, SomeConfig, Source, TerminalState, UntilConfig, Value,
};

const LONG: Duration = Duration::from_secs(60);
const SHORT: Duration = Duration::from_millis(30);

fn engine() -> Engine<(), i64> {
    Engine::new((), LONG)
}

fn short_engine() -> Engine<(), i64> {
    Engine::new((), SHORT)
}

/// Naturals, pausing before each value so a short budget expires quickly.
fn slow_naturals() -> Source<(), i64> {
    Source::new(|_: &()| {
        (0_i64..).map(|n| {
            thread::sleep(Duration::from_millis(2));
            n
        })
    })
}

#[test]
fn until_transforms_and_halts_on_first_rejection() {
    let mut engine = engine();
    let out: Vec<Emission<i64>> = engine
        .until(
            UntilConfig::new(producers::naturals())
                .condition(|v| *v < 4)
                .transformer(|v| v * 2)
                .process(|v, memory| {
                    memory.add("sum", *v);
                })
                .window(3),
        )
        .unwrap()
        .collect();

    assert_eq!(
        out,
        vec![
            Emission::Value(0),
            Emission::Value(2),
            Emission::Value(4),
            Emission::Value(6),
            Emission::Terminal(TerminalState::Halted),
        ]
    );
    assert_eq!(engine.memory().get("sum"), Some(&Value::Int(6)));
    // Window holds raw values: steps 0..4 into 3 slots.
    assert_eq!(engine.memory().window.slots(), &[3, 1, 2]);
    assert_eq!(engine.memory().window.recent().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn until_rejecting_first_value_emits_only_halted() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .until(UntilConfig::new(producers::naturals()).condition(|v| *v > 0))
        .unwrap()
        .collect();
    assert_eq!(out, vec![Emission::Terminal(TerminalState::Halted)]);
    assert!(engine.memory().window.is_empty());
    assert!(engine.memory().result.is_empty());
}

#[test]
fn until_on_infinite_source_reports_exhaustion_then_falls_through() {
    let mut engine = short_engine();
    let mut run = engine.until(UntilConfig::new(slow_naturals())).unwrap();

    let mut markers = 0;
    let mut previous = None;
    let mut after_marker = None;
    for emission in run.by_ref() {
        if emission == Emission::Terminal(TerminalState::Exhausted) {
            markers += 1;
        } else if previous == Some(Emission::Terminal(TerminalState::Exhausted)) {
            after_marker = Some(emission.clone());
        }
        previous = Some(emission);
    }

    assert_eq!(markers, 1);
    // The step that crossed the deadline still surfaces its value.
    assert!(matches!(after_marker, Some(Emission::Value(_))));
    assert_eq!(previous, after_marker);
    assert_eq!(run.next(), None);
}

#[test]
fn until_finite_source_ends_without_marker() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .until(UntilConfig::new(Source::from_values(vec![5, 6, 7])))
        .unwrap()
        .collect();
    assert_eq!(out, vec![Emission::Value(5), Emission::Value(6), Emission::Value(7)]);
    assert_eq!(engine.memory().window.slots(), &[7]);
}

#[test]
fn until_over_fibonacci() {
    let mut engine: Engine<(), u64> = Engine::new((), LONG);
    let values: Vec<u64> = engine
        .until(UntilConfig::new(producers::fibonacci()).condition(|v| *v < 100))
        .unwrap()
        .filter_map(Emission::into_value)
        .collect();
    assert_eq!(values, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89]);
}

#[test]
fn every_finds_counterexample() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .every(EveryConfig::new(producers::naturals()).condition(|v| *v < 100))
        .collect();
    assert_eq!(
        out,
        vec![Emission::Verdict(false), Emission::Terminal(TerminalState::Halted)]
    );
}

#[test]
fn every_is_vacuously_true_on_exhaustion() {
    let mut engine = short_engine();
    let out: Vec<_> = engine
        .every(EveryConfig::new(slow_naturals()).condition(|v| *v >= 0))
        .collect();
    assert_eq!(
        out,
        vec![Emission::Verdict(true), Emission::Terminal(TerminalState::Exhausted)]
    );
}

#[test]
fn some_finds_witness() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .some(SomeConfig::new(producers::naturals()).condition(|v| *v > 300))
        .collect();
    assert_eq!(
        out,
        vec![Emission::Verdict(true), Emission::Terminal(TerminalState::Halted)]
    );
}

#[test]
fn some_without_witness_is_false_on_exhaustion() {
    let mut engine = short_engine();
    let out: Vec<_> = engine
        .some(SomeConfig::new(slow_naturals()).condition(|v| *v < 0))
        .collect();
    assert_eq!(
        out,
        vec![Emission::Verdict(false), Emission::Terminal(TerminalState::Exhausted)]
    );
}

#[test]
fn some_on_finite_source_without_witness_yields_nothing() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .some(SomeConfig::new(Source::from_values(vec![1, 2, 3])).condition(|v| *v > 3))
        .collect();
    assert!(out.is_empty());
}

#[test]
fn a_until_b_switches_when_b_fires() {
    let mut engine = engine();
    let out: Vec<i64> = engine
        .a_until_b(
            AUntilBConfig::new(producers::naturals(), producers::negatives())
                .condition_a(|v| *v >= 0)
                .condition_b(|v| *v < -300),
        )
        .take(305)
        .filter_map(Emission::into_value)
        .collect();

    let mut expected: Vec<i64> = (0..=300).collect();
    expected.extend([-301, -302, -303, -304]);
    assert_eq!(out, expected);
}

#[test]
fn a_until_b_skips_pairs_where_neither_holds() {
    let mut engine = engine();
    let out: Vec<_> = engine
        .a_until_b(
            AUntilBConfig::new(
                Source::from_values(vec![1, 2, 3, 4]),
                Source::from_values(vec![10, 20, 30]),
            )
            .condition_a(|v| *v % 2 == 0)
            .condition_b(|v| *v == 30),
        )
        .collect();
    // The shorter source ends the zip; `4` is never paired.
    assert_eq!(out, vec![Emission::Value(2), Emission::Value(30)]);
}

#[test]
fn a_until_b_defaults_surface_nothing_until_exhausted() {
    let mut engine = short_engine();
    let out: Vec<_> = engine
        .a_until_b(AUntilBConfig::new(slow_naturals(), slow_naturals()))
        .collect();
    assert_eq!(out, vec![Emission::Terminal(TerminalState::Exhausted)]);
}

#[test]
fn repeater_resamples_each_round() {
    let engine = engine();
    let out: Vec<i64> = engine
        .repeater(RepeaterConfig::new(producers::naturals()).round(5))
        .unwrap()
        .take(10)
        .collect();
    assert_eq!(out, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
}

#[test]
fn repeater_rejects_zero_round() {
    let engine = engine();
    let err = engine
        .repeater(RepeaterConfig::new(producers::naturals()).round(0))
        .unwrap_err();
    assert_eq!(err.as_configuration(), Some(&ConfigurationError::ZeroRound));
}

#[test]
fn impurify_hop_drops_multiples() {
    let engine = engine();
    let out: Vec<(usize, i64)> = engine
        .impurify(ImpurifyConfig::new(Source::<(), i64>::from_values((0..=5).collect())).hop(3))
        .unwrap()
        .filter_map(Shaped::into_original)
        .collect();
    assert_eq!(out, vec![(1, 1), (2, 2), (4, 4), (5, 5)]);
}

#[test]
fn impurify_end_before_start_never_opens_source() {
    let engine = engine();
    let opened = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = std::sync::Arc::clone(&opened);
    let source: Source<(), i64> = Source::new(move |_: &()| {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        0_i64..
    });

    let out: Vec<_> = engine
        .impurify(ImpurifyConfig::new(source).end_before_start(true))
        .unwrap()
        .collect();
    assert_eq!(out.len(), 1);
    assert!(matches!(out[0], Shaped::EndBeforeStart));
    assert_eq!(out[0].position(), None);
    assert!(!opened.load(std::sync::atomic::Ordering::SeqCst));
}

#[test]
fn impurify_ignore_some_drops_the_value_at_position_n() {
    let engine = engine();
    let positions: Vec<usize> = engine
        .impurify(ImpurifyConfig::new(Source::<(), i64>::from_values((0..=5).collect())).ignore_some(3))
        .unwrap()
        .filter_map(Shaped::into_original)
        .map(|(position, _)| position)
        .collect();
    assert_eq!(positions, vec![0, 1, 2, 4, 5]);
}

#[test]
fn impurify_expander_injects_before_odd_positions() {
    let engine = engine();
    let out: Vec<Option<i64>> = engine
        .impurify(
            ImpurifyConfig::new(Source::from_values(vec![10, 11, 12, 13]))
                .expander(2)
                .seed(7),
        )
        .unwrap()
        .map(|shaped| shaped.position())
        .collect();
    assert_eq!(
        out,
        vec![
            Some(0),
            Some(-1),
            Some(-1),
            Some(1),
            Some(2),
            Some(-1),
            Some(-1),
            Some(3),
        ]
    );
}

#[test]
fn impurify_rejects_bad_modes() {
    let engine = engine();
    let source = || Source::<(), i64>::from_values(vec![1, 2, 3]);

    let none = engine.impurify(ImpurifyConfig::new(source())).unwrap_err();
    assert_eq!(none.as_configuration(), Some(&ConfigurationError::NoShapeMode));

    let combined = engine
        .impurify(ImpurifyConfig::new(source()).end_before_start(true).hop(2))
        .unwrap_err();
    assert_eq!(
        combined.as_configuration(),
        Some(&ConfigurationError::EndBeforeStartCombined)
    );

    let shrinker = engine
        .impurify(ImpurifyConfig::new(source()).shrinker(2))
        .unwrap_err();
    assert!(matches!(
        shrinker.as_configuration(),
        Some(ConfigurationError::UnsupportedMode { .. })
    ));
}

#[test]
fn rate_limit_preserves_values() {
    let engine = engine();
    let out: Vec<i64> = engine
        .rate_limit(RateLimitConfig::new(
            Source::from_values(vec![3, 1, 2]),
            Duration::from_millis(1),
        ))
        .collect();
    assert_eq!(out, vec![3, 1, 2]);
}

#[test]
fn sources_receive_the_app_context() {
    struct App {
        offset: i64,
    }

    let mut engine: Engine<App, i64> = Engine::new(App { offset: 100 }, LONG);
    let source: Source<App, i64> = Source::new(|app: &App| {
        let offset = app.offset;
        (0_i64..3).map(move |n| n + offset)
    });
    let out: Vec<i64> = engine
        .until(UntilConfig::new(source))
        .unwrap()
        .filter_map(Emission::into_value)
        .collect();
    assert_eq!(out, vec![100, 101, 102]);
    assert_eq!(engine.app().offset, 100);
}
