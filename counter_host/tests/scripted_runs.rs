//! Scripted Run Tests
//!
//! Validates that a simulated host reproduces counter behavior end to end:
//! clock readings become deltas, actions become transitions, and every
//! transition is logged.

use counter_host::{CounterAction, CounterHost, CounterScript, HostConfig, HostError};
use transition_log::LogLevel;
use window_counter::{CounterConfig, EventWindowCounter};

fn simulated(duration_ms: f64) -> CounterHost<counter_host::SimFrameClock> {
    CounterHost::simulated(HostConfig::new(CounterConfig::new(duration_ms)))
        .expect("Failed to create host")
}

#[test]
fn test_keystrokes_script() {
    let mut host = simulated(30_000.0);
    let mut script = CounterScript::from_text(include_str!("../scripts/keystrokes.wcs"))
        .expect("Failed to parse script");

    host.run_script(&mut script).expect("Script failed");

    assert_eq!(host.counter().count(), 1);
    assert_eq!(host.counter().passed_millis(), 40_500.0);
    assert!(host.counter().is_moving());
}

#[test]
fn test_resets_script() {
    let mut host = simulated(1_000.0);
    let mut script = CounterScript::from_text(include_str!("../scripts/resets.wcs"))
        .expect("Failed to parse script");

    host.run_script(&mut script).expect("Script failed");

    assert_eq!(
        host.counter(),
        &EventWindowCounter::new(1_000.0, true),
        "reset whole should leave a fresh moving counter"
    );
}

#[test]
fn test_host_matches_direct_transitions() {
    // Driving through the host must give the same value as calling the
    // counter directly with the same deltas.
    let mut host = simulated(250.0);
    let mut direct = EventWindowCounter::new(250.0, true);

    let frames = [16.0, 17.0, 16.5, 300.0, 0.0, 0.0, 33.0];
    for (frame, delta) in frames.iter().enumerate() {
        if frame % 2 == 0 {
            host.apply(CounterAction::Increment);
            direct = direct.increment();
        }
        host.clock_mut().advance_millis(*delta);
        host.tick();
        direct = direct.advance(*delta);
    }

    assert_eq!(host.counter(), &direct);
}

#[test]
fn test_single_expiry_visible_in_log() {
    let mut host = simulated(10.0);
    let mut script = CounterScript::from_text(
        r#"
        increment 2
        wait 11ms
        expect count 1
        tick
        expect count 0
        "#,
    )
    .unwrap();

    host.run_script(&mut script).unwrap();

    let expired = host
        .log()
        .entries()
        .filter(|entry| entry.message == "event expired")
        .count();
    assert_eq!(expired, 2);

    let warnings = host.log().entries_at_least(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "overdue events pending");
}

#[test]
fn test_failed_expectation_reports_line() {
    let mut host = simulated(1_000.0);
    let mut script = CounterScript::from_text("increment\n\n# comment\nexpect count 5").unwrap();

    let err = host.run_script(&mut script).unwrap_err();
    assert_eq!(
        err,
        HostError::ExpectationFailed {
            line: 4,
            expected: "count 5".to_string(),
            actual: "count 1".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Expectation failed at line 4: expected count 5, got count 1"
    );
}

#[test]
fn test_log_entries_tagged_with_host_id() {
    let mut host = simulated(1_000.0);
    host.apply(CounterAction::Increment);
    host.apply(CounterAction::Toggle);
    host.tick();

    let id = host.id();
    assert!(host.log().entries().all(|entry| entry.source == Some(id)));
}

#[test]
fn test_small_log_capacity() {
    let config = HostConfig {
        log_capacity: 3,
        ..HostConfig::new(CounterConfig::new(1_000.0))
    };
    let mut host = CounterHost::simulated(config).unwrap();
    for _ in 0..10 {
        host.apply(CounterAction::Increment);
    }

    assert_eq!(host.log().len(), 3);
    assert_eq!(host.log().last().unwrap().field("count"), Some("10"));
}

#[test]
fn test_snapshot_json_from_host() {
    let mut host = simulated(500.0);
    host.apply(CounterAction::Increment);
    host.clock_mut().advance_millis(100.0);
    host.tick();

    let json = host.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["passed_ms"], 100.0);
    assert_eq!(value["expiries"][0], 500.0);
}
