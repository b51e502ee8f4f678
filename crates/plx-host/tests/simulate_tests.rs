//! End-to-end simulation of the demo plugins

use plx_core::State;
use plx_executor::Executor;
use plx_host::demo::{self, COUNTDOWN_VERSION, ECHO_VERSION};
use plx_host::{simulate, SimulateOptions};
use plx_runtime::TraceStatus;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn executor() -> Executor {
    Executor::new(Arc::new(demo::registry()))
}

#[test]
fn test_echo_finishes_on_execute() {
    let mut options = SimulateOptions::new("echo-1");
    options.inputs = json!({"message": "hello"});
    options.context_inputs = json!({"executor": "alice"});

    let report = simulate(&executor(), ECHO_VERSION, &options);

    assert!(report.succeeded());
    assert_eq!(report.states, vec![State::Success]);
    assert_eq!(
        report.outputs,
        Some(json!({"message": "hello", "executor": "alice"}))
    );
    assert!(report.status.is_none());
    assert!(report.error.is_none());
}

#[test]
fn test_echo_bad_inputs_fail_execute() {
    let report = simulate(&executor(), ECHO_VERSION, &SimulateOptions::new("echo-2"));

    assert_eq!(report.final_state, State::Fail);
    assert!(report.error.unwrap().contains("plugin failed"));
    assert!(report.outputs.is_none());
}

#[test]
fn test_countdown_polls_until_zero() {
    let mut options = SimulateOptions::new("countdown-1");
    options.inputs = json!({"count": 3, "interval_ms": 10});

    let report = simulate(&executor(), COUNTDOWN_VERSION, &options);

    assert_eq!(
        report.states,
        vec![State::Poll, State::Poll, State::Poll, State::Success]
    );
    assert_eq!(report.status, Some(TraceStatus::Succeeded));
    assert_eq!(report.outputs, Some(json!({"finished_at": 3})));
    assert_eq!(report.pending_polls, 0);
}

#[test]
fn test_countdown_zero_finishes_at_once() {
    let mut options = SimulateOptions::new("countdown-2");
    options.inputs = json!({"count": 0});

    let report = simulate(&executor(), COUNTDOWN_VERSION, &options);

    assert_eq!(report.states, vec![State::Success]);
    assert_eq!(report.outputs, Some(json!({"finished_at": 1})));
}

#[test]
fn test_round_limit_leaves_poll_pending() {
    let mut options = SimulateOptions::new("countdown-3");
    options.inputs = json!({"count": 5});
    options.max_rounds = 1;

    let report = simulate(&executor(), COUNTDOWN_VERSION, &options);

    assert!(!report.succeeded());
    assert_eq!(report.states, vec![State::Poll, State::Poll]);
    assert_eq!(report.pending_polls, 1);
    assert!(matches!(
        report.status,
        Some(TraceStatus::Polling { invoke_count: 2, .. })
    ));
}

#[test]
fn test_unknown_version() {
    let report = simulate(&executor(), "9.9.9", &SimulateOptions::new("missing"));

    assert_eq!(report.states, vec![State::Fail]);
    assert!(report.error.unwrap().contains("9.9.9"));
    assert!(report.status.is_none());
}
