//! Local lifecycle simulator
//!
//! Runs `execute` once, then keeps delivering the polls armed in a
//! [`MemoryRuntime`] as `schedule` calls. Poll intervals are recorded but
//! never waited for.

use plx_core::State;
use plx_executor::Executor;
use plx_runtime::{JsonInputsReader, MemoryRuntime, TraceStatus};
use serde::Serialize;
use serde_json::{Map, Value};

/// Default cap on schedule rounds
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateOptions {
    /// Trace id of the run
    pub trace_id: String,
    /// First-call inputs
    pub inputs: Value,
    /// Context inputs carried by every call
    pub context_inputs: Value,
    /// Schedule rounds allowed after execute
    pub max_rounds: u32,
}

impl SimulateOptions {
    /// Create options with empty payloads
    #[must_use]
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            inputs: Value::Object(Map::new()),
            context_inputs: Value::Object(Map::new()),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Outcome of one simulated trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Trace id of the run
    pub trace_id: String,
    /// Plugin version
    pub version: String,
    /// State returned by execute and then by every schedule round
    pub states: Vec<State>,
    /// Last state reached
    pub final_state: State,
    /// Disposition recorded by the runtime, if any
    pub status: Option<TraceStatus>,
    /// Outputs written by the plugin, if any
    pub outputs: Option<Value>,
    /// Error returned to the caller, if any
    pub error: Option<String>,
    /// Polls still armed when the round limit was hit
    pub pending_polls: usize,
}

impl SimulationReport {
    /// Check if the trace finished successfully
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.final_state == State::Success
    }
}

/// Simulate one trace of `version` from first call to terminal state
#[must_use]
pub fn simulate(executor: &Executor, version: &str, options: &SimulateOptions) -> SimulationReport {
    let runtime = MemoryRuntime::new();
    let reader = JsonInputsReader::new(options.inputs.clone(), options.context_inputs.clone());
    let mut states = Vec::new();
    let mut error = None;

    tracing::info!(trace_id = %options.trace_id, version, "simulation started");

    match executor.execute(&options.trace_id, version, &reader, &runtime) {
        Ok(state) => states.push(state),
        Err(err) => {
            states.push(err.state());
            error = Some(err.to_string());
        }
    }

    let mut rounds = 0;
    while error.is_none() && rounds < options.max_rounds {
        let Some(poll) = runtime.next_poll() else {
            break;
        };
        rounds += 1;
        tracing::debug!(round = rounds, interval = ?poll.interval, "delivering poll");

        let scheduled = executor.schedule(
            &poll.trace_id,
            &poll.version,
            poll.invoke_count,
            &reader,
            &runtime,
        );
        match scheduled {
            Ok(state) => states.push(state),
            Err(err) => {
                states.push(err.state());
                error = Some(err.to_string());
            }
        }
    }

    let pending_polls = runtime.pending_polls();
    if pending_polls > 0 {
        tracing::warn!(rounds, pending_polls, "round limit reached");
    }

    let final_state = states.last().copied().unwrap_or(State::Fail);
    tracing::info!(%final_state, rounds, "simulation finished");

    SimulationReport {
        trace_id: options.trace_id.clone(),
        version: version.to_string(),
        states,
        final_state,
        status: runtime.status(&options.trace_id),
        outputs: runtime.outputs().get(&options.trace_id),
        error,
        pending_polls,
    }
}
