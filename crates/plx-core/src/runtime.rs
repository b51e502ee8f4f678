//! Interfaces the host runtime must provide
//!
//! The core never persists anything or waits on a clock by itself. Every
//! side effect goes through one of these traits:
//! - [`InputsReader`]: payloads supplied with the call
//! - [`ObjectStore`]: per-trace persistence (context data, outputs)
//! - [`ExecuteRuntime`]: store access plus poll arming
//! - [`ScheduleRuntime`]: additionally reports terminal states
//!
//! Payloads cross the boundary as [`serde_json::Value`]. Typed access is
//! provided by [`ExecutionContext`](crate::ExecutionContext).

use serde_json::Value;
use std::time::Duration;

/// Source of the inputs for one invocation
pub trait InputsReader: Send + Sync {
    /// Payload supplied with the first call
    ///
    /// # Errors
    /// Any error the reader hits; it reaches the plugin unchanged.
    fn read_inputs(&self) -> anyhow::Result<Value>;

    /// Context payload carried along with the call
    ///
    /// # Errors
    /// Any error the reader hits; it reaches the plugin unchanged.
    fn read_context_inputs(&self) -> anyhow::Result<Value>;
}

/// Per-trace value persistence
///
/// The runtime hands out two independent instances, one for context data
/// and one for outputs.
pub trait ObjectStore: Send + Sync {
    /// Store `value` under `trace_id`, replacing any previous value
    ///
    /// # Errors
    /// Storage failure.
    fn write(&self, trace_id: &str, value: Value) -> anyhow::Result<()>;

    /// Load the value stored under `trace_id`
    ///
    /// # Errors
    /// Storage failure, or nothing stored for the trace.
    fn read(&self, trace_id: &str) -> anyhow::Result<Value>;
}

/// Runtime available to the first invocation of a trace
pub trait ExecuteRuntime: Send + Sync {
    /// Store for context data that survives between invocations
    fn context_store(&self) -> &dyn ObjectStore;

    /// Store for the plugin's externally visible outputs
    fn outputs_store(&self) -> &dyn ObjectStore;

    /// Ask the host to call `schedule` for this trace after `interval`
    ///
    /// # Errors
    /// The poll could not be armed.
    fn set_poll(
        &self,
        trace_id: &str,
        version: &str,
        invoke_count: u32,
        interval: Duration,
    ) -> anyhow::Result<()>;
}

/// Runtime available to poll-triggered invocations
pub trait ScheduleRuntime: ExecuteRuntime {
    /// Mark the trace as failed because of `error`
    ///
    /// # Errors
    /// The terminal state could not be recorded.
    fn set_fail(&self, trace_id: &str, error: &anyhow::Error) -> anyhow::Result<()>;

    /// Mark the trace as finished successfully
    ///
    /// # Errors
    /// The terminal state could not be recorded.
    fn set_success(&self, trace_id: &str) -> anyhow::Result<()>;
}
