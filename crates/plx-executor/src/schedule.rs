//! Schedule action
//!
//! Poll-triggered invocation. Unlike execute, every outcome is reported to
//! the runtime, and each call ends in exactly one disposition: success,
//! fail or a re-armed poll.

use crate::error::{ExecutorError, FailureStage};
use crate::executor::Executor;
use plx_core::{ExecutionContext, InputsReader, ScheduleRuntime, State};

impl Executor {
    /// Run a poll-triggered invocation of a trace
    ///
    /// `invoke_count` is the count carried by the poll that triggered this
    /// call. A new poll is armed with `invoke_count + 1`.
    ///
    /// # Returns
    /// - `State::Success` after `set_success`
    /// - `State::Poll` after the poll was re-armed
    /// - `State::Fail` after a failure was reported through `set_fail`
    ///
    /// # Errors
    /// - [`ExecutorError::Unreported`] if a failure occurred and `set_fail` failed too
    /// - [`ExecutorError::Runtime`] if `set_success` fails
    pub fn schedule(
        &self,
        trace_id: &str,
        version: &str,
        invoke_count: u32,
        reader: &dyn InputsReader,
        runtime: &dyn ScheduleRuntime,
    ) -> Result<State, ExecutorError> {
        let span = tracing::info_span!("schedule", trace_id, version, invoke_count);
        let _guard = span.enter();

        let plugin = match self.registry().get_plugin(version) {
            Ok(plugin) => plugin,
            Err(err) => {
                tracing::error!("get plugin failed: {err}");
                return report_failure(runtime, trace_id, FailureStage::Lookup, err.into());
            }
        };

        let mut ctx = ExecutionContext::new(
            trace_id,
            State::Poll,
            invoke_count,
            reader,
            runtime.context_store(),
            runtime.outputs_store(),
        );

        if let Err(err) = plugin.execute(&mut ctx) {
            tracing::error!("plugin execute failed: {err:#}");
            return report_failure(runtime, trace_id, FailureStage::Execute, err);
        }

        if !ctx.waiting_poll() {
            runtime.set_success(trace_id).map_err(|err| {
                tracing::error!("set success failed: {err:#}");
                ExecutorError::Runtime(err)
            })?;
            tracing::debug!("schedule finished");
            return Ok(State::Success);
        }

        let interval = ctx.poll_interval();
        let next_count = invoke_count.saturating_add(1);
        if let Err(err) = runtime.set_poll(trace_id, version, next_count, interval) {
            tracing::error!("set poll failed: {err:#}");
            return report_failure(runtime, trace_id, FailureStage::SetPoll, err);
        }

        tracing::debug!(?interval, next_count, "poll re-armed");
        Ok(State::Poll)
    }
}

/// Report `cause` through `set_fail`
///
/// `Ok(State::Fail)` once reported, the composite error otherwise.
fn report_failure(
    runtime: &dyn ScheduleRuntime,
    trace_id: &str,
    stage: FailureStage,
    cause: anyhow::Error,
) -> Result<State, ExecutorError> {
    match runtime.set_fail(trace_id, &cause) {
        Ok(()) => {
            tracing::debug!(%stage, "failure reported");
            Ok(State::Fail)
        }
        Err(report) => {
            tracing::error!(%stage, "set fail failed: {report:#}");
            Err(ExecutorError::Unreported {
                stage,
                cause,
                report,
            })
        }
    }
}
