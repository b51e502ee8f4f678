//! Execute action
//!
//! First invocation of a trace. Errors are returned to the caller; the
//! runtime is only touched to arm a poll.

use crate::error::ExecutorError;
use plx_core::{ExecuteRuntime, ExecutionContext, InputsReader, State};
use plx_registry::Registry;
use std::sync::Arc;

/// Invoke count of the first invocation
pub const FIRST_INVOKE: u32 = 1;

/// Drives plugins installed in a frozen [`Registry`]
///
/// Cheap to clone; every clone shares the registry.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<Registry>,
}

impl Executor {
    /// Create new executor over `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Registry the executor resolves versions from
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the first invocation of a trace
    ///
    /// # Workflow
    /// 1. Resolve `version`
    /// 2. Run the plugin with state `Empty` and invoke count 1
    /// 3. Without a poll request the trace is finished
    /// 4. Otherwise arm the poll through `runtime`
    ///
    /// # Returns
    /// `State::Success` or `State::Poll`.
    ///
    /// # Errors
    /// - [`ExecutorError::NotFound`] if the version is unknown; the runtime is untouched
    /// - [`ExecutorError::Plugin`] if the plugin fails
    /// - [`ExecutorError::Runtime`] if the poll cannot be armed
    pub fn execute(
        &self,
        trace_id: &str,
        version: &str,
        reader: &dyn InputsReader,
        runtime: &dyn ExecuteRuntime,
    ) -> Result<State, ExecutorError> {
        let span = tracing::info_span!("execute", trace_id, version, invoke_count = FIRST_INVOKE);
        let _guard = span.enter();

        let plugin = self.registry.get_plugin(version).map_err(|err| {
            tracing::error!("get plugin failed: {err}");
            ExecutorError::NotFound(err)
        })?;

        let mut ctx = ExecutionContext::new(
            trace_id,
            State::Empty,
            FIRST_INVOKE,
            reader,
            runtime.context_store(),
            runtime.outputs_store(),
        );

        if let Err(err) = plugin.execute(&mut ctx) {
            tracing::error!("plugin execute failed: {err:#}");
            return Err(ExecutorError::Plugin(err));
        }

        if !ctx.waiting_poll() {
            tracing::debug!("execute finished");
            return Ok(State::Success);
        }

        let interval = ctx.poll_interval();
        runtime
            .set_poll(trace_id, version, FIRST_INVOKE, interval)
            .map_err(|err| {
                tracing::error!("execute succeeded but set poll failed: {err:#}");
                ExecutorError::Runtime(err)
            })?;

        tracing::debug!(?interval, "poll armed");
        Ok(State::Poll)
    }
}
