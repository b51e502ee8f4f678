//! Plugin contract

use crate::context::ExecutionContext;

/// User-supplied business logic for one version
///
/// # Contract
/// - `version()` must match `MAJOR.MINOR.PATCH[suffix]` (digits, then an
///   optional lowercase/digit suffix on the patch), otherwise install fails
/// - `execute()` either finishes, or calls
///   [`ExecutionContext::request_poll`] to be invoked again later
/// - State that must survive until the next invocation goes through
///   [`ExecutionContext::write`]; the process may not live that long
///
/// # Example
/// ```rust,ignore
/// struct Echo;
///
/// impl Plugin for Echo {
///     fn version(&self) -> &str { "1.0.0" }
///     fn desc(&self) -> &str { "copies inputs to outputs" }
///
///     fn execute(&self, ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()> {
///         let inputs: serde_json::Value = ctx.read_inputs()?;
///         ctx.write_outputs(&inputs)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Version this plugin is installed under
    fn version(&self) -> &str;

    /// Human-readable description
    fn desc(&self) -> &str;

    /// Run one invocation
    ///
    /// # Errors
    /// Any error fails the trace.
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()>;
}
