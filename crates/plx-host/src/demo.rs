//! Demo plugins installed by the reference host
//!
//! - `1.0.0` echo: copies its inputs to its outputs and finishes at once
//! - `1.1.0` countdown: polls until a counter kept in the context store
//!   reaches zero

use plx_core::{ExecutionContext, Plugin, State};
use plx_registry::{InputsForm, Registry, Shapes};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Version of the echo plugin
pub const ECHO_VERSION: &str = "1.0.0";

/// Version of the countdown plugin
pub const COUNTDOWN_VERSION: &str = "1.1.0";

/// Context inputs shared by the demo plugins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Operator {
    /// User the trace runs on behalf of
    #[serde(default)]
    pub executor: Option<String>,
}

/// Echo inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EchoInputs {
    /// Text to echo
    pub message: String,
}

/// Echo outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EchoOutputs {
    /// Echoed text
    pub message: String,
    /// Executor taken from the context inputs
    pub executor: Option<String>,
}

/// Plugin echoing its inputs
#[derive(Debug, Default)]
pub struct Echo;

impl Plugin for Echo {
    fn version(&self) -> &str {
        ECHO_VERSION
    }

    fn desc(&self) -> &str {
        "echo the message back as outputs"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()> {
        let inputs: EchoInputs = ctx.read_inputs()?;
        let operator: Operator = ctx.read_context_inputs()?;
        ctx.write_outputs(&EchoOutputs {
            message: inputs.message,
            executor: operator.executor,
        })?;
        Ok(())
    }
}

/// Countdown inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CountdownInputs {
    /// Polls to go through before finishing
    #[serde(default = "default_count")]
    pub count: u32,
    /// Delay requested between polls, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_count() -> u32 {
    3
}

fn default_interval_ms() -> u64 {
    1000
}

/// Countdown progress kept in the context store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownProgress {
    /// Polls still to go
    pub left: u32,
    /// Delay between polls, in milliseconds
    pub interval_ms: u64,
}

/// Countdown outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CountdownOutputs {
    /// Invoke count of the finishing invocation
    pub finished_at: u32,
}

/// Plugin polling until its counter runs out
#[derive(Debug, Default)]
pub struct Countdown;

impl Plugin for Countdown {
    fn version(&self) -> &str {
        COUNTDOWN_VERSION
    }

    fn desc(&self) -> &str {
        "poll until the counter reaches zero"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()> {
        let progress = if ctx.state() == State::Empty {
            let inputs: CountdownInputs = ctx.read_inputs()?;
            CountdownProgress {
                left: inputs.count,
                interval_ms: inputs.interval_ms,
            }
        } else {
            ctx.read()?
        };

        if progress.left == 0 {
            ctx.write_outputs(&CountdownOutputs {
                finished_at: ctx.invoke_count(),
            })?;
            return Ok(());
        }

        ctx.write(&CountdownProgress {
            left: progress.left - 1,
            ..progress
        })?;
        ctx.request_poll(Duration::from_millis(progress.interval_ms));
        Ok(())
    }
}

/// UI attributes for the countdown inputs
#[must_use]
pub fn countdown_form() -> InputsForm {
    let mut form = InputsForm::new();
    form.insert("count".to_string(), attrs(json!({"title": "Rounds", "minimum": 0})));
    form.insert(
        "interval_ms".to_string(),
        attrs(json!({"title": "Interval (ms)", "widget": "number"})),
    );
    form
}

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Registry holding every demo plugin
///
/// # Panics
/// If a demo plugin is misconfigured.
#[must_use]
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.must_install(
        Box::new(Echo),
        Shapes::new()
            .inputs::<EchoInputs>()
            .context_inputs::<Operator>()
            .outputs::<EchoOutputs>(),
    );
    registry.must_install(
        Box::new(Countdown),
        Shapes::new()
            .inputs::<CountdownInputs>()
            .outputs::<CountdownOutputs>()
            .inputs_form(countdown_form()),
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_registry_versions() {
        let registry = registry();
        assert_eq!(registry.list_versions(), vec![COUNTDOWN_VERSION, ECHO_VERSION]);
    }

    #[test]
    fn test_countdown_form_applied() {
        let registry = registry();
        let record = registry.lookup(COUNTDOWN_VERSION).unwrap();
        let props = &record.inputs_schema().json()["properties"];

        assert_eq!(props["count"]["title"], "Rounds");
        assert_eq!(props["interval_ms"]["widget"], "number");
        assert!(record.context_inputs_schema().property_names().is_empty());
    }

    #[test]
    fn test_echo_declares_context_inputs() {
        let registry = registry();
        let record = registry.lookup(ECHO_VERSION).unwrap();
        assert_eq!(record.context_inputs_schema().property_names(), vec!["executor"]);
    }
}
