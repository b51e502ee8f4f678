//! Inputs reader over in-memory payloads

use plx_core::InputsReader;
use serde_json::{Map, Value};

/// [`InputsReader`] returning fixed JSON payloads
#[derive(Debug, Clone, PartialEq)]
pub struct JsonInputsReader {
    inputs: Value,
    context_inputs: Value,
}

impl JsonInputsReader {
    /// Create reader from both payloads
    #[inline]
    #[must_use]
    pub fn new(inputs: Value, context_inputs: Value) -> Self {
        Self {
            inputs,
            context_inputs,
        }
    }

    /// Create reader with empty-object context inputs
    #[must_use]
    pub fn from_inputs(inputs: Value) -> Self {
        Self::new(inputs, Value::Object(Map::new()))
    }
}

impl Default for JsonInputsReader {
    fn default() -> Self {
        Self::from_inputs(Value::Object(Map::new()))
    }
}

impl InputsReader for JsonInputsReader {
    fn read_inputs(&self) -> anyhow::Result<Value> {
        Ok(self.inputs.clone())
    }

    fn read_context_inputs(&self) -> anyhow::Result<Value> {
        Ok(self.context_inputs.clone())
    }
}
