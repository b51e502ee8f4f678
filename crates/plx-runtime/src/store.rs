//! In-memory object store

use crate::error::RuntimeError;
use parking_lot::Mutex;
use plx_core::ObjectStore;
use serde_json::Value;
use std::collections::HashMap;

/// [`ObjectStore`] keeping one value per trace in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create new empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored for a trace, if any
    #[must_use]
    pub fn get(&self, trace_id: &str) -> Option<Value> {
        self.values.lock().get(trace_id).cloned()
    }

    /// Drop the value of a trace
    pub fn remove(&self, trace_id: &str) -> Option<Value> {
        self.values.lock().remove(trace_id)
    }

    /// Get number of traces with a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Check if store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn write(&self, trace_id: &str, value: Value) -> anyhow::Result<()> {
        self.values.lock().insert(trace_id.to_string(), value);
        Ok(())
    }

    fn read(&self, trace_id: &str) -> anyhow::Result<Value> {
        self.get(trace_id)
            .ok_or_else(|| RuntimeError::Missing(trace_id.to_string()).into())
    }
}
