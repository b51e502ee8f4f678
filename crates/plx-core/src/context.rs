//! Per-invocation execution context
//!
//! An [`ExecutionContext`] is built fresh for every execute/schedule call
//! and dropped when the call returns. It carries no state across process
//! invocations: anything the plugin needs next time must be written to the
//! context store.

use crate::error::{Channel, ContextError};
use crate::runtime::{InputsReader, ObjectStore};
use crate::state::State;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Everything a plugin sees during one invocation
pub struct ExecutionContext<'a> {
    trace_id: &'a str,
    state: State,
    invoke_count: u32,
    poll_interval: Duration,
    waiting_poll: bool,
    reader: &'a dyn InputsReader,
    store: &'a dyn ObjectStore,
    outputs_store: &'a dyn ObjectStore,
}

impl<'a> ExecutionContext<'a> {
    /// Create a context for one invocation
    ///
    /// # Arguments
    /// * `trace_id` - Id of the run, stable across invocations
    /// * `state` - `Empty` on the first call, `Poll` afterwards
    /// * `invoke_count` - 1 on the first call, then the count armed by the triggering poll
    /// * `reader` - Source of inputs
    /// * `store` - Context data store
    /// * `outputs_store` - Outputs store
    #[must_use]
    pub fn new(
        trace_id: &'a str,
        state: State,
        invoke_count: u32,
        reader: &'a dyn InputsReader,
        store: &'a dyn ObjectStore,
        outputs_store: &'a dyn ObjectStore,
    ) -> Self {
        Self {
            trace_id,
            state,
            invoke_count,
            poll_interval: Duration::ZERO,
            waiting_poll: false,
            reader,
            store,
            outputs_store,
        }
    }

    /// Trace id of this run
    #[inline]
    #[must_use]
    pub fn trace_id(&self) -> &str {
        self.trace_id
    }

    /// State the invocation was entered with
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Invoke count of this call
    ///
    /// 1 on the first call. A poll-triggered call sees the count the
    /// previous call armed: the first call arms 1, every later call arms
    /// its own count plus one. Tell the first call apart with
    /// [`state`](Self::state).
    #[inline]
    #[must_use]
    pub fn invoke_count(&self) -> u32 {
        self.invoke_count
    }

    /// Interval of the requested poll
    ///
    /// Zero unless [`request_poll`](Self::request_poll) was called.
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether the plugin asked to be invoked again
    #[inline]
    #[must_use]
    pub fn waiting_poll(&self) -> bool {
        self.waiting_poll
    }

    /// Ask to be invoked again after `interval`
    ///
    /// A later call in the same invocation replaces the interval.
    pub fn request_poll(&mut self, interval: Duration) {
        self.poll_interval = interval;
        self.waiting_poll = true;
    }

    /// Decode the first-call inputs
    ///
    /// # Errors
    /// Reader failure, or a payload that does not decode into `T`.
    pub fn read_inputs<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        let value = self.reader.read_inputs().map_err(ContextError::Bridge)?;
        decode(Channel::Inputs, value)
    }

    /// Decode the carried context inputs
    ///
    /// # Errors
    /// Reader failure, or a payload that does not decode into `T`.
    pub fn read_context_inputs<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        let value = self
            .reader
            .read_context_inputs()
            .map_err(ContextError::Bridge)?;
        decode(Channel::ContextInputs, value)
    }

    /// Load the context data stored for this trace
    ///
    /// # Errors
    /// Store failure, or stored data that does not decode into `T`.
    pub fn read<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        let value = self.store.read(self.trace_id).map_err(ContextError::Bridge)?;
        decode(Channel::ContextData, value)
    }

    /// Replace the context data stored for this trace
    ///
    /// # Errors
    /// `value` cannot be serialized, or the store fails.
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ContextError> {
        let value = encode(Channel::ContextData, value)?;
        self.store
            .write(self.trace_id, value)
            .map_err(ContextError::Bridge)
    }

    /// Load the outputs stored for this trace
    ///
    /// # Errors
    /// Store failure, or stored outputs that do not decode into `T`.
    pub fn read_outputs<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        let value = self
            .outputs_store
            .read(self.trace_id)
            .map_err(ContextError::Bridge)?;
        decode(Channel::Outputs, value)
    }

    /// Replace the outputs stored for this trace
    ///
    /// # Errors
    /// `value` cannot be serialized, or the store fails.
    pub fn write_outputs<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ContextError> {
        let value = encode(Channel::Outputs, value)?;
        self.outputs_store
            .write(self.trace_id, value)
            .map_err(ContextError::Bridge)
    }
}

impl fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("trace_id", &self.trace_id)
            .field("state", &self.state)
            .field("invoke_count", &self.invoke_count)
            .field("poll_interval", &self.poll_interval)
            .field("waiting_poll", &self.waiting_poll)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(channel: Channel, value: Value) -> Result<T, ContextError> {
    serde_json::from_value(value).map_err(|source| ContextError::Decode { channel, source })
}

fn encode<T: Serialize + ?Sized>(channel: Channel, value: &T) -> Result<Value, ContextError> {
    serde_json::to_value(value).map_err(|source| ContextError::Encode { channel, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use serde::Deserialize;
    use serde_json::json;

    mock! {
        Reader {}
        impl InputsReader for Reader {
            fn read_inputs(&self) -> anyhow::Result<Value>;
            fn read_context_inputs(&self) -> anyhow::Result<Value>;
        }
    }

    mock! {
        Store {}
        impl ObjectStore for Store {
            fn write(&self, trace_id: &str, value: Value) -> anyhow::Result<()>;
            fn read(&self, trace_id: &str) -> anyhow::Result<Value>;
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Inputs {
        template_id: u64,
        task_name: String,
    }

    #[test]
    fn context_accessors() {
        let reader = MockReader::new();
        let store = MockStore::new();
        let outputs = MockStore::new();

        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        assert_eq!(ctx.trace_id(), "trace");
        assert_eq!(ctx.state(), State::Empty);
        assert_eq!(ctx.invoke_count(), 1);
        assert_eq!(ctx.poll_interval(), Duration::ZERO);
        assert!(!ctx.waiting_poll());
    }

    #[test]
    fn request_poll_sets_flag_and_interval() {
        let reader = MockReader::new();
        let store = MockStore::new();
        let outputs = MockStore::new();
        let mut ctx = ExecutionContext::new("trace", State::Poll, 3, &reader, &store, &outputs);

        ctx.request_poll(Duration::from_secs(5));
        assert!(ctx.waiting_poll());
        assert_eq!(ctx.poll_interval(), Duration::from_secs(5));

        ctx.request_poll(Duration::from_secs(2));
        assert!(ctx.waiting_poll());
        assert_eq!(ctx.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn read_inputs_goes_through_reader() {
        let mut reader = MockReader::new();
        reader
            .expect_read_inputs()
            .times(1)
            .returning(|| Ok(json!({"template_id": 7, "task_name": "deploy"})));
        reader
            .expect_read_context_inputs()
            .times(1)
            .returning(|| Ok(json!({"executor": "alice"})));
        let store = MockStore::new();
        let outputs = MockStore::new();
        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        let inputs: Inputs = ctx.read_inputs().unwrap();
        assert_eq!(
            inputs,
            Inputs {
                template_id: 7,
                task_name: "deploy".to_string()
            }
        );

        let context_inputs: Value = ctx.read_context_inputs().unwrap();
        assert_eq!(context_inputs, json!({"executor": "alice"}));
    }

    #[test]
    fn reader_error_propagates_unchanged() {
        let mut reader = MockReader::new();
        reader
            .expect_read_inputs()
            .returning(|| Err(anyhow::anyhow!("inputs missing")));
        let store = MockStore::new();
        let outputs = MockStore::new();
        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        let err = ctx.read_inputs::<Value>().unwrap_err();
        assert!(err.is_bridge());
        assert_eq!(err.to_string(), "inputs missing");
    }

    #[test]
    fn decode_mismatch_is_reported() {
        let mut reader = MockReader::new();
        reader
            .expect_read_inputs()
            .returning(|| Ok(json!({"template_id": "not a number"})));
        let store = MockStore::new();
        let outputs = MockStore::new();
        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        let err = ctx.read_inputs::<Inputs>().unwrap_err();
        assert!(matches!(
            err,
            ContextError::Decode {
                channel: Channel::Inputs,
                ..
            }
        ));
    }

    #[test]
    fn write_and_read_use_context_store_with_trace_id() {
        let reader = MockReader::new();
        let mut store = MockStore::new();
        store
            .expect_write()
            .withf(|trace_id, value| trace_id == "trace" && *value == json!({"step": 2}))
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_read()
            .withf(|trace_id| trace_id == "trace")
            .times(1)
            .returning(|_| Ok(json!({"step": 2})));
        let outputs = MockStore::new();
        let ctx = ExecutionContext::new("trace", State::Poll, 2, &reader, &store, &outputs);

        ctx.write(&json!({"step": 2})).unwrap();
        let data: Value = ctx.read().unwrap();
        assert_eq!(data, json!({"step": 2}));
    }

    #[test]
    fn outputs_use_outputs_store() {
        let reader = MockReader::new();
        let store = MockStore::new();
        let mut outputs = MockStore::new();
        outputs
            .expect_write()
            .withf(|trace_id, value| trace_id == "trace" && *value == json!({"task_id": 42}))
            .times(1)
            .returning(|_, _| Ok(()));
        outputs
            .expect_read()
            .withf(|trace_id| trace_id == "trace")
            .times(1)
            .returning(|_| Ok(json!({"task_id": 42})));
        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        ctx.write_outputs(&json!({"task_id": 42})).unwrap();
        let data: Value = ctx.read_outputs().unwrap();
        assert_eq!(data["task_id"], 42);
    }

    #[test]
    fn store_error_propagates_unchanged() {
        let reader = MockReader::new();
        let mut store = MockStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));
        let outputs = MockStore::new();
        let ctx = ExecutionContext::new("trace", State::Empty, 1, &reader, &store, &outputs);

        let err = ctx.write(&1u8).unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
