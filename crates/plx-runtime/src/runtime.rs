//! Recording in-memory runtime
//!
//! [`MemoryRuntime`] plays the host side of the lifecycle without a clock:
//! - every `set_*` call is appended to a call log ([`RuntimeCall`])
//! - the latest disposition of each trace is kept ([`TraceStatus`])
//! - armed polls wait in a FIFO queue until [`MemoryRuntime::next_poll`]
//! - any `set_*` operation can be made to fail ([`MemoryRuntime::fail_on`])

use crate::error::RuntimeError;
use crate::store::MemoryStore;
use parking_lot::Mutex;
use plx_core::{ExecuteRuntime, ObjectStore, ScheduleRuntime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::Duration;

/// Runtime operation that can be observed or made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeOp {
    /// `set_poll`
    SetPoll,
    /// `set_fail`
    SetFail,
    /// `set_success`
    SetSuccess,
}

impl fmt::Display for RuntimeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeOp::SetPoll => "set_poll",
            RuntimeOp::SetFail => "set_fail",
            RuntimeOp::SetSuccess => "set_success",
        };
        f.write_str(name)
    }
}

/// One recorded runtime call, failed attempts included
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    /// Poll armed
    SetPoll {
        /// Trace
        trace_id: String,
        /// Plugin version to re-invoke
        version: String,
        /// Count carried to the next invocation
        invoke_count: u32,
        /// Requested delay
        interval: Duration,
    },
    /// Failure reported
    SetFail {
        /// Trace
        trace_id: String,
        /// Rendered error chain
        error: String,
    },
    /// Success reported
    SetSuccess {
        /// Trace
        trace_id: String,
    },
}

impl RuntimeCall {
    /// Operation of the call
    #[must_use]
    pub fn op(&self) -> RuntimeOp {
        match self {
            RuntimeCall::SetPoll { .. } => RuntimeOp::SetPoll,
            RuntimeCall::SetFail { .. } => RuntimeOp::SetFail,
            RuntimeCall::SetSuccess { .. } => RuntimeOp::SetSuccess,
        }
    }

    /// Trace of the call
    #[must_use]
    pub fn trace_id(&self) -> &str {
        match self {
            RuntimeCall::SetPoll { trace_id, .. }
            | RuntimeCall::SetFail { trace_id, .. }
            | RuntimeCall::SetSuccess { trace_id } => trace_id,
        }
    }
}

/// Latest recorded disposition of a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TraceStatus {
    /// Waiting for the next schedule call
    Polling {
        /// Plugin version
        version: String,
        /// Count carried to the next invocation
        invoke_count: u32,
        /// Requested delay
        #[serde(with = "duration_ms")]
        interval: Duration,
    },
    /// Finished successfully
    Succeeded,
    /// Finished with an error
    Failed {
        /// Rendered error chain
        error: String,
    },
}

impl TraceStatus {
    /// Check if the trace reached a terminal disposition
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TraceStatus::Polling { .. })
    }
}

/// Poll waiting to be delivered as a schedule call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPoll {
    /// Trace
    pub trace_id: String,
    /// Plugin version
    pub version: String,
    /// Count to pass to `schedule`
    pub invoke_count: u32,
    /// Requested delay; not waited for
    pub interval: Duration,
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<RuntimeCall>,
    statuses: HashMap<String, TraceStatus>,
    polls: VecDeque<PendingPoll>,
    faults: HashMap<RuntimeOp, String>,
}

impl Journal {
    fn attempt(&mut self, call: RuntimeCall) -> Result<(), RuntimeError> {
        let op = call.op();
        tracing::debug!(%op, trace_id = call.trace_id(), "runtime call");
        self.calls.push(call);

        match self.faults.get(&op) {
            Some(message) => Err(RuntimeError::Injected {
                op,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// [`ScheduleRuntime`] kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    context_store: MemoryStore,
    outputs_store: MemoryStore,
    journal: Mutex<Journal>,
}

impl MemoryRuntime {
    /// Create new runtime with empty stores
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `op` fail with `message`
    ///
    /// Failed calls are still recorded but change no status.
    pub fn fail_on(&self, op: RuntimeOp, message: impl Into<String>) {
        self.journal.lock().faults.insert(op, message.into());
    }

    /// Stop failing `op`
    pub fn recover(&self, op: RuntimeOp) {
        self.journal.lock().faults.remove(&op);
    }

    /// All recorded calls in order
    #[must_use]
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.journal.lock().calls.clone()
    }

    /// Number of recorded calls of `op`
    #[must_use]
    pub fn count(&self, op: RuntimeOp) -> usize {
        self.journal
            .lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    /// Latest disposition of a trace
    #[must_use]
    pub fn status(&self, trace_id: &str) -> Option<TraceStatus> {
        self.journal.lock().statuses.get(trace_id).cloned()
    }

    /// Take the oldest armed poll
    pub fn next_poll(&self) -> Option<PendingPoll> {
        self.journal.lock().polls.pop_front()
    }

    /// Number of armed polls not yet taken
    #[must_use]
    pub fn pending_polls(&self) -> usize {
        self.journal.lock().polls.len()
    }

    /// Context data store
    #[inline]
    #[must_use]
    pub fn context_data(&self) -> &MemoryStore {
        &self.context_store
    }

    /// Outputs store
    #[inline]
    #[must_use]
    pub fn outputs(&self) -> &MemoryStore {
        &self.outputs_store
    }
}

impl ExecuteRuntime for MemoryRuntime {
    fn context_store(&self) -> &dyn ObjectStore {
        &self.context_store
    }

    fn outputs_store(&self) -> &dyn ObjectStore {
        &self.outputs_store
    }

    fn set_poll(
        &self,
        trace_id: &str,
        version: &str,
        invoke_count: u32,
        interval: Duration,
    ) -> anyhow::Result<()> {
        let mut journal = self.journal.lock();
        journal.attempt(RuntimeCall::SetPoll {
            trace_id: trace_id.to_string(),
            version: version.to_string(),
            invoke_count,
            interval,
        })?;

        journal.statuses.insert(
            trace_id.to_string(),
            TraceStatus::Polling {
                version: version.to_string(),
                invoke_count,
                interval,
            },
        );
        journal.polls.push_back(PendingPoll {
            trace_id: trace_id.to_string(),
            version: version.to_string(),
            invoke_count,
            interval,
        });
        Ok(())
    }
}

impl ScheduleRuntime for MemoryRuntime {
    fn set_fail(&self, trace_id: &str, error: &anyhow::Error) -> anyhow::Result<()> {
        let error = format!("{error:#}");
        let mut journal = self.journal.lock();
        journal.attempt(RuntimeCall::SetFail {
            trace_id: trace_id.to_string(),
            error: error.clone(),
        })?;

        journal
            .statuses
            .insert(trace_id.to_string(), TraceStatus::Failed { error });
        Ok(())
    }

    fn set_success(&self, trace_id: &str) -> anyhow::Result<()> {
        let mut journal = self.journal.lock();
        journal.attempt(RuntimeCall::SetSuccess {
            trace_id: trace_id.to_string(),
        })?;

        journal
            .statuses
            .insert(trace_id.to_string(), TraceStatus::Succeeded);
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
