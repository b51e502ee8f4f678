//! Error types for the in-memory runtime

use crate::runtime::RuntimeOp;

/// In-memory runtime failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Nothing stored for the trace
    #[error("no value stored for trace {0}")]
    Missing(String),

    /// Failure injected with [`MemoryRuntime::fail_on`](crate::MemoryRuntime::fail_on)
    #[error("{op} failed: {message}")]
    Injected {
        /// Operation that failed
        op: RuntimeOp,
        /// Injected message
        message: String,
    },
}
