//! PLX Runtime
//!
//! In-memory implementations of the host-side interfaces, used by the
//! reference host and by tests:
//!
//! - [`MemoryStore`]: per-trace [`ObjectStore`](plx_core::ObjectStore)
//! - [`JsonInputsReader`]: fixed JSON payloads
//! - [`MemoryRuntime`]: recording [`ScheduleRuntime`](plx_core::ScheduleRuntime)
//!   with a poll queue and fault injection

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod reader;
mod runtime;
mod store;

// Re-exports
pub use error::RuntimeError;
pub use reader::JsonInputsReader;
pub use runtime::{MemoryRuntime, PendingPoll, RuntimeCall, RuntimeOp, TraceStatus};
pub use store::MemoryStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
