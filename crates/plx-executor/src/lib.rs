//! PLX Executor
//!
//! The two actions of the plugin lifecycle:
//!
//! - [`Executor::execute`]: first invocation, errors go back to the caller
//! - [`Executor::schedule`]: poll-triggered invocation, outcomes are
//!   reported to the runtime
//!
//! ```text
//!   execute ──► Success
//!      │
//!      └──► Poll ──► schedule ──► Success | Fail
//!                       │
//!                       └──► Poll (invoke_count + 1) ──► schedule ...
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod executor;
mod schedule;

// Re-exports
pub use error::{ExecutorError, FailureStage};
pub use executor::{Executor, FIRST_INVOKE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
