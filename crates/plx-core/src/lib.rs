//! PLX Core
//!
//! Building blocks shared by every PLX crate:
//!
//! - [`State`]: wire-stable phase of a trace
//! - [`Plugin`]: contract implemented by versioned user logic
//! - [`ExecutionContext`]: per-invocation bridge between a plugin and the host
//! - [`InputsReader`], [`ObjectStore`], [`ExecuteRuntime`], [`ScheduleRuntime`]:
//!   capabilities the host runtime supplies
//!
//! # Example
//!
//! ```rust,ignore
//! use plx_core::{ExecutionContext, Plugin, State};
//! use std::time::Duration;
//!
//! struct Countdown;
//!
//! impl Plugin for Countdown {
//!     fn version(&self) -> &str { "1.1.0" }
//!     fn desc(&self) -> &str { "polls until the counter hits zero" }
//!
//!     fn execute(&self, ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()> {
//!         let left: u32 = if ctx.state() == State::Empty { 3 } else { ctx.read()? };
//!         if left > 0 {
//!             ctx.write(&(left - 1))?;
//!             ctx.request_poll(Duration::from_secs(5));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod context;
mod error;
mod plugin;
mod runtime;
mod state;

// Re-exports
pub use context::ExecutionContext;
pub use error::{Channel, ContextError};
pub use plugin::Plugin;
pub use runtime::{ExecuteRuntime, InputsReader, ObjectStore, ScheduleRuntime};
pub use state::{State, UnknownState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
