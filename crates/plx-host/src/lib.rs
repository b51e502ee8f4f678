//! PLX Host
//!
//! Reference host wiring the PLX crates together:
//!
//! - [`settings`]: `PLX_*` environment settings
//! - [`logging`]: tracing subscriber setup
//! - [`demo`]: demo plugins and their registry
//! - [`simulate`]: local execute/schedule loop over the in-memory runtime

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod demo;
pub mod logging;
pub mod settings;
pub mod simulate;

// Re-exports
pub use settings::{Settings, SettingsError};
pub use simulate::{simulate, SimulateOptions, SimulationReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
