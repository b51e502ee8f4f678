//! PLX Registry
//!
//! Catalog of plugin versions installed into one process.
//!
//! - [`Registry`]: version → [`PluginRecord`] map, filled at start-up
//! - [`Shapes`]: optional input/output shapes reflected into JSON Schema
//! - [`is_valid_version`]: install-time version grammar
//!
//! # Example
//!
//! ```rust,ignore
//! use plx_registry::{Registry, Shapes};
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! registry.must_install(Box::new(CreateTask), Shapes::new().inputs::<CreateTaskInputs>());
//! let registry = Arc::new(registry);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod registry;
mod schema;
mod version;

// Re-exports
pub use error::{InstallError, RegistryError};
pub use registry::{PluginRecord, Registry};
pub use schema::{
    build_document, merge_form, reflect, InputsForm, SchemaDocument, SchemaKind, Shapes,
    EMPTY_SCHEMA,
};
pub use version::is_valid_version;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
