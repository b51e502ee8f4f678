//! Error types for the plugin registry
//!
//! Install-time and lookup-time failures are deliberately separate types:
//! - [`InstallError`]: packaging defect found at start-up, never recoverable
//! - [`RegistryError`]: unknown version at run time, returned to the caller

use crate::schema::SchemaKind;

/// Installation failed; the registry is misconfigured
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Version does not match the install grammar
    #[error("{0} is not a valid plugin version")]
    InvalidVersion(String),

    /// Version was installed before
    #[error("version {0} already installed")]
    DuplicateVersion(String),

    /// Reflected schema could not be serialized
    #[error("{kind} schema of version {version}: {source}")]
    Schema {
        /// Version being installed
        version: String,
        /// Schema being generated
        kind: SchemaKind,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl InstallError {
    /// Version the failed install was for
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::InvalidVersion(v) | Self::DuplicateVersion(v) => v,
            Self::Schema { version, .. } => version,
        }
    }
}

/// Lookup failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No plugin installed under the version
    #[error("plugin version not found: {0}")]
    NotFound(String),
}
