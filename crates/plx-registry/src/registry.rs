//! Version → plugin catalog
//!
//! Provides [`Registry`], populated once at start-up and read-only afterwards.
//!
//! # Lifecycle
//! 1. The host creates a `Registry` and installs every version.
//! 2. The registry is wrapped in an `Arc` and handed to the executor.
//!
//! Installing needs `&mut self`, so a shared registry cannot change anymore
//! and concurrent lookups need no locking.

use crate::error::{InstallError, RegistryError};
use crate::schema::{build_document, SchemaDocument, SchemaKind, Shapes};
use crate::version::is_valid_version;
use plx_core::Plugin;
use std::collections::HashMap;
use std::fmt;

/// One installed version
pub struct PluginRecord {
    plugin: Box<dyn Plugin>,
    inputs_schema: SchemaDocument,
    context_inputs_schema: SchemaDocument,
    outputs_schema: SchemaDocument,
}

impl PluginRecord {
    /// Version the record is installed under
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        self.plugin.version()
    }

    /// Plugin description
    #[inline]
    #[must_use]
    pub fn desc(&self) -> &str {
        self.plugin.desc()
    }

    /// Plugin instance
    #[inline]
    #[must_use]
    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    /// Inputs schema with the form overlay applied
    #[inline]
    #[must_use]
    pub fn inputs_schema(&self) -> &SchemaDocument {
        &self.inputs_schema
    }

    /// Context inputs schema
    #[inline]
    #[must_use]
    pub fn context_inputs_schema(&self) -> &SchemaDocument {
        &self.context_inputs_schema
    }

    /// Outputs schema
    #[inline]
    #[must_use]
    pub fn outputs_schema(&self) -> &SchemaDocument {
        &self.outputs_schema
    }

    /// Schema by kind
    #[must_use]
    pub fn schema(&self, kind: SchemaKind) -> &SchemaDocument {
        match kind {
            SchemaKind::Inputs => &self.inputs_schema,
            SchemaKind::ContextInputs => &self.context_inputs_schema,
            SchemaKind::Outputs => &self.outputs_schema,
        }
    }
}

impl fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRecord")
            .field("version", &self.version())
            .field("desc", &self.desc())
            .finish_non_exhaustive()
    }
}

/// Catalog of installed plugin versions
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<String, PluginRecord>,
}

impl Registry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Install a plugin under its own version
    ///
    /// # Errors
    /// - [`InstallError::InvalidVersion`] if the version breaks the grammar
    /// - [`InstallError::DuplicateVersion`] if the version is taken
    /// - [`InstallError::Schema`] if a schema cannot be serialized
    ///
    /// The registry is unchanged on error.
    pub fn install(
        &mut self,
        plugin: Box<dyn Plugin>,
        shapes: Shapes,
    ) -> Result<(), InstallError> {
        let version = plugin.version().to_string();
        if !is_valid_version(&version) {
            return Err(InstallError::InvalidVersion(version));
        }
        if self.records.contains_key(&version) {
            return Err(InstallError::DuplicateVersion(version));
        }

        let document = |kind: SchemaKind| {
            let (shape, form) = match kind {
                SchemaKind::Inputs => (shapes.inputs.as_ref(), shapes.inputs_form.as_ref()),
                SchemaKind::ContextInputs => (shapes.context_inputs.as_ref(), None),
                SchemaKind::Outputs => (shapes.outputs.as_ref(), None),
            };
            build_document(shape, form).map_err(|source| InstallError::Schema {
                version: version.clone(),
                kind,
                source,
            })
        };

        let record = PluginRecord {
            inputs_schema: document(SchemaKind::Inputs)?,
            context_inputs_schema: document(SchemaKind::ContextInputs)?,
            outputs_schema: document(SchemaKind::Outputs)?,
            plugin,
        };

        tracing::info!(version = %version, desc = record.desc(), "plugin installed");
        self.records.insert(version, record);
        Ok(())
    }

    /// Install a plugin, aborting on misconfiguration
    ///
    /// Meant for start-up code where a bad or duplicate version is a
    /// packaging defect.
    ///
    /// # Panics
    /// On any [`InstallError`].
    #[track_caller]
    pub fn must_install(&mut self, plugin: Box<dyn Plugin>, shapes: Shapes) {
        if let Err(err) = self.install(plugin, shapes) {
            tracing::error!(version = err.version(), "plugin install failed: {err}");
            panic!("plugin install failed: {err}");
        }
    }

    /// Get the record of a version
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the version is not installed.
    pub fn lookup(&self, version: &str) -> Result<&PluginRecord, RegistryError> {
        self.records
            .get(version)
            .ok_or_else(|| RegistryError::NotFound(version.to_string()))
    }

    /// Get the plugin of a version
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if the version is not installed.
    pub fn get_plugin(&self, version: &str) -> Result<&dyn Plugin, RegistryError> {
        self.lookup(version).map(PluginRecord::plugin)
    }

    /// Installed versions, newest-looking first
    ///
    /// Ordering is plain reverse string comparison, not semantic versioning:
    /// `1.9.0` sorts before `1.10.0`.
    #[must_use]
    pub fn list_versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.records.keys().map(String::as_str).collect();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions
    }

    /// Check if a version is installed
    #[inline]
    #[must_use]
    pub fn contains(&self, version: &str) -> bool {
        self.records.contains_key(version)
    }

    /// Get number of installed versions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every version
    ///
    /// Test support only; production code never uninstalls.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
