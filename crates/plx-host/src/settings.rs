//! Host settings using Figment
//!
//! Settings are read from environment variables prefixed with `PLX_`:
//!
//! ```text
//! PLX_APP_CODE=my-plugin
//! PLX_APP_SECRET=...
//! PLX_ENVIRONMENT=prod
//! PLX_USER_TOKEN_KEY_NAME=jwt
//! PLX_API_DEBUG_USERNAME=alice
//! PLX_LOG_FILTER=plx_executor=debug,info
//! ```

use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment name of development mode
pub const DEV_ENVIRONMENT: &str = "dev";

/// Token key name used in development mode
pub const DEV_USER_TOKEN_KEY_NAME: &str = "user_token";

/// Token key name used outside development mode
pub const USER_TOKEN_KEY_NAME: &str = "jwt";

const REDACTED: &str = "******";

/// Settings error types
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings could not be read
    #[error("settings load error: {0}")]
    LoadError(#[from] figment::Error),

    /// Settings were read but are unusable
    #[error("settings validation error: {0}")]
    ValidationError(String),
}

/// Effective host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Code identifying the plugin application
    #[serde(default)]
    pub app_code: String,

    /// Secret paired with `app_code`
    #[serde(default)]
    pub app_secret: String,

    /// Deployment environment; `dev` enables development mode
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Name of the request field carrying the user token
    ///
    /// Empty means the environment default.
    #[serde(default)]
    pub user_token_key_name: String,

    /// Username impersonated by API calls in development mode
    #[serde(default)]
    pub api_debug_username: String,

    /// `tracing` filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_environment() -> String {
    DEV_ENVIRONMENT.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_code: String::new(),
            app_secret: String::new(),
            environment: default_environment(),
            user_token_key_name: DEV_USER_TOKEN_KEY_NAME.to_string(),
            api_debug_username: String::new(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from `PLX_*` environment variables
    ///
    /// # Errors
    /// Unreadable or invalid settings.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_figment(Figment::new().merge(Env::prefixed("PLX_")))
    }

    /// Load settings from any figment
    ///
    /// Environment-dependent defaults are applied after extraction.
    ///
    /// # Errors
    /// Unreadable or invalid settings.
    pub fn from_figment(figment: Figment) -> Result<Self, SettingsError> {
        let mut settings: Self = figment.extract()?;
        settings.validate()?;
        settings.apply_environment();
        Ok(settings)
    }

    /// Validate settings
    ///
    /// # Errors
    /// [`SettingsError::ValidationError`] on an empty environment.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.environment.trim().is_empty() {
            return Err(SettingsError::ValidationError(
                "environment must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if running in development mode
    #[inline]
    #[must_use]
    pub fn is_dev_mode(&self) -> bool {
        self.environment == DEV_ENVIRONMENT
    }

    /// Copy with the secret masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut settings = self.clone();
        if !settings.app_secret.is_empty() {
            settings.app_secret = REDACTED.to_string();
        }
        settings
    }

    fn apply_environment(&mut self) {
        let dev = self.is_dev_mode();
        if self.user_token_key_name.is_empty() {
            let name = if dev {
                DEV_USER_TOKEN_KEY_NAME
            } else {
                USER_TOKEN_KEY_NAME
            };
            self.user_token_key_name = name.to_string();
        }
        if !dev && !self.api_debug_username.is_empty() {
            tracing::warn!("api debug username ignored outside dev mode");
            self.api_debug_username.clear();
        }
    }
}
