//! Registry configuration.
//!
//! Settings can be built in code, read from prefixed environment variables,
//! or (with the `config` feature) parsed from a JSON document.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Errors raised while loading a [`RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable present but not a boolean
    #[error("Invalid boolean for {key}: {value:?}")]
    InvalidBool { key: String, value: String },
    /// Malformed JSON configuration
    #[cfg(feature = "config")]
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Behavior switches for a [`ServiceRegistry`](crate::ServiceRegistry).
///
/// # Examples
///
/// ```
/// use ferrous_registry::{RegistryConfig, ServiceRegistry};
///
/// let config = RegistryConfig::new()
///     .with_label("test-harness")
///     .dispose_on_overwrite(true);
///
/// let registry = ServiceRegistry::with_config(config);
/// assert_eq!(registry.config().label(), "test-harness");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryConfig {
    /// Name attached to the registry's log events
    pub label: Option<String>,
    /// Dispose the cached instance of a descriptor replaced by re-registration
    pub dispose_on_overwrite: bool,
    /// Emit a warning when a registration replaces an existing one
    pub warn_on_overwrite: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            label: None,
            dispose_on_overwrite: false,
            warn_on_overwrite: true,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn dispose_on_overwrite(mut self, enabled: bool) -> Self {
        self.dispose_on_overwrite = enabled;
        self
    }

    pub fn warn_on_overwrite(mut self, enabled: bool) -> Self {
        self.warn_on_overwrite = enabled;
        self
    }

    /// Label used in log events; `"default"` when none was set.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("default")
    }

    /// Reads `{PREFIX}_LABEL`, `{PREFIX}_DISPOSE_ON_OVERWRITE` and
    /// `{PREFIX}_WARN_ON_OVERWRITE`, keeping defaults for unset variables.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let mut config = Self::default();

        if let Ok(label) = env::var(format!("{}_LABEL", prefix)) {
            config.label = Some(label);
        }
        if let Some(value) = env_bool(&format!("{}_DISPOSE_ON_OVERWRITE", prefix))? {
            config.dispose_on_overwrite = value;
        }
        if let Some(value) = env_bool(&format!("{}_WARN_ON_OVERWRITE", prefix))? {
            config.warn_on_overwrite = value;
        }
        Ok(config)
    }

    /// Parses a JSON document; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool { key: key.to_string(), value }),
        },
        Err(_) => Ok(None),
    }
}
