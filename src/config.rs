//! Configuration System
//!
//! Layered configuration: an optional TOML file, overridden by environment
//! variables with the `LECTERN` prefix, over built-in defaults. An empty
//! configuration is valid; every field has a default.

use crate::error::PortalError;
use crate::logging::LoggingConfig;
use crate::provider::ProviderSettings;
use ::config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,

    /// Assistant provider configurations. Racing order follows declaration
    /// order.
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,

    /// Assistant behavior
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the embedded database lives.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_data_path() -> PathBuf {
    ProjectDirs::from("", "", "lectern")
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".lectern/store"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Persona line embedded in every system prompt.
    #[serde(default = "default_persona")]
    pub persona: String,
}

fn default_persona() -> String {
    "You are the portal's study assistant. Answer briefly, and point visitors \
     at the most relevant available documents."
        .to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from an optional file plus `LECTERN_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, PortalError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder = builder.add_source(Environment::with_prefix("LECTERN").separator("__"));

        let config: PortalConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), PortalError> {
        for provider in &self.providers {
            provider
                .validate()
                .map_err(|e| PortalError::ConfigError(format!("Provider '{}': {e}", provider.name)))?;
        }

        let mut names: Vec<&str> = self.providers.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.providers.len() {
            return Err(PortalError::ConfigError(
                "Provider names must be unique".to_string(),
            ));
        }

        Ok(())
    }
}
