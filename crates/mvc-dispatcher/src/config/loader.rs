//! Configuration loader for the dispatcher
//!
//! Reads [`DispatcherConfig`] from YAML. A missing file is not an error: the
//! defaults apply. Loaded configuration is always validated.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{ConfigValidator, DispatcherConfig};
use crate::error::{DispatchError, Result};

/// Top-level document shape
#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    dispatcher: Option<DispatcherConfig>,
}

/// Configuration loader for the dispatcher
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or holds
    /// an invalid configuration.
    pub fn load_from_path(path: &Path) -> Result<DispatcherConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "No dispatcher config file, using defaults");
            return Ok(DispatcherConfig::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// An empty document or one without a `dispatcher` key yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<DispatcherConfig> {
        let config = if content.trim().is_empty() {
            DispatcherConfig::default()
        } else {
            let document: ConfigDocument = serde_yaml::from_str(content).map_err(|e| {
                DispatchError::InvalidConfiguration(format!("Invalid YAML: {}", e))
            })?;
            document.dispatcher.unwrap_or_default()
        };

        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Render configuration as YAML
    pub fn to_yaml_string(config: &DispatcherConfig) -> Result<String> {
        #[derive(serde::Serialize)]
        struct Document<'a> {
            dispatcher: &'a DispatcherConfig,
        }

        Ok(serde_yaml::to_string(&Document { dispatcher: config })?)
    }
}
