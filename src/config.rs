//! Registry configuration

use crate::error::{PubSubError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a `PubSub` registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubConfig {
    /// Label attached to every log record emitted by the registry
    #[serde(default = "default_label")]
    pub label: String,

    /// Joiner used to build the trailing subscription-list argument
    ///
    /// Callbacks receive the published subscription names joined with this
    /// value as their last argument (e.g. `"a,b"`).
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_label() -> String {
    "pubsub".to_string()
}

fn default_separator() -> String {
    ",".to_string()
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            separator: default_separator(),
        }
    }
}

impl PubSubConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the registry label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the subscription-list separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(PubSubError::Config("label must not be empty".to_string()));
        }
        if self.separator.is_empty() {
            return Err(PubSubError::Config(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
