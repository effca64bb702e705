//! Configuration for document file handles.
//!
//! Follows a builder pattern with validation. Configuration can also be
//! loaded from a YAML file.

use crate::error::{Error, Result};
use crate::options::EncodeOptions;
use crate::resilience::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-handle configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Write retry policy
    pub retry: RetryConfig,
    /// Options used by `write` when none are given explicitly
    pub encode: EncodeOptions,
    /// Overrides the bundled default schema
    pub default_schema: Option<PathBuf>,
}

impl HandleConfig {
    /// Create a new config with builder
    pub fn builder() -> HandleConfigBuilder {
        HandleConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::config_error("retry.max_attempts must be at least 1"));
        }

        if let Some(schema) = &self.default_schema
            && schema.as_os_str().is_empty()
        {
            return Err(Error::config_error("default_schema cannot be empty"));
        }

        Ok(())
    }

    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        // Same rules as document decoding: empty text or a null document
        // means "nothing configured"
        let parse_error =
            |e: serde_yaml::Error| Error::parse_error(path.display().to_string(), e.to_string());
        let config: Self = if raw.is_empty() {
            Self::default()
        } else {
            let value: serde_yaml::Value = serde_yaml::from_str(&raw).map_err(parse_error)?;
            if value.is_null() {
                Self::default()
            } else {
                serde_yaml::from_value(value).map_err(parse_error)?
            }
        };

        config.validate()?;
        log::debug!("Loaded handle config from {}", path.display());
        Ok(config)
    }
}

/// Builder for HandleConfig
#[derive(Debug, Default)]
pub struct HandleConfigBuilder {
    retry: Option<RetryConfig>,
    encode: Option<EncodeOptions>,
    default_schema: Option<PathBuf>,
}

impl HandleConfigBuilder {
    /// Set the write retry policy
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Set the number of write attempts
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        let mut retry = self.retry.unwrap_or_default();
        retry.max_attempts = max_attempts;
        self.retry = Some(retry);
        self
    }

    /// Set the pause between write attempts
    pub fn backoff_ms(mut self, backoff_ms: u64) -> Self {
        let mut retry = self.retry.unwrap_or_default();
        retry.backoff_ms = backoff_ms;
        self.retry = Some(retry);
        self
    }

    /// Set default encode options
    pub fn encode(mut self, encode: EncodeOptions) -> Self {
        self.encode = Some(encode);
        self
    }

    /// Override the default schema location
    pub fn default_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_schema = Some(path.into());
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<HandleConfig> {
        let config = HandleConfig {
            retry: self.retry.unwrap_or_default(),
            encode: self.encode.unwrap_or_default(),
            default_schema: self.default_schema,
        };
        config.validate()?;
        Ok(config)
    }
}
