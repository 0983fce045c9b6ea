//! Tracing subscriber bootstrap
//!
//! Library code only emits `tracing` events. Host applications that do not
//! install their own subscriber can call [`init_tracing`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use apisuite_core::observability::{init_tracing, OutputFormat, TracingConfig};
//!
//! init_tracing(&TracingConfig::builder().log_level_str("debug")?.output_format(OutputFormat::Json).build())?;
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{ApiSuiteError, Result};

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Default directive when `RUST_LOG` is unset, e.g. `info` or `apisuite_core=debug`
    pub log_level: String,
    pub output_format: OutputFormat,
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output_format: OutputFormat::Text,
            with_target: true,
        }
    }
}

impl TracingConfig {
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::default()
    }

    pub fn debug() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .map_err(|e| {
                ApiSuiteError::TracingInit(format!("invalid filter '{}': {e}", self.log_level))
            })
    }
}

#[derive(Debug, Default)]
pub struct TracingConfigBuilder {
    log_level: Option<String>,
    output_format: Option<OutputFormat>,
    with_target: Option<bool>,
}

impl TracingConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level.as_str().to_lowercase());
        self
    }

    /// Set the level from a string; only plain level names are accepted here.
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let level = level.to_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                self.log_level = Some(level);
                Ok(self)
            }
            _ => Err(ApiSuiteError::TracingInit(format!(
                "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))),
        }
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = Some(with_target);
        self
    }

    pub fn build(self) -> TracingConfig {
        let defaults = TracingConfig::default();
        TracingConfig {
            log_level: self.log_level.unwrap_or(defaults.log_level),
            output_format: self.output_format.unwrap_or_default(),
            with_target: self.with_target.unwrap_or(defaults.with_target),
        }
    }
}

/// Installs a global fmt subscriber; fails if one is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = config.filter()?;
    let result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .json()
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.with_target)
            .try_init(),
    };
    result.map_err(|e| ApiSuiteError::TracingInit(e.to_string()))
}
