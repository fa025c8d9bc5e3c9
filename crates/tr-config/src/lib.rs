// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for TUNE Reporting error
//! handling.
//!
//! [`ReportingConfig`] controls the parts of error reporting that vary per
//! deployment: the default origin stamped on errors, whether the outbound
//! request trace is attached to log events, and the level those events use.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read config {path}: {reason}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error detail.
        reason: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Request traces will be written to logs and may contain credentials.
    RequestTraceLogged,
    /// An environment override could not be interpreted and was ignored.
    IgnoredOverride {
        /// Variable name.
        var: String,
        /// Raw value that was rejected.
        value: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::RequestTraceLogged => {
                f.write_str("request traces are logged and may contain api keys")
            }
            ConfigWarning::IgnoredOverride { var, value } => {
                write!(f, "ignored {var}='{value}': expected true or false")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Error-reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ReportingConfig {
    /// Origin stamped on errors that do not name one explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_origin: Option<String>,

    /// Attach the outbound request trace to error log events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_request_trace: Option<bool>,

    /// Level used for error log events (e.g. `"error"`, `"warn"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_origin: None,
            log_request_trace: None,
            log_level: Some("error".into()),
        }
    }
}

impl ReportingConfig {
    /// The configured default origin, ignoring blank values.
    pub fn origin(&self) -> Option<&str> {
        self.default_origin
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether request traces go into log events; off unless set.
    pub fn log_request_trace(&self) -> bool {
        self.log_request_trace.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recognised log levels.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

const ENV_ORIGIN: &str = "TUNE_REPORTING_ORIGIN";
const ENV_LOG_LEVEL: &str = "TUNE_REPORTING_LOG_LEVEL";
const ENV_LOG_REQUEST_TRACE: &str = "TUNE_REPORTING_LOG_REQUEST_TRACE";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`ReportingConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ReportingConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases; any
/// override that could not be applied comes back as a warning.
pub fn load_config(
    path: Option<&Path>,
) -> Result<(ReportingConfig, Vec<ConfigWarning>), ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok())
}

/// [`load_config`] with overrides read from `lookup` instead of the process
/// environment.
pub fn load_config_with<F>(
    path: Option<&Path>,
    lookup: F,
) -> Result<(ReportingConfig, Vec<ConfigWarning>), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => parse_toml(&read_file(p)?)?,
        None => ReportingConfig::default(),
    };
    let warnings = apply_overrides(&mut config, lookup);
    Ok((config, warnings))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
    })
}

/// Parse a TOML string into a [`ReportingConfig`].
pub fn parse_toml(content: &str) -> Result<ReportingConfig, ConfigError> {
    toml::from_str::<ReportingConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `TUNE_REPORTING_ORIGIN`
/// - `TUNE_REPORTING_LOG_LEVEL`
/// - `TUNE_REPORTING_LOG_REQUEST_TRACE` (`true` / `false`)
#[must_use = "ignored overrides are reported as warnings"]
pub fn apply_env_overrides(config: &mut ReportingConfig) -> Vec<ConfigWarning> {
    apply_overrides(config, |var| std::env::var(var).ok())
}

/// Apply overrides from an arbitrary variable source.
#[must_use = "ignored overrides are reported as warnings"]
pub fn apply_overrides<F>(config: &mut ReportingConfig, lookup: F) -> Vec<ConfigWarning>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    if let Some(val) = lookup(ENV_ORIGIN) {
        config.default_origin = Some(val);
    }
    if let Some(val) = lookup(ENV_LOG_LEVEL) {
        config.log_level = Some(val);
    }
    if let Some(val) = lookup(ENV_LOG_REQUEST_TRACE) {
        match val.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => config.log_request_trace = Some(true),
            "false" | "0" => config.log_request_trace = Some(false),
            _ => warnings.push(ConfigWarning::IgnoredOverride {
                var: ENV_LOG_REQUEST_TRACE.into(),
                value: val,
            }),
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
pub fn validate_config(config: &ReportingConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref origin) = config.default_origin
        && origin.trim().is_empty()
    {
        errors.push("default_origin must not be blank".into());
    }

    if let Some(ref level) = config.log_level
        && !VALID_LOG_LEVELS.contains(&level.as_str())
    {
        errors.push(format!("invalid log_level '{level}'"));
    }

    if config.log_request_trace() {
        warnings.push(ConfigWarning::RequestTraceLogged);
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
///
pub fn merge_configs(base: ReportingConfig, overlay: ReportingConfig) -> ReportingConfig {
    ReportingConfig {
        default_origin: overlay.default_origin.or(base.default_origin),
        log_request_trace: overlay.log_request_trace.or(base.log_request_trace),
        log_level: overlay.log_level.or(base.log_level),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
