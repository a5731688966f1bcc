// crates/form-gate/src/config.rs
// ============================================================================
// Module: Form Gate Configuration
// Description: Configuration loading and validation for the form gate engine.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, crate::{audit, rules}
// ============================================================================

//! ## Overview
//! Engine configuration is loaded from a TOML file with strict size and path
//! limits. The path comes from an explicit argument, then the
//! `FORM_GATE_CONFIG` environment variable, then `form-gate.toml` in the
//! working directory. Every section has defaults, so an empty file is a valid
//! configuration. Anything out of range fails the load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::rules::RuleLoadError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "form-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FORM_GATE_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default rule file name.
const DEFAULT_RULES_PATH: &str = "rules.toml";
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
/// Largest request body limit accepted by validation.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Form gate engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormGateConfig {
    /// Rule file location.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Request payload decoding.
    #[serde(default)]
    pub payload: PayloadConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Rule file configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Path to the rule-definition TOML file.
    #[serde(default = "default_rules_path")]
    pub path: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
        }
    }
}

/// Request payload configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PayloadConfig {
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_bytes: usize,
    /// Decode RFC 3339 strings as timestamps.
    #[serde(default)]
    pub rfc3339_timestamps: bool,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            rfc3339_timestamps: false,
        }
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Drop events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl FormGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.base_dir = resolved.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.payload.validate()?;
        self.audit.validate()
    }

    /// Returns the rule file path, resolved against the config file directory.
    #[must_use]
    pub fn rules_path(&self) -> PathBuf {
        self.resolve(&self.rules.path)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        match (self.audit.sink, &self.audit.path) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(&self.resolve(path))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }

    /// Resolves a configured path against the config file directory.
    fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl RulesConfig {
    /// Validates rule file settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("rules.path", &self.path)
    }
}

impl PayloadConfig {
    /// Validates payload limits.
    fn validate(self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 || self.max_bytes > MAX_PAYLOAD_BYTES {
            return Err(ConfigError::Invalid(format!(
                "payload.max_bytes must be between 1 and {MAX_PAYLOAD_BYTES}"
            )));
        }
        Ok(())
    }
}

impl AuditConfig {
    /// Validates audit sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::None | AuditSinkKind::Stderr, _) => Ok(()),
        }
    }
}

/// Returns the default rule file path.
fn default_rules_path() -> String {
    DEFAULT_RULES_PATH.to_string()
}

/// Returns the default payload size limit.
const fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening a sink.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// The configured rule file failed to load.
    #[error(transparent)]
    Rules(#[from] RuleLoadError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        let err = validate_path_string("rules.path", "   ").unwrap_err();
        assert!(err.to_string().contains("rules.path must be non-empty"));
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        assert!(validate_path_string("audit.path", &format!("logs/{long}")).is_err());
        let at_max = "a".repeat(MAX_PATH_COMPONENT_LENGTH);
        assert!(validate_path_string("audit.path", &format!("logs/{at_max}")).is_ok());
    }

    #[test]
    fn validate_path_rejects_overlong_paths() {
        let long = PathBuf::from("a/".repeat(MAX_TOTAL_PATH_LENGTH));
        assert!(validate_path(&long).is_err());
    }

    #[test]
    fn relative_paths_follow_the_config_directory() {
        let mut config = FormGateConfig::default();
        config.base_dir = Some(PathBuf::from("/etc/form-gate"));
        assert_eq!(config.rules_path(), PathBuf::from("/etc/form-gate/rules.toml"));
        config.rules.path = "/srv/rules.toml".to_string();
        assert_eq!(config.rules_path(), PathBuf::from("/srv/rules.toml"));
    }
}
