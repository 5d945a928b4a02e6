//! # Configuration Management
//!
//! Tunable limits for the protocol core.
//!
//! The wire format itself has no configuration surface: tags and layouts are
//! fixed. What is tunable is resource protection at the decode boundary,
//! chiefly the message size cap enforced by the framing layer before any
//! allocation is sized by a peer-supplied length claim.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Direct instantiation with defaults

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Max allowed encoded message size (16 MB).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Protocol-core configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtocolConfig {
    /// Maximum encoded size of a single message, payload and header
    /// included. Length claims beyond this are rejected before allocation.
    pub max_message_size: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_message_size == 0 {
            errors.push("Max message size cannot be 0".to_string());
        } else if self.max_message_size < 1024 {
            errors.push("Max message size too small (minimum: 1 KB)".to_string());
        } else if self.max_message_size > 100 * 1024 * 1024 {
            errors.push(format!(
                "Max message size too large: {} bytes (maximum recommended: 100 MB)",
                self.max_message_size
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ProtocolConfig::default().validate().is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = ProtocolConfig::from_toml("max_message_size = 65536").unwrap();
        assert_eq!(config.max_message_size, 65536);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = ProtocolConfig {
            max_message_size: 0,
        };
        assert!(config.validate_strict().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            ProtocolConfig::from_toml("max_message_size = \"lots\""),
            Err(ProtocolError::ConfigError(_))
        ));
    }
}
