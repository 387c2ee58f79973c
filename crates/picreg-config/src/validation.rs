// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PicregConfig;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `fetch.timeout_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Validate a deserialized configuration, collecting every error.
pub fn validate_config(config: &PicregConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.registry.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "registry.path must not be empty".to_string(),
        });
    }

    if config.fetch.timeout_secs == 0 || config.fetch.timeout_secs > MAX_TIMEOUT_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "fetch.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                config.fetch.timeout_secs
            ),
        });
    }

    if config.fetch.user_agent.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "fetch.user_agent must not be empty".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PicregConfig::default()).is_ok());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = PicregConfig::default();
        config.fetch.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "timeout_secs"));
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let mut config = PicregConfig::default();
        config.registry.path = "  ".to_string();
        config.fetch.timeout_secs = 1000;
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "registry.path"));
        assert!(has_message(&errors, "logging.level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = PicregConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
