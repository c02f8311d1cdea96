// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::UnvaultConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest `log2(n)` any configuration may allow. 2^30 blocks of 128 * r
/// bytes is far past any machine this runs on.
const MAX_LOG_N_CEILING: u8 = 30;

/// 64 GiB. Larger working sets are rejected outright.
const MAX_MEMORY_MIB_CEILING: u32 = 65_536;

const MAX_INDENT: u8 = 8;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &UnvaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.decrypt.max_log_n == 0 || config.decrypt.max_log_n > MAX_LOG_N_CEILING {
        errors.push(ConfigError::Validation {
            message: format!(
                "decrypt.max_log_n must be between 1 and {MAX_LOG_N_CEILING}, got {}",
                config.decrypt.max_log_n
            ),
        });
    }

    if config.decrypt.max_r < 1 {
        errors.push(ConfigError::Validation {
            message: "decrypt.max_r must be at least 1, got 0".to_string(),
        });
    }

    if config.decrypt.max_p < 1 {
        errors.push(ConfigError::Validation {
            message: "decrypt.max_p must be at least 1, got 0".to_string(),
        });
    }

    let memory = config.decrypt.max_memory_mib;
    if memory == 0 || memory > MAX_MEMORY_MIB_CEILING {
        errors.push(ConfigError::Validation {
            message: format!(
                "decrypt.max_memory_mib must be between 1 and {MAX_MEMORY_MIB_CEILING}, got {memory}"
            ),
        });
    }

    if config.output.indent > MAX_INDENT {
        errors.push(ConfigError::Validation {
            message: format!(
                "output.indent must be at most {MAX_INDENT}, got {}",
                config.output.indent
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

    fn has_validation_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = UnvaultConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = UnvaultConfig::default();
        config.log.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "log.level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = UnvaultConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_max_log_n_fails_validation() {
        let mut config = UnvaultConfig::default();
        config.decrypt.max_log_n = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "decrypt.max_log_n"));
    }

    #[test]
    fn memory_cap_must_be_in_range() {
        let mut config = UnvaultConfig::default();
        config.decrypt.max_memory_mib = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "decrypt.max_memory_mib"));

        config.decrypt.max_memory_mib = MAX_MEMORY_MIB_CEILING + 1;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "decrypt.max_memory_mib"));

        config.decrypt.max_memory_mib = 32;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn oversized_indent_fails_validation() {
        let mut config = UnvaultConfig::default();
        config.output.indent = 12;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "output.indent"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = UnvaultConfig::default();
        config.log.level = "loud".to_string();
        config.decrypt.max_r = 0;
        config.decrypt.max_p = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
