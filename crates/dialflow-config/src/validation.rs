// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: positive intervals, sane page sizes, non-empty paths and URLs.

use crate::diagnostic::ConfigError;
use crate::model::DialflowConfig;

/// Hard ceiling on the customer-page size the backend accepts per request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DialflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.tick_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.tick_interval_secs must be greater than zero".to_string(),
        });
    }

    if config.engine.page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.page_size must be greater than zero".to_string(),
        });
    }

    if config.engine.page_size > MAX_PAGE_SIZE {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.page_size must be at most {MAX_PAGE_SIZE}, got {}",
                config.engine.page_size
            ),
        });
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level must be one of {}, got `{}`",
                valid_levels.join(", "),
                config.engine.log_level
            ),
        });
    }

    for (section, base_url) in [
        ("crm", &config.crm.base_url),
        ("telephony", &config.telephony.base_url),
    ] {
        let url = base_url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{section}.base_url must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{section}.base_url `{url}` must start with http:// or https://"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.storage.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.poll_interval_ms must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DialflowConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let mut config = DialflowConfig::default();
        config.engine.tick_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("tick_interval_secs")));
    }

    #[test]
    fn oversized_page_rejected() {
        let mut config = DialflowConfig::default();
        config.engine.page_size = 500;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("page_size")));
    }

    #[test]
    fn bad_base_url_scheme_rejected() {
        let mut config = DialflowConfig::default();
        config.crm.base_url = "ftp://crm.example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("crm.base_url")));
    }

    #[test]
    fn all_errors_collected_not_fail_fast() {
        let mut config = DialflowConfig::default();
        config.engine.tick_interval_secs = 0;
        config.engine.page_size = 0;
        config.storage.database_path = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors, got {}", errors.len());
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = DialflowConfig::default();
        config.engine.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("log_level")));
    }
}
