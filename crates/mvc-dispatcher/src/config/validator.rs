//! Configuration validation for the dispatcher

use super::DispatcherConfig;
use crate::error::{DispatchError, Result};

/// Configuration validator for the dispatcher
///
/// Rejects configurations the dispatch loop cannot run with:
/// - `max_forwards` must allow at least one inner cycle
/// - default controller/action names must be non-empty identifiers
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a dispatcher configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &DispatcherConfig) -> Result<()> {
        if config.max_forwards == 0 {
            return Err(DispatchError::InvalidConfiguration(
                "max_forwards must be greater than 0".to_string(),
            ));
        }

        Self::validate_name("default_controller", &config.default_controller)?;
        Self::validate_name("default_action", &config.default_action)?;

        Ok(())
    }

    /// Names must start with a letter or underscore and contain only
    /// alphanumerics, underscores and dashes
    fn validate_name(field: &str, name: &str) -> Result<()> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);

        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(DispatchError::InvalidConfiguration(format!(
                "Invalid {}: '{}'",
                field, name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(ConfigValidator::validate(&DispatcherConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_max_forwards() {
        let config = DispatcherConfig {
            max_forwards: 0,
            ..DispatcherConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_default_controller() {
        let config = DispatcherConfig {
            default_controller: String::new(),
            ..DispatcherConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_validate_malformed_default_action() {
        let config = DispatcherConfig {
            default_action: "9lives".to_string(),
            ..DispatcherConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());

        let config = DispatcherConfig {
            default_action: "show page".to_string(),
            ..DispatcherConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_dashes_and_underscores() {
        let config = DispatcherConfig {
            default_controller: "user_profile".to_string(),
            default_action: "edit-avatar".to_string(),
            ..DispatcherConfig::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
