//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Collects domain failures so that a single pass reports every problem.
#[derive(Debug, Default)]
pub struct ValidationReport {
    failures: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one check
    pub fn check(&mut self, result: ConfigResult<()>) {
        if let Err(error) = result {
            self.failures.push(error.to_string());
        }
    }

    /// Fold a nested result, keeping each of its messages separate
    pub fn absorb(&mut self, result: ConfigResult<()>) {
        if let Err(error) = result {
            self.failures.extend(error.messages());
        }
    }

    pub fn finish(self) -> ConfigResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(self.failures))
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate that an optional value is present and non-empty
pub fn validate_required_option(
    value: Option<&str>,
    field_name: &str,
    domain: &str,
) -> ConfigResult<()> {
    validate_required_string(value.unwrap_or_default(), field_name, domain)
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }

    url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u32, "vus", "test").is_ok());
        assert!(validate_positive(0u32, "vus", "test").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://cloudapi.127.0.0.1.nip.io", "base_url", "api").is_ok());
        assert!(validate_url("", "base_url", "api").is_err());
        assert!(validate_url("not a url", "base_url", "api").is_err());
    }

    #[test]
    fn test_report_collects_every_failure() {
        let mut report = ValidationReport::new();
        report.check(validate_positive(0u32, "vus", "test"));
        report.check(validate_positive(0u32, "iterations", "test"));
        report.check(validate_positive(3u32, "total_batches", "test"));

        match report.finish() {
            Err(ConfigError::ValidationError(messages)) => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].contains("vus"));
                assert!(messages[1].contains("iterations"));
            }
            other => panic!("expected aggregated validation error, got {:?}", other),
        }
    }
}
