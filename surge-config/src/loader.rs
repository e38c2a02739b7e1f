//! Configuration loading and environment variable handling

use crate::domains::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::domains::{api::ApiConfig, auth::AuthConfig, polling::PollingConfig};
use crate::domains::test::{ProofSelection, TestConfig};
use crate::domains::{schema::SchemaConfig, SurgeConfig};
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support.
///
/// The harness reads the bare variable names (`VUS`, `ITERATIONS`,
/// `CLOUDAPI_URL`, ...). A prefix may be set to namespace them.
pub struct ConfigLoader {
    /// Environment variable prefix, empty for bare names
    prefix: String,
}

impl ConfigLoader {
    /// Create a config loader reading unprefixed variables
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SurgeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SurgeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SurgeConfig> {
        let mut config = SurgeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SurgeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&self, config: &mut SurgeConfig) -> ConfigResult<()> {
        let mut env = EnvReader {
            loader: self,
            failures: Vec::new(),
        };

        env.apply_test_overrides(&mut config.test);
        env.apply_schema_overrides(&mut config.schema);
        env.apply_api_overrides(&mut config.api);
        env.apply_auth_overrides(&mut config.auth);
        env.apply_polling_overrides(&mut config.polling);
        env.apply_logging_overrides(&mut config.logging);

        if env.failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::EnvError(env.failures))
        }
    }

    /// Get environment variable with prefix; empty values count as unset
    fn get_env_var(&self, name: &str) -> Option<String> {
        let key = if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        };
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `true` or `1` enable a flag; anything else disables it
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Parse a non-negative integer, naming the variable on failure
pub fn parse_number<T>(name: &str, value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.trim();
    if value.starts_with('-') {
        return Err(format!("Invalid {}: must be non-negative, got {}", name, value));
    }
    value
        .parse()
        .map_err(|e| format!("Invalid {}: {} ({})", name, value, e))
}

/// One pass over the environment that keeps going after a bad value
struct EnvReader<'a> {
    loader: &'a ConfigLoader,
    failures: Vec<String>,
}

impl EnvReader<'_> {
    fn string(&self, name: &str, target: &mut String) {
        if let Some(value) = self.loader.get_env_var(name) {
            *target = value;
        }
    }

    fn optional(&self, name: &str, target: &mut Option<String>) {
        if let Some(value) = self.loader.get_env_var(name) {
            *target = Some(value);
        }
    }

    fn flag(&self, name: &str, target: &mut bool) {
        if let Some(value) = self.loader.get_env_var(name) {
            *target = parse_flag(&value);
        }
    }

    fn number<T>(&mut self, name: &str, target: &mut T)
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Some(value) = self.loader.get_env_var(name) {
            match parse_number(name, &value) {
                Ok(parsed) => *target = parsed,
                Err(message) => self.failures.push(message),
            }
        }
    }

    fn seconds(&mut self, name: &str, target: &mut Duration) {
        let mut seconds = target.as_secs();
        self.number(name, &mut seconds);
        *target = Duration::from_secs(seconds);
    }

    fn apply_test_overrides(&mut self, config: &mut TestConfig) {
        self.number("VUS", &mut config.vus);
        self.number("ITERATIONS", &mut config.iterations);
        self.number("TOTAL_BATCHES", &mut config.total_batches);
        self.string("ISSUER_PREFIX", &mut config.issuer_prefix);
        self.string("HOLDER_PREFIX", &mut config.holder_prefix);
        self.seconds("SLEEP_DURATION", &mut config.sleep_duration);
        self.string("VERSION", &mut config.version);
        self.number("NUM_ISSUERS", &mut config.num_issuers);
        self.flag("IS_REVOKED", &mut config.is_revoked);
        if let Some(selection) = self.loader.get_env_var("PROOF_SELECTION") {
            match ProofSelection::from_str(&selection) {
                Ok(selection) => config.proof_selection = selection,
                Err(message) => self.failures.push(message),
            }
        }
        self.flag("OOB_INVITATION", &mut config.oob_invitation);
        self.flag("USE_AUTO_PUBLISH", &mut config.use_auto_publish);
        self.flag(
            "FIRE_AND_FORGET_REVOCATION",
            &mut config.fire_and_forget_revocation,
        );
        self.flag("SHUFFLE", &mut config.shuffle);
        self.flag("SKIP_DELETE_ISSUERS", &mut config.skip_delete_issuers);
        self.flag("SKIP_DELETE_HOLDERS", &mut config.skip_delete_holders);
        if let Some(dir) = self.loader.get_env_var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
    }

    fn apply_schema_overrides(&mut self, config: &mut SchemaConfig) {
        self.string("SCHEMA_NAME", &mut config.name);
        self.string("SCHEMA_VERSION", &mut config.version);
        self.string("SCHEMA_PREFIX", &mut config.prefix);
    }

    fn apply_api_overrides(&mut self, config: &mut ApiConfig) {
        self.string("CLOUDAPI_URL", &mut config.base_url);
        self.seconds("HTTP_TIMEOUT", &mut config.timeout);
    }

    fn apply_auth_overrides(&mut self, config: &mut AuthConfig) {
        self.flag("USE_ENTERPRISE", &mut config.use_enterprise);
        self.optional("TENANT_ADMIN_API_KEY", &mut config.tenant_admin_api_key);
        self.optional("GOVERNANCE_API_KEY", &mut config.governance_api_key);
        self.optional("CLIENT_ID", &mut config.client_id);
        self.optional("CLIENT_SECRET", &mut config.client_secret);
        self.optional("OAUTH_ENDPOINT", &mut config.oauth_endpoint);
        self.optional("GOVERNANCE_CLIENT_ID", &mut config.governance_client_id);
        self.optional("GOVERNANCE_CLIENT_SECRET", &mut config.governance_client_secret);
        self.optional(
            "GOVERNANCE_OAUTH_ENDPOINT",
            &mut config.governance_oauth_endpoint,
        );
    }

    fn apply_polling_overrides(&mut self, config: &mut PollingConfig) {
        self.number("POLL_MAX_ATTEMPTS", &mut config.max_attempts);
        self.number("POLL_LOOK_BACK", &mut config.look_back);
        self.seconds("POLL_REQUEST_TIMEOUT", &mut config.request_timeout);
        self.flag("POLL_USE_STREAM", &mut config.use_stream);
        self.number("POLL_STREAM_MAX_RETRIES", &mut config.stream_max_retries);
        self.seconds("POLL_STREAM_RETRY_DELAY", &mut config.stream_retry_delay);
        self.number(
            "POLL_STREAM_MAX_EMPTY_PINGS",
            &mut config.stream_max_empty_pings,
        );
        self.seconds(
            "POLL_STREAM_CONNECTION_TIMEOUT",
            &mut config.stream_connection_timeout,
        );
    }

    fn apply_logging_overrides(&mut self, config: &mut LoggingConfig) {
        if let Some(level) = self.loader.get_env_var("LOG_LEVEL") {
            match LogLevel::from_str(&level) {
                Ok(level) => config.level = level,
                Err(message) => self.failures.push(message),
            }
        }
        if let Some(format) = self.loader.get_env_var("LOG_FORMAT") {
            match LogFormat::from_str(&format) {
                Ok(format) => config.format = format,
                Err(message) => self.failures.push(message),
            }
        }
        self.flag("DEBUG", &mut config.debug);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_parse_number_rejects_negative_and_garbage() {
        assert_eq!(parse_number::<u32>("VUS", "12").unwrap(), 12);
        assert!(parse_number::<u32>("VUS", "-1").unwrap_err().contains("VUS"));
        assert!(parse_number::<u32>("VUS", "four").unwrap_err().contains("VUS"));
    }
}
