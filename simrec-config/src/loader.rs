//! Configuration loading and environment variable handling

use crate::domains::SimrecConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "SIMREC".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SimrecConfig> {
        tracing::debug!("Reading configuration file {:?}", path.as_ref());
        let content = std::fs::read_to_string(path)?;
        let mut config: SimrecConfig = serde_yaml::from_str(&content)?;

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SimrecConfig> {
        let mut config = SimrecConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SimrecConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut SimrecConfig) -> ConfigResult<()> {
        self.apply_paths_overrides(&mut config.paths);
        self.apply_rewrite_overrides(&mut config.rewrite);
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply filesystem layout overrides
    fn apply_paths_overrides(&self, config: &mut crate::domains::paths::PathsConfig) {
        if let Ok(root) = self.get_env_var("RUNNER_ROOT") {
            config.runner_root = PathBuf::from(root);
        }
    }

    /// Apply rewrite constant overrides
    fn apply_rewrite_overrides(&self, config: &mut crate::domains::rewrite::RewriteConfig) {
        if let Ok(package) = self.get_env_var("TARGET_PACKAGE") {
            config.target_package = package;
        }

        if let Ok(year) = self.get_env_var("EXPIRATION_YEAR") {
            config.expiration_year = year;
        }

        if let Ok(prefix) = self.get_env_var("REST_PREFIX") {
            config.rest_prefix = prefix;
        }
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            use std::str::FromStr;
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            use std::str::FromStr;
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
