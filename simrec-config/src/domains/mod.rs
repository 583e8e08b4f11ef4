//! Domain-specific configuration modules

pub mod logging;
pub mod paths;
pub mod rewrite;
pub mod tables;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main simrec configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimrecConfig {
    /// Simulation runner filesystem layout
    #[serde(default)]
    pub paths: paths::PathsConfig,

    /// Constants injected by the rewrite stages
    #[serde(default)]
    pub rewrite: rewrite::RewriteConfig,

    /// Lookup tables (header helpers, request terminology)
    #[serde(default)]
    pub tables: tables::TablesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl SimrecConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.paths.validate()?;
        self.rewrite.validate()?;
        self.tables.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = SimrecConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
