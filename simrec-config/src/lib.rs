//! Domain-driven configuration management for simrec
//!
//! Configuration is split by functional domain (filesystem layout, rewrite
//! rules, lookup tables, logging), with validation, defaults, and environment
//! variable support. Every table the rewrite pipeline consults lives here as
//! plain data so it can be replaced from a YAML file without touching code.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    logging::{LogFormat, LogLevel, LoggingConfig},
    paths::PathsConfig,
    rewrite::RewriteConfig,
    tables::{HeaderHelper, TablesConfig, TerminologyEntry},
    SimrecConfig,
};
