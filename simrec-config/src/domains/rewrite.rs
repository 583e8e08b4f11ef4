//! Constants the rewrite stages inject into a recording

use crate::error::ConfigResult;
use crate::validation::{
    validate_enum_choice, validate_package_name, validate_required_string, validate_year,
    Validatable,
};
use serde::{Deserialize, Serialize};

const SUPPORTED_VERBS: [&str; 5] = ["get", "post", "put", "delete", "head"];

/// Rewrite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Package every rewritten simulation is moved into
    #[serde(default = "default_target_package")]
    pub target_package: String,

    /// Import statements inserted right after the package declaration
    #[serde(default = "default_extra_imports")]
    pub extra_imports: Vec<String>,

    /// Base class replacing `Simulation`
    #[serde(default = "default_base_class")]
    pub base_class: String,

    /// Import the recorder emits but the runner does not provide
    #[serde(default = "default_unused_import")]
    pub unused_import: String,

    /// Recorder URI variable that is commented out
    #[serde(default = "default_uri_variable")]
    pub uri_variable: String,

    /// Year written into recorded fact expiration timestamps
    #[serde(default = "default_expiration_year")]
    pub expiration_year: String,

    /// Feeder placeholder substituted for the recorded certname
    #[serde(default = "default_node_placeholder")]
    pub node_placeholder: String,

    /// Path prefix shared by every agent REST endpoint
    #[serde(default = "default_rest_prefix")]
    pub rest_prefix: String,

    /// HTTP verbs whose calls against `rest_prefix` get labelled
    #[serde(default = "default_rest_verbs")]
    pub rest_verbs: Vec<String>,
}

impl RewriteConfig {
    /// Fully qualified class name for a recording with the given file stem
    pub fn simulation_class(&self, file_stem: &str) -> String {
        format!("{}.{}", self.target_package, file_stem)
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            target_package: default_target_package(),
            extra_imports: default_extra_imports(),
            base_class: default_base_class(),
            unused_import: default_unused_import(),
            uri_variable: default_uri_variable(),
            expiration_year: default_expiration_year(),
            node_placeholder: default_node_placeholder(),
            rest_prefix: default_rest_prefix(),
            rest_verbs: default_rest_verbs(),
        }
    }
}

impl Validatable for RewriteConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_package_name(&self.target_package, "target_package", self.domain_name())?;
        validate_required_string(&self.base_class, "base_class", self.domain_name())?;
        validate_required_string(&self.unused_import, "unused_import", self.domain_name())?;
        validate_required_string(&self.uri_variable, "uri_variable", self.domain_name())?;
        validate_required_string(
            &self.node_placeholder,
            "node_placeholder",
            self.domain_name(),
        )?;
        validate_year(&self.expiration_year, "expiration_year", self.domain_name())?;

        if !self.rest_prefix.starts_with('/') {
            return Err(self.validation_error(format!(
                "rest_prefix must start with '/', got '{}'",
                self.rest_prefix
            )));
        }

        if self.rest_verbs.is_empty() {
            return Err(self.validation_error("At least one REST verb must be configured"));
        }
        for verb in &self.rest_verbs {
            validate_enum_choice(verb, &SUPPORTED_VERBS, "rest_verbs", self.domain_name())?;
        }

        for import in &self.extra_imports {
            if !import.trim_start().starts_with("import ") {
                return Err(self.validation_error(format!(
                    "extra_imports entries must be import statements, got '{}'",
                    import
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "rewrite"
    }
}

fn default_target_package() -> String {
    "com.puppetlabs.gatling.node_simulations".to_string()
}

fn default_extra_imports() -> Vec<String> {
    vec![
        "import com.puppetlabs.gatling.runner.SimulationWithScenario".to_string(),
        "import org.joda.time.LocalDateTime".to_string(),
        "import org.joda.time.format.ISODateTimeFormat".to_string(),
        "import java.util.UUID".to_string(),
    ]
}

fn default_base_class() -> String {
    "SimulationWithScenario".to_string()
}

fn default_unused_import() -> String {
    "import io.gatling.jdbc.Predef._".to_string()
}

fn default_uri_variable() -> String {
    "uri1".to_string()
}

fn default_expiration_year() -> String {
    "2125".to_string()
}

fn default_node_placeholder() -> String {
    "${node}".to_string()
}

fn default_rest_prefix() -> String {
    "/puppet/v3".to_string()
}

fn default_rest_verbs() -> Vec<String> {
    vec!["get".to_string(), "post".to_string(), "put".to_string()]
}
