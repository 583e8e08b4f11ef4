//! Simulation runner filesystem layout

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the simulation runner keeps recordings, request bodies and node configs.
///
/// Every directory except `runner_root` is relative to `runner_root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the simulation runner project
    #[serde(default = "default_runner_root")]
    pub runner_root: PathBuf,

    /// Directory that recordings must be placed in before rewriting
    #[serde(default = "default_simulation_dir")]
    pub simulation_dir: PathBuf,

    /// Directory holding recorded request bodies
    #[serde(default = "default_bodies_dir")]
    pub bodies_dir: PathBuf,

    /// Directory tree searched for (and receiving) node configuration files
    #[serde(default = "default_node_configs_dir")]
    pub node_configs_dir: PathBuf,
}

impl PathsConfig {
    /// Absolute-or-root-relative simulation directory
    pub fn simulation_dir(&self) -> PathBuf {
        self.resolve(&self.simulation_dir)
    }

    /// Absolute-or-root-relative request bodies directory
    pub fn bodies_dir(&self) -> PathBuf {
        self.resolve(&self.bodies_dir)
    }

    /// Absolute-or-root-relative node configuration directory
    pub fn node_configs_dir(&self) -> PathBuf {
        self.resolve(&self.node_configs_dir)
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.runner_root.join(dir)
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            runner_root: default_runner_root(),
            simulation_dir: default_simulation_dir(),
            bodies_dir: default_bodies_dir(),
            node_configs_dir: default_node_configs_dir(),
        }
    }
}

impl Validatable for PathsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(
            &self.runner_root.to_string_lossy(),
            "runner_root",
            self.domain_name(),
        )?;
        validate_required_string(
            &self.simulation_dir.to_string_lossy(),
            "simulation_dir",
            self.domain_name(),
        )?;
        validate_required_string(
            &self.bodies_dir.to_string_lossy(),
            "bodies_dir",
            self.domain_name(),
        )?;
        validate_required_string(
            &self.node_configs_dir.to_string_lossy(),
            "node_configs_dir",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "paths"
    }
}

fn default_runner_root() -> PathBuf {
    PathBuf::from("simulation-runner")
}

fn default_simulation_dir() -> PathBuf {
    PathBuf::from("src/main/scala/com/puppetlabs/gatling/node_simulations")
}

fn default_bodies_dir() -> PathBuf {
    PathBuf::from("user-files/bodies")
}

fn default_node_configs_dir() -> PathBuf {
    PathBuf::from("config/nodes")
}
