//! Node configuration lookup and generation
//!
//! The runner classifies simulated nodes from JSON files in its node config
//! directory. A rewritten simulation needs one; when none references the
//! simulation class the operator is asked for the details and a new file is
//! written.

use crate::error::{RecordingError, RecordingResult};
use crate::prompt::Prompter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const CLASSES_QUESTION: &str = "Puppet classes? (IMPORTANT!  This will be used to classify nodes,\n\
and *must* match up to what your recorded catalog was compiled\n\
with.  For best results use a single 'role' class, but if you\n\
need to provide multiple classes, separate them with a comma.)\n\
[]>";

/// Contents of a node config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub simulation_class: String,
    pub certname_prefix: String,
    pub classes: Vec<String>,
}

/// What the node config step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeConfigOutcome {
    /// A config already referenced the simulation class
    Existing(PathBuf),
    /// A new config was written
    Created(PathBuf),
}

impl NodeConfigOutcome {
    pub fn path(&self) -> &Path {
        match self {
            NodeConfigOutcome::Existing(path) | NodeConfigOutcome::Created(path) => path,
        }
    }
}

/// First file under `dir` with a line naming `simulation_class`.
///
/// A missing directory holds no configs.
pub fn find_node_config(dir: &Path, simulation_class: &str) -> RecordingResult<Option<PathBuf>> {
    let source = format!(
        r#""simulation_class"\s*:\s*"{}""#,
        regex::escape(simulation_class)
    );
    let pattern = Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source.clone(),
        source: err,
    })?;

    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Node config directory does not exist");
        return Ok(None);
    }

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let contents = match std::fs::read(entry.path()) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Skipping unreadable file");
                continue;
            }
        };

        let text = String::from_utf8_lossy(&contents);
        if text.lines().any(|line| pattern.is_match(line)) {
            let path = entry.path();
            return Ok(Some(
                std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
            ));
        }
    }

    Ok(None)
}

/// Default file name: the last segment of the class plus `.json`
pub fn node_config_file_name(simulation_class: &str) -> String {
    let name = simulation_class
        .rsplit('.')
        .next()
        .unwrap_or(simulation_class);
    format!("{}.json", name)
}

/// Default certname prefix: the host part of `certname` without trailing digits
pub fn default_certname_prefix(certname: &str) -> String {
    let host = match certname.split_once('.') {
        Some((host, _)) if !host.is_empty() => host,
        _ => certname,
    };
    host.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
}

/// Split a comma separated class list, dropping blank entries
pub fn parse_classes(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|class| !class.is_empty())
        .map(str::to_string)
        .collect()
}

fn refuse_existing(path: &Path) -> RecordingResult<()> {
    if path.exists() {
        return Err(RecordingError::NodeConfigExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Create `path` with `contents`, failing if anything is already there
fn write_new_file(path: &Path, contents: &str) -> RecordingResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| match err.kind() {
            ErrorKind::AlreadyExists => RecordingError::NodeConfigExists {
                path: path.to_path_buf(),
            },
            _ => RecordingError::io(path, err),
        })?;
    file.write_all(contents.as_bytes())
        .map_err(|err| RecordingError::io(path, err))
}

/// Find the node config for `simulation_class`, or create one from the
/// operator's answers.
///
/// Never overwrites an existing file.
pub fn ensure_node_config(
    dir: &Path,
    simulation_class: &str,
    certname: &str,
    prompter: &mut dyn Prompter,
) -> RecordingResult<NodeConfigOutcome> {
    if let Some(existing) = find_node_config(dir, simulation_class)? {
        info!(path = %existing.display(), "Found existing node config");
        return Ok(NodeConfigOutcome::Existing(existing));
    }

    info!("No node config file found, generating one");

    let default_name = node_config_file_name(simulation_class);
    let default_path = dir.join(&default_name);
    refuse_existing(&default_path)?;

    let file_name = prompter.ask(
        &format!("Node config file name? [{}]> ", default_name),
        &default_name,
    )?;
    let path = if file_name == default_name {
        default_path
    } else {
        let chosen = dir.join(&file_name);
        refuse_existing(&chosen)?;
        chosen
    };

    let default_prefix = default_certname_prefix(certname);
    let certname_prefix = prompter.ask(
        &format!(
            "Certname prefix? (this will be used to classify nodes and generate certnames)\n[{}]>",
            default_prefix
        ),
        &default_prefix,
    )?;

    let classes = parse_classes(&prompter.ask(CLASSES_QUESTION, "")?);

    let config = NodeConfig {
        simulation_class: simulation_class.to_string(),
        certname_prefix,
        classes,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| RecordingError::io(parent, err))?;
    }
    let json = serde_json::to_string_pretty(&config)?;
    write_new_file(&path, &json)?;

    let path = std::path::absolute(&path).unwrap_or(path);
    info!(path = %path.display(), "Wrote node config file");
    Ok(NodeConfigOutcome::Created(path))
}
