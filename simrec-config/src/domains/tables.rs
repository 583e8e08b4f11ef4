//! Lookup tables consulted while rewriting
//!
//! Both tables are ordered lists rather than maps. Terminology order decides
//! which label wins when two fragments overlap, so more specific fragments must
//! come first.

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maps an `httpProtocol` helper method to the HTTP header it sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderHelper {
    pub helper: String,
    pub header: String,
}

/// Maps a URL fragment pattern to a request label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyEntry {
    /// Regular expression fragment appended to the REST prefix
    pub fragment: String,
    /// Display name given to matching requests
    pub label: String,
}

/// Lookup tables configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    #[serde(default = "default_header_helpers")]
    pub header_helpers: Vec<HeaderHelper>,

    #[serde(default = "default_terminology")]
    pub terminology: Vec<TerminologyEntry>,
}

impl TablesConfig {
    /// Header name set by a helper method, if the helper is known
    pub fn header_for_helper(&self, helper: &str) -> Option<&str> {
        self.header_helpers
            .iter()
            .find(|entry| entry.helper == helper)
            .map(|entry| entry.header.as_str())
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            header_helpers: default_header_helpers(),
            terminology: default_terminology(),
        }
    }
}

impl Validatable for TablesConfig {
    fn validate(&self) -> ConfigResult<()> {
        let mut helpers = HashSet::new();
        for entry in &self.header_helpers {
            validate_required_string(&entry.helper, "header_helpers.helper", self.domain_name())?;
            validate_required_string(&entry.header, "header_helpers.header", self.domain_name())?;
            if !helpers.insert(entry.helper.as_str()) {
                return Err(self.validation_error(format!(
                    "Duplicate header helper '{}'",
                    entry.helper
                )));
            }
        }

        if self.terminology.is_empty() {
            return Err(self.validation_error("At least one terminology entry must be configured"));
        }
        for entry in &self.terminology {
            validate_required_string(&entry.fragment, "terminology.fragment", self.domain_name())?;
            validate_required_string(&entry.label, "terminology.label", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "tables"
    }
}

fn helper(helper: &str, header: &str) -> HeaderHelper {
    HeaderHelper {
        helper: helper.to_string(),
        header: header.to_string(),
    }
}

fn term(fragment: &str, label: &str) -> TerminologyEntry {
    TerminologyEntry {
        fragment: fragment.to_string(),
        label: label.to_string(),
    }
}

fn default_header_helpers() -> Vec<HeaderHelper> {
    vec![
        helper("acceptHeader", "Accept"),
        helper("acceptEncodingHeader", "Accept-Encoding"),
        helper("userAgentHeader", "User-Agent"),
    ]
}

fn default_terminology() -> Vec<TerminologyEntry> {
    vec![
        term("catalog", "catalog"),
        term(
            "file_metadata[s]?/modules/puppet_enterprise/mcollective",
            "filemeta mco plugins",
        ),
        term("file_metadata[s]?/pluginfacts", "filemeta pluginfacts"),
        term("file_metadata[s]?/plugins", "filemeta plugins"),
        term("file_metadata[s]?/modules", "filemeta"),
        term("file_content/modules", "file content"),
        term("static_file_content/modules", "static file content"),
        term("node", "node"),
        term("report", "report"),
    ]
}
