//! Canonical names for agent REST requests
//!
//! The recorder names every request `request_N`. The resolver maps the URL a
//! request hits onto a short label such as `catalog` or `filemeta plugins`.
//! Entries are tried in order and the first match wins, so a table must list
//! specific fragments before the general ones they overlap with.

use crate::error::{RecordingError, RecordingResult};
use regex::Regex;
use simrec_config::TerminologyEntry;

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    label: String,
}

/// Compiled terminology table
#[derive(Debug, Clone)]
pub struct TerminologyResolver {
    rules: Vec<Rule>,
}

impl TerminologyResolver {
    /// Compile `entries` against a REST prefix such as `/puppet/v3`
    pub fn new(rest_prefix: &str, entries: &[TerminologyEntry]) -> RecordingResult<Self> {
        let prefix = regex::escape(rest_prefix);
        let rules = entries
            .iter()
            .map(|entry| {
                let source = format!("{}/(?:{})", prefix, entry.fragment);
                let pattern = Regex::new(&source).map_err(|source_err| {
                    RecordingError::InvalidPattern {
                        pattern: entry.fragment.clone(),
                        source: source_err,
                    }
                })?;
                Ok(Rule {
                    pattern,
                    label: entry.label.clone(),
                })
            })
            .collect::<RecordingResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Label of the first entry matching anywhere in `line`
    pub fn resolve(&self, line: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(line))
            .map(|rule| rule.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
