//! Insertion-ordered header collection

use serde::Serialize;

/// Headers captured from a recording's `httpProtocol` block.
///
/// Iteration follows first insertion; inserting an existing name replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Render as a Scala `Map(...)` literal, one pair per line after the first
    pub fn to_scala_map(&self) -> String {
        let pairs: Vec<String> = self
            .iter()
            .map(|(name, value)| format!("\"{}\" -> \"{}\"", name, value))
            .collect();
        format!("Map({})", pairs.join(",\n\t\t"))
    }
}
