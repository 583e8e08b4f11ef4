//! The recording text being rewritten

use crate::error::{RecordingError, RecordingResult};
use regex::{Regex, Replacer};
use std::borrow::Cow;
use std::path::Path;

/// Full source text of one recorded simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingDocument {
    text: String,
}

impl RecordingDocument {
    /// Read a recording from disk.
    ///
    /// A newline is appended because recorder output usually lacks a trailing
    /// one and several rewrites anchor on `\n`.
    pub fn load(path: impl AsRef<Path>) -> RecordingResult<Self> {
        let path = path.as_ref();
        let mut text =
            std::fs::read_to_string(path).map_err(|err| RecordingError::io(path, err))?;
        text.push('\n');
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Lines including their terminators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_inclusive('\n')
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Replace every match of `pattern`; returns whether anything changed
    pub fn replace_all<R: Replacer>(&mut self, pattern: &Regex, replacement: R) -> bool {
        self.replacen(pattern, 0, replacement)
    }

    /// Replace the first `limit` matches (`0` means all)
    pub fn replacen<R: Replacer>(&mut self, pattern: &Regex, limit: usize, replacement: R) -> bool {
        let updated = match pattern.replacen(&self.text, limit, replacement) {
            Cow::Owned(updated) => updated,
            Cow::Borrowed(_) => return false,
        };
        self.text = updated;
        true
    }

    /// Rebuild the text line by line
    pub fn map_lines<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        let updated: String = self.lines().map(&mut f).collect();
        self.text = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_appends_newline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"class A extends Simulation {}").unwrap();

        let doc = RecordingDocument::load(file.path()).unwrap();
        assert_eq!(doc.as_str(), "class A extends Simulation {}\n");
    }

    #[test]
    fn test_load_missing_file() {
        let err = RecordingDocument::load("/no/such/Recording.scala").unwrap_err();
        assert!(matches!(err, RecordingError::Io { .. }));
    }

    #[test]
    fn test_replace_reports_change() {
        let mut doc = RecordingDocument::from_text("a1 b2 c3\n");
        let digits = Regex::new(r"\d").unwrap();
        assert!(doc.replacen(&digits, 1, "#"));
        assert_eq!(doc.as_str(), "a# b2 c3\n");
        assert!(doc.replace_all(&digits, "#"));
        assert_eq!(doc.as_str(), "a# b# c#\n");
        assert!(!doc.replace_all(&digits, "#"));
    }

    #[test]
    fn test_lines_keep_terminators() {
        let doc = RecordingDocument::from_text("one\ntwo\n\nthree");
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines, vec!["one\n", "two\n", "\n", "three"]);
    }
}
