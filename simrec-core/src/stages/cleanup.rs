//! Recorder leftovers the runner replaces (stages 10 to 12)

use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EXPIRATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(expiration%22%3A%22)(\d{4})").expect("Valid regex pattern"));

static SET_UP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(setUp\(.*\))").expect("Valid regex pattern"));

/// Comment out the recorder's base URI variable
pub fn comment_out_uri_variable(doc: &mut RecordingDocument, variable: &str) -> RecordingResult<()> {
    let source = format!(r#"(?m)^[ \t]*(val {} = ".*")"#, regex::escape(variable));
    let pattern = Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source.clone(),
        source: err,
    })?;
    doc.replace_all(&pattern, "// ${1}");
    Ok(())
}

/// Push recorded fact expiration timestamps out to `year`
pub fn update_expiration(doc: &mut RecordingDocument, year: &str) {
    doc.replace_all(&EXPIRATION, |caps: &Captures| format!("{}{}", &caps[1], year));
}

/// The runner drives the scenario itself
pub fn comment_out_setup(doc: &mut RecordingDocument) {
    doc.replace_all(&SET_UP, "// ${1}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_out_uri_variable() {
        let mut doc = RecordingDocument::from_text(
            "\tval uri1 = \"https://puppet.example.com:8140/puppet/v3\"\n\tval uri10 = \"x\"\n",
        );
        comment_out_uri_variable(&mut doc, "uri1").unwrap();
        assert_eq!(
            doc.as_str(),
            "// val uri1 = \"https://puppet.example.com:8140/puppet/v3\"\n\tval uri10 = \"x\"\n"
        );
    }

    #[test]
    fn test_update_expiration() {
        let mut doc = RecordingDocument::from_text(
            ".put(\"/puppet/v3/facts/agent01?facts=%7B%22expiration%22%3A%222017-06-01T10%3A00\")\n",
        );
        update_expiration(&mut doc, "2125");
        assert!(doc.as_str().contains("%22expiration%22%3A%222125-06-01T10%3A00"));
    }

    #[test]
    fn test_comment_out_setup() {
        let mut doc =
            RecordingDocument::from_text("\tsetUp(scn.inject(atOnceUsers(1))).protocols(httpProtocol)\n}\n");
        comment_out_setup(&mut doc);
        assert_eq!(
            doc.as_str(),
            "// setUp(scn.inject(atOnceUsers(1))).protocols(httpProtocol)\n}\n"
        );
    }
}
