//! httpProtocol block handling (stages 6 to 8)

use super::comment_line;
use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use crate::headers::HeaderMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use simrec_config::TablesConfig;
use tracing::debug;

static HELPER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\.(?P<helper>[^(]+)\("(?P<value>[^"]+)"\)"#).expect("Valid regex pattern")
});

// The block runs up to the first blank line
static HTTP_PROTOCOL_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(val httpProtocol.*?)\n\n").expect("Valid regex pattern"));

static HEADERS_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(val headers_\d+ = )").expect("Valid regex pattern"));

fn is_http_protocol_line(line: &str) -> bool {
    line.contains("val httpProtocol")
}

/// Collect the headers set by helper calls chained onto `val httpProtocol`.
///
/// Reading stops at the first line that is not a `.helper("value")` call.
/// Helpers missing from the table are skipped.
pub fn extract_protocol_headers(
    doc: &RecordingDocument,
    tables: &TablesConfig,
) -> RecordingResult<HeaderMap> {
    let mut lines = doc
        .lines()
        .skip_while(|line| !is_http_protocol_line(line));

    if lines.next().is_none() {
        return Err(RecordingError::MissingHttpProtocol);
    }

    let mut headers = HeaderMap::new();
    for line in lines {
        let Some(captures) = HELPER_CALL.captures(line) else {
            break;
        };

        match tables.header_for_helper(&captures["helper"]) {
            Some(header) => headers.insert(header, &captures["value"]),
            None => debug!(helper = &captures["helper"], "Skipping protocol helper"),
        }
    }

    Ok(headers)
}

/// Declare `baseHeaders` after the protocol block and merge it into every
/// `headers_N` map
pub fn merge_base_headers(doc: &mut RecordingDocument, headers: &HeaderMap) {
    let declaration = format!("\n\n\tval baseHeaders = {}", headers.to_scala_map());
    doc.replace_all(&HTTP_PROTOCOL_BLOCK, |caps: &Captures| {
        format!("{}{}\n\n", &caps[1], declaration)
    });
    doc.replace_all(&HEADERS_VARIABLE, "${1}baseHeaders ++ ");
}

/// Comment out from the `val httpProtocol` line to the first empty line
pub fn comment_out_http_protocol(doc: &mut RecordingDocument) {
    let mut in_block = false;
    let mut finished = false;
    doc.map_lines(|line| {
        if !finished && is_http_protocol_line(line) {
            in_block = true;
        }
        if in_block && line.trim_end_matches(['\r', '\n']).is_empty() {
            in_block = false;
            finished = true;
        }
        if in_block {
            comment_line(line)
        } else {
            line.to_string()
        }
    });
}
