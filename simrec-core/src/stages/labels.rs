//! Request naming (stage 13)
//!
//! Every recorded execution is called `request_N`. The first pass pairs each
//! execution with the REST call that follows it and resolves that call's
//! label; the second pass writes the labels. Nothing is rewritten unless the
//! whole recording pairs up cleanly.

use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use crate::terminology::TerminologyResolver;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use tracing::debug;

static GENERIC_EXECUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\.?exec\(http\("request_\d+"\)"#).expect("Valid regex pattern")
});

static GENERIC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"request_\d+").expect("Valid regex pattern"));

fn rest_call_pattern(rest_prefix: &str, verbs: &[String]) -> RecordingResult<Regex> {
    // Recorded calls are always lowercase; configured verbs may not be
    let verbs: Vec<String> = verbs
        .iter()
        .map(|verb| regex::escape(&verb.to_ascii_lowercase()))
        .collect();
    let source = format!(
        r#"\.({})\("{}/"#,
        verbs.join("|"),
        regex::escape(rest_prefix)
    );
    Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source.clone(),
        source: err,
    })
}

fn trimmed(line: &str) -> String {
    line.trim_end_matches(['\r', '\n']).to_string()
}

/// Pair each generic execution line with the label of its REST call
fn pair_requests(
    lines: &[&str],
    rest_call: &Regex,
    resolver: &TerminologyResolver,
) -> RecordingResult<Vec<(usize, String)>> {
    let mut pairs = Vec::new();
    let mut pending: Option<usize> = None;

    for (index, line) in lines.iter().enumerate() {
        if GENERIC_EXECUTION.is_match(line) {
            if let Some(open) = pending {
                return Err(RecordingError::UnlabeledRequest {
                    line: trimmed(lines[open]),
                });
            }
            pending = Some(index);
        }

        if !rest_call.is_match(line) {
            continue;
        }

        let Some(open) = pending.take() else {
            return Err(RecordingError::OrphanRestCall {
                line: trimmed(line),
            });
        };
        let label = resolver
            .resolve(line)
            .ok_or_else(|| RecordingError::UnrecognizedRequest {
                line: trimmed(line),
            })?;
        pairs.push((open, label.to_string()));
    }

    if let Some(open) = pending {
        return Err(RecordingError::UnlabeledRequest {
            line: trimmed(lines[open]),
        });
    }

    Ok(pairs)
}

/// Name every `request_N` after the endpoint it calls.
///
/// Returns the number of renamed executions.
pub fn label_requests(
    doc: &mut RecordingDocument,
    resolver: &TerminologyResolver,
    rest_prefix: &str,
    verbs: &[String],
) -> RecordingResult<usize> {
    let rest_call = rest_call_pattern(rest_prefix, verbs)?;
    let lines: Vec<&str> = doc.lines().collect();
    let labels: HashMap<usize, String> = pair_requests(&lines, &rest_call, resolver)?
        .into_iter()
        .collect();

    let text: String = lines
        .iter()
        .enumerate()
        .map(|(index, line)| match labels.get(&index) {
            Some(label) => {
                debug!(label = %label, "Naming request");
                GENERIC_NAME
                    .replacen(line, 1, NoExpand(label.as_str()))
                    .into_owned()
            }
            None => line.to_string(),
        })
        .collect();

    doc.set_text(text);
    Ok(labels.len())
}
