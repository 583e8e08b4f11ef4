//! Report request rewrites (stages 9 and 14)

use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use crate::extract::ReportRequestInfo;
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

static COMMENTED_HTTP_PROTOCOL_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(//\s*val httpProtocol.*?)\n\n").expect("Valid regex pattern")
});

static REPORT_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""time":"[^"]+""#).expect("Valid regex pattern"));

static TRANSACTION_UUID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""transaction_uuid":"[^"]+""#).expect("Valid regex pattern"));

const SESSION_VARIABLES: &str = "\n\
\t\t.exec((session:Session) => {\n\
\t\t\tsession.set(\"reportTimestamp\",\n\
\t\t\t\tLocalDateTime.now.toString(ISODateTimeFormat.dateTime()))\n\
\t\t})\n\
\t\t.exec((session:Session) => {\n\
\t\t\tsession.set(\"transactionUuid\",\n\
\t\t\t\tUUID.randomUUID().toString())\n\
\t\t})\n";

fn compile(source: String) -> RecordingResult<Regex> {
    Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source,
        source: err,
    })
}

/// Make the report request close its connection
pub fn add_connection_close(doc: &mut RecordingDocument, headers_var: &str) -> RecordingResult<()> {
    let pattern = compile(format!(
        r"(\s*val {} =.*Map\()",
        regex::escape(headers_var)
    ))?;

    let changed = doc.replace_all(&pattern, |caps: &Captures| {
        format!("{}\n\t\t\"Connection\" -> \"close\",", &caps[1])
    });
    if !changed {
        return Err(RecordingError::MissingReportHeaders {
            variable: headers_var.to_string(),
        });
    }
    Ok(())
}

/// Send a fresh timestamp and transaction UUID with every report.
///
/// The body file becomes an `ElFileBody` template whose `time` and
/// `transaction_uuid` fields read the session values set just before the
/// report request runs.
pub fn add_dynamic_report_values(
    doc: &mut RecordingDocument,
    report_body: &mut String,
    info: &ReportRequestInfo,
) -> RecordingResult<()> {
    let body_declaration = format!("\n\n\tval reportBody = ElFileBody(\"{}\")", info.body_file);
    doc.replace_all(&COMMENTED_HTTP_PROTOCOL_BLOCK, |caps: &Captures| {
        format!("{}{}\n\n", &caps[1], body_declaration)
    });

    let report_exec = compile(format!(
        r#"\n(\s*\.exec\(http\("{}"\)\s*\n)"#,
        regex::escape(&info.label)
    ))?;
    doc.replace_all(&report_exec, |caps: &Captures| {
        format!("{}{}", SESSION_VARIABLES, &caps[1])
    });

    let raw_body = compile(format!(
        r#"(\n\s*)\.body\(RawFileBody\("{}"\)\)\)\n"#,
        regex::escape(&info.body_file)
    ))?;
    doc.replace_all(&raw_body, "${1}.body(reportBody))\n\n");

    let with_time = REPORT_TIME
        .replacen(report_body, 1, NoExpand(r#""time":"${reportTimestamp}""#))
        .into_owned();
    *report_body = TRANSACTION_UUID
        .replace_all(&with_time, NoExpand(r#""transaction_uuid":"${transactionUuid}""#))
        .into_owned();

    Ok(())
}
