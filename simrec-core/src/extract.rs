//! Values pulled out of a recording before it is rewritten

use crate::error::{RecordingError, RecordingResult};
use crate::terminology::TerminologyResolver;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The recorded report submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequestInfo {
    /// Variable holding the report request headers, e.g. `headers_12`
    pub headers_var: String,
    /// Body file name relative to the bodies directory
    pub body_file: String,
    /// Resolved location of the body file
    pub body_path: PathBuf,
    /// Label the report request receives once requests are named
    pub label: String,
}

fn compile(source: String) -> RecordingResult<Regex> {
    Regex::new(&source).map_err(|err| RecordingError::InvalidPattern {
        pattern: source,
        source: err,
    })
}

/// Locate the report PUT, its header variable and its body file.
///
/// The body file must exist under `bodies_dir`.
pub fn find_report_request_info(
    text: &str,
    rest_prefix: &str,
    bodies_dir: &Path,
    resolver: &TerminologyResolver,
) -> RecordingResult<ReportRequestInfo> {
    let pattern = compile(format!(
        r#"\n\s*(\.put\("{}/report[^"]+"\))\s*\n\s*\.headers\(([^\)]+)\)\s*\n\s*\.body\(RawFileBody\("([^"]+)"\)\)\)\s*\n"#,
        regex::escape(rest_prefix)
    ))?;

    let captures = pattern
        .captures(text)
        .ok_or(RecordingError::MissingReportRequest)?;

    let put_call = &captures[1];
    let headers_var = captures[2].to_string();
    let body_file = captures[3].to_string();

    let label = resolver
        .resolve(put_call)
        .ok_or_else(|| RecordingError::UnrecognizedRequest {
            line: put_call.to_string(),
        })?
        .to_string();

    let joined = bodies_dir.join(&body_file);
    let body_path = std::path::absolute(&joined).unwrap_or(joined);
    if !body_path.is_file() {
        return Err(RecordingError::MissingReportBody { path: body_path });
    }

    debug!(
        headers_var = %headers_var,
        body_path = %body_path.display(),
        "Found report request"
    );

    Ok(ReportRequestInfo {
        headers_var,
        body_file,
        body_path,
        label,
    })
}

/// Certname of the recorded node, taken from the node lookup request
pub fn find_certname(text: &str, rest_prefix: &str) -> RecordingResult<String> {
    let pattern = compile(format!(
        r#"\n\s*\.get\("{}/node/([^\?]+)\?environment"#,
        regex::escape(rest_prefix)
    ))?;

    let certname = pattern
        .captures(text)
        .map(|captures| captures[1].to_string())
        .ok_or(RecordingError::MissingCertname)?;

    debug!(certname = %certname, "Found certname");
    Ok(certname)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simrec_config::TablesConfig;

    const RECORDING: &str = r#"
	val scn = scenario("Recording")
		.exec(http("request_0")
			.get("/puppet/v3/node/agent01.example.com?environment=production&transaction_uuid=abc")
			.headers(headers_0))
		.exec(http("request_1")
			.put("/puppet/v3/report/agent01.example.com?environment=production&")
			.headers(headers_1)
			.body(RawFileBody("Recording_0001_request.txt")))
"#;

    fn resolver() -> TerminologyResolver {
        TerminologyResolver::new("/puppet/v3", &TablesConfig::default().terminology).unwrap()
    }

    #[test]
    fn test_find_report_request_info() {
        let bodies = tempfile::tempdir().unwrap();
        std::fs::write(bodies.path().join("Recording_0001_request.txt"), "{}").unwrap();

        let info =
            find_report_request_info(RECORDING, "/puppet/v3", bodies.path(), &resolver()).unwrap();
        assert_eq!(info.headers_var, "headers_1");
        assert_eq!(info.body_file, "Recording_0001_request.txt");
        assert_eq!(info.label, "report");
        assert!(info.body_path.is_file());

        // Same input, same answer
        let again =
            find_report_request_info(RECORDING, "/puppet/v3", bodies.path(), &resolver()).unwrap();
        assert_eq!(info, again);
    }

    #[test]
    fn test_missing_body_file() {
        let bodies = tempfile::tempdir().unwrap();
        let err = find_report_request_info(RECORDING, "/puppet/v3", bodies.path(), &resolver())
            .unwrap_err();
        match err {
            RecordingError::MissingReportBody { path } => {
                assert!(path.ends_with("Recording_0001_request.txt"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_report_request() {
        let bodies = tempfile::tempdir().unwrap();
        let text = RECORDING.replace(".put(", ".post(");
        let err =
            find_report_request_info(&text, "/puppet/v3", bodies.path(), &resolver()).unwrap_err();
        assert!(matches!(err, RecordingError::MissingReportRequest));
    }

    #[test]
    fn test_find_certname() {
        assert_eq!(
            find_certname(RECORDING, "/puppet/v3").unwrap(),
            "agent01.example.com"
        );
        assert_eq!(
            find_certname(RECORDING, "/puppet/v3").unwrap(),
            find_certname(RECORDING, "/puppet/v3").unwrap()
        );
    }

    #[test]
    fn test_missing_certname() {
        let err = find_certname(RECORDING, "/puppet/v4").unwrap_err();
        assert!(matches!(err, RecordingError::MissingCertname));
    }
}
