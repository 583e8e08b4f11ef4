//! Error types for the recording rewrite pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the rewrite pipeline
pub type RecordingResult<T> = std::result::Result<T, RecordingError>;

/// Everything that can stop a rewrite. None of these are retried; the operator
/// fixes the recording (or the configuration) and runs the tool again.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The recording is not in the runner's simulation directory
    #[error(
        "Simulation recording must be placed in this directory: '{}' (specified input file is in dir '{}')",
        .expected.display(),
        .actual.display()
    )]
    OutsideSimulationDir { expected: PathBuf, actual: PathBuf },

    /// The recorder was asked to infer HTML resources
    #[error(
        "Found references to 'inferHtmlResources' and/or 'resources'. The recording was made with \
         'Infer Html resources?' checked, which makes the simulation fetch resources in parallel \
         like a browser. Re-record the scenario with that option unchecked."
    )]
    InferredResources,

    #[error("Can't find headers after httpProtocol definition")]
    MissingHttpProtocol,

    #[error("Unable to find report request in recording")]
    MissingReportRequest,

    #[error("Unable to find report request body file! Expected to find it at {}", .path.display())]
    MissingReportBody { path: PathBuf },

    #[error("Unable to find certname (from node request) in recording")]
    MissingCertname,

    #[error("Could not find report header variable ({variable})")]
    MissingReportHeaders { variable: String },

    /// A REST call matched none of the terminology fragments
    #[error("Unrecognized request type, add it to the terminology table. Line: '{line}'")]
    UnrecognizedRequest { line: String },

    /// A generic `request_N` execution has no REST call to name it after
    #[error("Unexpected http request. Line: '{line}' needs some work")]
    UnlabeledRequest { line: String },

    /// A REST call appeared with no generic execution waiting for a label
    #[error("REST call without a preceding request execution. Line: '{line}'")]
    OrphanRestCall { line: String },

    #[error("Node config file already exists at path '{}'", .path.display())]
    NodeConfigExists { path: PathBuf },

    /// Input ended while a question was waiting for an answer
    #[error("Prompt input closed before an answer was given")]
    PromptClosed,

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordingError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordingError::Io {
            path: path.into(),
            source,
        }
    }
}
