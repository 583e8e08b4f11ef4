//! Recording rewrite engine for simrec
//!
//! Turns a proxy-recorder capture of a Puppet agent run into a simulation the
//! runner can replay for many nodes: requests get meaningful names, shared
//! headers are factored out, the report carries a live timestamp and UUID, and
//! the recorded certname becomes a feeder variable.

pub mod document;
pub mod error;
pub mod extract;
pub mod headers;
pub mod node_config;
pub mod pipeline;
pub mod prompt;
pub mod stages;
pub mod terminology;

// Re-export commonly used types at the crate root
pub use document::RecordingDocument;
pub use error::{RecordingError, RecordingResult};
pub use extract::ReportRequestInfo;
pub use headers::HeaderMap;
pub use node_config::{NodeConfig, NodeConfigOutcome};
pub use pipeline::{PreparedRecording, RecordingPipeline, RewriteReport, TransformedRecording};
pub use prompt::{LinePrompter, Prompter, ScriptedPrompter};
pub use stages::Stage;
pub use terminology::TerminologyResolver;
