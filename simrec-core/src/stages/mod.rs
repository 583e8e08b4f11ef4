//! The ordered rewrite stages
//!
//! Each stage is a plain function over a [`RecordingDocument`](crate::RecordingDocument).
//! They only comment out or substitute text, so a document that compiled before
//! a stage still compiles after it. Order matters: later stages match text that
//! earlier stages produce (stage 14 looks for the commented-out protocol block
//! written by stage 8, and for the `report` label assigned by stage 13).

pub mod cleanup;
pub mod header;
pub mod identity;
pub mod labels;
pub mod protocol;
pub mod report;

use std::fmt;

pub use cleanup::{comment_out_setup, comment_out_uri_variable, update_expiration};
pub use header::{
    comment_out_import, insert_imports, reject_inferred_resources, rename_package,
    replace_base_class,
};
pub use identity::parameterize_node;
pub use labels::label_requests;
pub use protocol::{comment_out_http_protocol, extract_protocol_headers, merge_base_headers};
pub use report::{add_connection_close, add_dynamic_report_values};

/// Rewrite stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InferredResources,
    RenamePackage,
    InsertImports,
    CommentOutUnusedImport,
    ReplaceBaseClass,
    ExtractProtocolHeaders,
    MergeBaseHeaders,
    CommentOutHttpProtocol,
    ConnectionClose,
    CommentOutUriVariable,
    UpdateExpiration,
    CommentOutSetUp,
    LabelRequests,
    DynamicReportValues,
    ParameterizeNode,
}

impl Stage {
    pub const ALL: [Stage; 15] = [
        Stage::InferredResources,
        Stage::RenamePackage,
        Stage::InsertImports,
        Stage::CommentOutUnusedImport,
        Stage::ReplaceBaseClass,
        Stage::ExtractProtocolHeaders,
        Stage::MergeBaseHeaders,
        Stage::CommentOutHttpProtocol,
        Stage::ConnectionClose,
        Stage::CommentOutUriVariable,
        Stage::UpdateExpiration,
        Stage::CommentOutSetUp,
        Stage::LabelRequests,
        Stage::DynamicReportValues,
        Stage::ParameterizeNode,
    ];

    /// One-based position in the pipeline
    pub fn number(self) -> usize {
        Stage::ALL
            .iter()
            .position(|stage| *stage == self)
            .map_or(0, |index| index + 1)
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::InferredResources => "Look for inferred HTML resources",
            Stage::RenamePackage => "Rename package",
            Stage::InsertImports => "Add import statements",
            Stage::CommentOutUnusedImport => "Comment out unused JDBC import",
            Stage::ReplaceBaseClass => "Replace simulation base class",
            Stage::ExtractProtocolHeaders => "Extract common headers from httpProtocol",
            Stage::MergeBaseHeaders => "Merge request headers with common headers",
            Stage::CommentOutHttpProtocol => "Comment out httpProtocol block",
            Stage::ConnectionClose => "Add 'Connection: close' to report request",
            Stage::CommentOutUriVariable => "Comment out URI variable",
            Stage::UpdateExpiration => "Update facts expiration date",
            Stage::CommentOutSetUp => "Comment out setUp call",
            Stage::LabelRequests => "Name HTTP requests",
            Stage::DynamicReportValues => "Use dynamic timestamp and transaction UUID",
            Stage::ParameterizeNode => "Set up node feeder variable",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STEP {}: {}", self.number(), self.description())
    }
}

/// Prefix a line with a Scala line comment
pub fn comment_line(line: &str) -> String {
    format!("// {}", line)
}
