//! Drives one recording through every rewrite stage

use crate::document::RecordingDocument;
use crate::error::{RecordingError, RecordingResult};
use crate::extract::{find_certname, find_report_request_info, ReportRequestInfo};
use crate::headers::HeaderMap;
use crate::node_config::{ensure_node_config, NodeConfigOutcome};
use crate::prompt::Prompter;
use crate::stages::{self, Stage};
use crate::terminology::TerminologyResolver;
use serde::Serialize;
use simrec_config::SimrecConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A recording with everything located that the stages need
#[derive(Debug, Clone)]
pub struct PreparedRecording {
    pub path: PathBuf,
    pub document: RecordingDocument,
    pub report: ReportRequestInfo,
    pub report_body: String,
    pub certname: String,
    pub simulation_class: String,
}

/// Stage output, not yet written anywhere
#[derive(Debug, Clone)]
pub struct TransformedRecording {
    pub document: RecordingDocument,
    pub report_body: String,
    pub headers: HeaderMap,
    pub relabelled: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    pub output_path: PathBuf,
    pub body_output_path: PathBuf,
    pub simulation_class: String,
    pub certname: String,
    pub relabelled: usize,
    pub headers: HeaderMap,
    pub node_config: NodeConfigOutcome,
}

/// Path of the rewritten copy of `path`
pub fn new_file_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".new");
    PathBuf::from(name)
}

fn write_file(path: &Path, contents: &str) -> RecordingResult<()> {
    std::fs::write(path, contents).map_err(|err| RecordingError::io(path, err))
}

fn log_stage(stage: Stage) {
    info!(stage = stage.number(), "{}", stage.description());
}

/// Rewrites recordings according to a [`SimrecConfig`]
pub struct RecordingPipeline {
    config: SimrecConfig,
    resolver: TerminologyResolver,
}

impl RecordingPipeline {
    pub fn new(config: SimrecConfig) -> RecordingResult<Self> {
        let resolver =
            TerminologyResolver::new(&config.rewrite.rest_prefix, &config.tables.terminology)?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &SimrecConfig {
        &self.config
    }

    /// Recordings are only accepted from the runner's simulation directory
    pub fn validate_location(&self, recording: &Path) -> RecordingResult<()> {
        let expected_dir = self.config.paths.simulation_dir();
        let expected = expected_dir
            .canonicalize()
            .map_err(|err| RecordingError::io(&expected_dir, err))?;

        let parent = match recording.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let actual = parent
            .canonicalize()
            .map_err(|err| RecordingError::io(&parent, err))?;

        if actual != expected {
            return Err(RecordingError::OutsideSimulationDir { expected, actual });
        }
        Ok(())
    }

    /// Load the recording and locate the report request, its body and the certname
    pub fn prepare(&self, recording: &Path) -> RecordingResult<PreparedRecording> {
        info!(path = %recording.display(), "Reading recording");
        let document = RecordingDocument::load(recording)?;

        let report = find_report_request_info(
            document.as_str(),
            &self.config.rewrite.rest_prefix,
            &self.config.paths.bodies_dir(),
            &self.resolver,
        )?;
        info!(
            headers_var = %report.headers_var,
            body = %report.body_path.display(),
            "Found report request"
        );

        let report_body = std::fs::read_to_string(&report.body_path)
            .map_err(|err| RecordingError::io(&report.body_path, err))?;

        let certname = find_certname(document.as_str(), &self.config.rewrite.rest_prefix)?;
        info!(certname = %certname, "Found certname");

        let stem = recording
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let simulation_class = self.config.rewrite.simulation_class(&stem);

        Ok(PreparedRecording {
            path: recording.to_path_buf(),
            document,
            report,
            report_body,
            certname,
            simulation_class,
        })
    }

    /// Run the fifteen stages in order. Touches no files.
    pub fn transform(&self, prepared: &PreparedRecording) -> RecordingResult<TransformedRecording> {
        let rewrite = &self.config.rewrite;
        let mut doc = prepared.document.clone();
        let mut report_body = prepared.report_body.clone();

        log_stage(Stage::InferredResources);
        stages::reject_inferred_resources(&doc)?;

        log_stage(Stage::RenamePackage);
        stages::rename_package(&mut doc, &rewrite.target_package);

        log_stage(Stage::InsertImports);
        stages::insert_imports(&mut doc, &rewrite.target_package, &rewrite.extra_imports);

        log_stage(Stage::CommentOutUnusedImport);
        stages::comment_out_import(&mut doc, &rewrite.unused_import)?;

        log_stage(Stage::ReplaceBaseClass);
        stages::replace_base_class(&mut doc, &rewrite.base_class);

        log_stage(Stage::ExtractProtocolHeaders);
        let headers = stages::extract_protocol_headers(&doc, &self.config.tables)?;
        debug!(count = headers.len(), "Extracted protocol headers");

        log_stage(Stage::MergeBaseHeaders);
        stages::merge_base_headers(&mut doc, &headers);

        log_stage(Stage::CommentOutHttpProtocol);
        stages::comment_out_http_protocol(&mut doc);

        log_stage(Stage::ConnectionClose);
        stages::add_connection_close(&mut doc, &prepared.report.headers_var)?;

        log_stage(Stage::CommentOutUriVariable);
        stages::comment_out_uri_variable(&mut doc, &rewrite.uri_variable)?;

        log_stage(Stage::UpdateExpiration);
        stages::update_expiration(&mut doc, &rewrite.expiration_year);

        log_stage(Stage::CommentOutSetUp);
        stages::comment_out_setup(&mut doc);

        log_stage(Stage::LabelRequests);
        let relabelled = stages::label_requests(
            &mut doc,
            &self.resolver,
            &rewrite.rest_prefix,
            &rewrite.rest_verbs,
        )?;
        debug!(relabelled, "Named requests");

        log_stage(Stage::DynamicReportValues);
        stages::add_dynamic_report_values(&mut doc, &mut report_body, &prepared.report)?;

        log_stage(Stage::ParameterizeNode);
        stages::parameterize_node(
            &mut doc,
            &mut report_body,
            &prepared.certname,
            &rewrite.node_placeholder,
        );

        Ok(TransformedRecording {
            document: doc,
            report_body,
            headers,
            relabelled,
        })
    }

    /// Rewrite `recording`, write the `.new` files and make sure a node
    /// config exists for the simulation
    pub fn run(
        &self,
        recording: &Path,
        prompter: &mut dyn Prompter,
    ) -> RecordingResult<RewriteReport> {
        self.validate_location(recording)?;

        let prepared = self.prepare(recording)?;
        let transformed = self.transform(&prepared)?;

        let output_path = new_file_path(recording);
        let body_output_path = new_file_path(&prepared.report.body_path);
        info!(path = %output_path.display(), "All steps completed, writing output");
        write_file(&output_path, transformed.document.as_str())?;
        write_file(&body_output_path, &transformed.report_body)?;

        let node_config = ensure_node_config(
            &self.config.paths.node_configs_dir(),
            &prepared.simulation_class,
            &prepared.certname,
            prompter,
        )?;

        Ok(RewriteReport {
            output_path,
            body_output_path,
            simulation_class: prepared.simulation_class,
            certname: prepared.certname,
            relabelled: transformed.relabelled,
            headers: transformed.headers,
            node_config,
        })
    }
}
