//! End-to-end rewrites of a recorded agent run

use simrec_config::SimrecConfig;
use simrec_core::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RECORDING: &str = include_str!("fixtures/PECatalogZero.scala");
const REPORT_BODY: &str = include_str!("fixtures/PECatalogZero_0005_request.txt");
const CLASS: &str = "com.puppetlabs.gatling.node_simulations.PECatalogZero";

/// A runner root laid out the way the rewriter expects
struct Runner {
    root: TempDir,
    config: SimrecConfig,
}

impl Runner {
    fn new() -> Self {
        Self::with_recording(RECORDING)
    }

    fn with_recording(recording: &str) -> Self {
        let root = TempDir::new().unwrap();
        let mut config = SimrecConfig::default();
        config.paths.runner_root = root.path().to_path_buf();

        std::fs::create_dir_all(config.paths.simulation_dir()).unwrap();
        std::fs::create_dir_all(config.paths.bodies_dir()).unwrap();
        std::fs::write(
            config.paths.simulation_dir().join("PECatalogZero.scala"),
            recording,
        )
        .unwrap();
        std::fs::write(
            config.paths.bodies_dir().join("PECatalogZero_0005_request.txt"),
            REPORT_BODY,
        )
        .unwrap();

        Self { root, config }
    }

    fn recording(&self) -> PathBuf {
        self.config.paths.simulation_dir().join("PECatalogZero.scala")
    }

    fn body(&self) -> PathBuf {
        self.config
            .paths
            .bodies_dir()
            .join("PECatalogZero_0005_request.txt")
    }

    fn pipeline(&self) -> RecordingPipeline {
        RecordingPipeline::new(self.config.clone()).unwrap()
    }

    fn run(&self, prompter: &mut dyn Prompter) -> RecordingResult<RewriteReport> {
        self.pipeline().run(&self.recording(), prompter)
    }
}

fn with_suffix(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.new", path.display()))
}

#[test]
fn test_full_rewrite() {
    let runner = Runner::new();
    let mut prompter = ScriptedPrompter::defaults();

    let report = runner.run(&mut prompter).unwrap();

    assert_eq!(report.output_path, with_suffix(&runner.recording()));
    assert_eq!(report.simulation_class, CLASS);
    assert_eq!(report.certname, "agent01.example.com");
    assert_eq!(report.relabelled, 6);
    assert_eq!(report.headers.len(), 3);
    assert_eq!(report.headers.get("User-Agent"), Some("Ruby"));

    let text = std::fs::read_to_string(&report.output_path).unwrap();

    // Declarations
    assert!(text.starts_with(
        "package com.puppetlabs.gatling.node_simulations\n\
import com.puppetlabs.gatling.runner.SimulationWithScenario\n\
import org.joda.time.LocalDateTime\n\
import org.joda.time.format.ISODateTimeFormat\n\
import java.util.UUID\n"
    ));
    assert!(text.contains("// import io.gatling.jdbc.Predef._\n"));
    assert!(text.contains("class PECatalogZero extends SimulationWithScenario {"));

    // Protocol block and headers
    assert!(text.contains("// \tval httpProtocol = http\n"));
    assert!(text.contains("// \t\t.userAgentHeader(\"Ruby\")\n"));
    assert!(text.contains(
        "\tval reportBody = ElFileBody(\"PECatalogZero_0005_request.txt\")\n\n\tval baseHeaders = Map(\"Accept\" -> "
    ));
    assert!(text.contains("val headers_0 = baseHeaders ++ Map(\"X-Puppet-Version\""));
    assert!(text.contains(
        "val headers_5 = baseHeaders ++ Map(\n\t\t\"Connection\" -> \"close\",\n\t\t\"Content-Type\" -> \"text/pson\","
    ));

    // Cleanup
    assert!(text.contains("// val uri1 = \"https://puppet.example.com:8140/puppet/v3\""));
    assert!(text.contains("%22expiration%22%3A%222125-06-01T10"));
    assert!(text.contains("// setUp(scn.inject(atOnceUsers(1))).protocols(httpProtocol)"));

    // Labels
    for label in [
        "node",
        "filemeta pluginfacts",
        "filemeta plugins",
        "catalog",
        "filemeta",
        "report",
    ] {
        assert!(
            text.contains(&format!(".exec(http(\"{}\")", label)),
            "missing label {}",
            label
        );
    }
    assert!(!text.contains("request_"));

    // Report
    assert!(text.contains("session.set(\"reportTimestamp\""));
    assert!(text.contains("\t\t})\n\t\t.exec(http(\"report\")\n"));
    assert!(text.contains(".body(reportBody))\n\n"));
    assert!(!text.contains("RawFileBody"));

    // Identity
    assert!(!text.contains("agent01.example.com"));
    assert!(text.contains("/puppet/v3/node/${node}?environment=production"));

    let body = std::fs::read_to_string(&report.body_output_path).unwrap();
    assert_eq!(report.body_output_path, with_suffix(&runner.body()));
    assert!(body.starts_with(
        r#"{"host":"${node}","time":"${reportTimestamp}","configuration_version":1496336412,"transaction_uuid":"${transactionUuid}""#
    ));
    assert!(body.contains(r#""time":"2017-06-01T10:00:13.000000000-07:00""#));

    // Inputs are left alone
    assert_eq!(std::fs::read_to_string(runner.recording()).unwrap(), RECORDING);
    assert_eq!(std::fs::read_to_string(runner.body()).unwrap(), REPORT_BODY);

    // Node config generated from defaults
    let path = match &report.node_config {
        NodeConfigOutcome::Created(path) => path.clone(),
        other => panic!("unexpected node config outcome: {:?}", other),
    };
    assert!(path.ends_with("config/nodes/PECatalogZero.json"));
    let config: NodeConfig = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(config.simulation_class, CLASS);
    assert_eq!(config.certname_prefix, "agent");
    assert!(config.classes.is_empty());
}

#[test]
fn test_prepare_is_repeatable() {
    let runner = Runner::new();
    let pipeline = runner.pipeline();

    let first = pipeline.prepare(&runner.recording()).unwrap();
    let second = pipeline.prepare(&runner.recording()).unwrap();

    assert_eq!(first.certname, second.certname);
    assert_eq!(first.report, second.report);
    assert_eq!(first.report.headers_var, "headers_5");
    assert!(first.report.body_path.is_file());
    assert!(first.document.as_str().ends_with("}\n"));
}

#[test]
fn test_transform_writes_nothing() {
    let runner = Runner::new();
    let pipeline = runner.pipeline();

    let prepared = pipeline.prepare(&runner.recording()).unwrap();
    let transformed = pipeline.transform(&prepared).unwrap();

    assert_eq!(transformed.relabelled, 6);
    assert!(!with_suffix(&runner.recording()).exists());
    assert!(!with_suffix(&runner.body()).exists());
}

#[test]
fn test_existing_node_config_is_reused() {
    let runner = Runner::new();
    let nodes = runner.config.paths.node_configs_dir();
    std::fs::create_dir_all(nodes.join("pe")).unwrap();
    std::fs::write(
        nodes.join("pe").join("catalog-zero.json"),
        format!(
            "{{\n  \"simulation_class\": \"{}\",\n  \"certname_prefix\": \"pe\",\n  \"classes\": []\n}}\n",
            CLASS
        ),
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::defaults();
    let report = runner.run(&mut prompter).unwrap();

    assert!(matches!(report.node_config, NodeConfigOutcome::Existing(_)));
    assert!(report.node_config.path().ends_with("pe/catalog-zero.json"));
    assert!(prompter.asked().is_empty());
    assert!(!nodes.join("PECatalogZero.json").exists());
}

#[test]
fn test_node_config_answers() {
    let runner = Runner::new();
    let mut prompter = ScriptedPrompter::new(["", "pe-agent", "role::puppet_agent"]);

    let report = runner.run(&mut prompter).unwrap();

    let config: NodeConfig =
        serde_json::from_str(&std::fs::read_to_string(report.node_config.path()).unwrap())
            .unwrap();
    assert_eq!(config.certname_prefix, "pe-agent");
    assert_eq!(config.classes, vec!["role::puppet_agent"]);
}

#[test]
fn test_existing_default_node_config_file_is_fatal() {
    let runner = Runner::new();
    let nodes = runner.config.paths.node_configs_dir();
    std::fs::create_dir_all(&nodes).unwrap();
    std::fs::write(nodes.join("PECatalogZero.json"), "{}").unwrap();

    let mut prompter = ScriptedPrompter::defaults();
    let err = runner.run(&mut prompter).unwrap_err();

    assert!(matches!(err, RecordingError::NodeConfigExists { .. }));
    assert_eq!(std::fs::read_to_string(nodes.join("PECatalogZero.json")).unwrap(), "{}");
}

#[test]
fn test_recording_outside_simulation_dir() {
    let runner = Runner::new();
    let stray = runner.root.path().join("PECatalogZero.scala");
    std::fs::write(&stray, RECORDING).unwrap();

    let mut prompter = ScriptedPrompter::defaults();
    let err = runner
        .pipeline()
        .run(&stray, &mut prompter)
        .unwrap_err();

    assert!(matches!(err, RecordingError::OutsideSimulationDir { .. }));
    assert!(err.to_string().contains("Simulation recording must be placed in this directory"));
    assert!(!with_suffix(&stray).exists());
}

#[test]
fn test_missing_report_body() {
    let runner = Runner::new();
    std::fs::remove_file(runner.body()).unwrap();

    let mut prompter = ScriptedPrompter::defaults();
    let err = runner.run(&mut prompter).unwrap_err();
    assert!(matches!(err, RecordingError::MissingReportBody { .. }));
}

#[test]
fn test_inferred_resources_write_nothing() {
    let recording = RECORDING.replace(
        "\t\t.userAgentHeader(\"Ruby\")\n",
        "\t\t.userAgentHeader(\"Ruby\")\n\t\t.inferHtmlResources()\n",
    );
    let runner = Runner::with_recording(&recording);

    let mut prompter = ScriptedPrompter::defaults();
    let err = runner.run(&mut prompter).unwrap_err();

    assert!(matches!(err, RecordingError::InferredResources));
    assert!(!with_suffix(&runner.recording()).exists());
    assert!(!runner.config.paths.node_configs_dir().exists());
}

#[test]
fn test_unlabeled_request_is_fatal() {
    let recording = RECORDING.replace(
        "\t\t.pause(3)\n",
        "\t\t.exec(http(\"request_9\")\n\t\t\t.get(\"/favicon.ico\"))\n\t\t.pause(3)\n",
    );
    let runner = Runner::with_recording(&recording);

    let mut prompter = ScriptedPrompter::defaults();
    let err = runner.run(&mut prompter).unwrap_err();

    match err {
        RecordingError::UnlabeledRequest { line } => assert!(line.contains("request_9")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!with_suffix(&runner.recording()).exists());
}

#[test]
fn test_configured_rewrite_constants() {
    let mut runner = Runner::new();
    runner.config.rewrite.expiration_year = "2099".to_string();
    runner.config.rewrite.node_placeholder = "${certname}".to_string();

    let pipeline = runner.pipeline();
    let prepared = pipeline.prepare(&runner.recording()).unwrap();
    let transformed = pipeline.transform(&prepared).unwrap();

    let text = transformed.document.as_str();
    assert!(text.contains("%22expiration%22%3A%222099-06-01"));
    assert!(text.contains("/puppet/v3/node/${certname}?environment"));
    assert!(transformed.report_body.contains(r#""host":"${certname}""#));
}

#[test]
fn test_uppercase_rest_verbs_in_config() {
    let mut runner = Runner::new();
    runner.config.rewrite.rest_verbs = vec!["GET".into(), "POST".into(), "PUT".into()];
    assert!(runner.config.validate_all().is_ok());

    let pipeline = runner.pipeline();
    let prepared = pipeline.prepare(&runner.recording()).unwrap();
    let transformed = pipeline.transform(&prepared).unwrap();

    assert_eq!(transformed.relabelled, 6);
    assert!(!transformed.document.as_str().contains("request_"));
}
