use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use simrec_config::{ConfigLoader, LogFormat, LoggingConfig, SimrecConfig};
use simrec_core::{
    LinePrompter, NodeConfigOutcome, Prompter, RecordingPipeline, RewriteReport, ScriptedPrompter,
};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod prompt;

use cli::Cli;
use prompt::ReadlinePrompter;

/// Load configuration from file (when present) with environment overrides
fn load_config(config_path: Option<&Path>) -> Result<SimrecConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) if path.exists() => loader
            .from_file(path)
            .context(format!("Failed to load configuration from {:?}", path)),
        _ => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Pick the filter directive: `--log-level`, then `SIMREC_LOG_LEVEL`, then
/// `RUST_LOG`, then the configured level
fn log_directive(cli_level: Option<&str>, logging: &LoggingConfig) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }

    if std::env::var_os("SIMREC_LOG_LEVEL").is_none() {
        if let Ok(directive) = std::env::var(EnvFilter::DEFAULT_ENV) {
            if !directive.trim().is_empty() {
                return directive;
            }
        }
    }

    logging.level.to_string()
}

fn init_tracing(cli_level: Option<&str>, logging: &LoggingConfig) -> Result<()> {
    let directive = log_directive(cli_level, logging);
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', falling back to 'info'", directive);
        EnvFilter::new("info")
    });

    // Prompts and the summary go to stdout, so logs stay on stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(logging.include_target)
        .with_writer(std::io::stderr);

    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Tracing initialized with filter '{}'", directive);
    Ok(())
}

fn select_prompter(non_interactive: bool) -> Result<Box<dyn Prompter>> {
    if non_interactive {
        return Ok(Box::new(ScriptedPrompter::defaults()));
    }

    if std::io::stdin().is_terminal() {
        let prompter = ReadlinePrompter::new().context("Failed to open line editor")?;
        Ok(Box::new(prompter))
    } else {
        Ok(Box::new(LinePrompter::stdio()))
    }
}

fn print_summary(report: &RewriteReport) {
    println!();
    println!("{}", "✓ Rewrite completed successfully!".green().bold());
    println!("  Simulation class: {}", report.simulation_class.cyan());
    println!("  Certname:         {}", report.certname);
    println!("  Requests named:   {}", report.relabelled);
    println!("  Common headers:   {}", report.headers.len());
    println!("  Simulation:       {}", report.output_path.display());
    println!("  Report body:      {}", report.body_output_path.display());
    match &report.node_config {
        NodeConfigOutcome::Existing(path) => {
            println!("  Node config:      {} ({})", path.display(), "existing".yellow())
        }
        NodeConfigOutcome::Created(path) => {
            println!("  Node config:      {} ({})", path.display(), "created".green())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(root) = &cli.runner_root {
        config.paths.runner_root = root.clone();
    }

    init_tracing(cli.log_level.as_deref(), &config.logging)?;

    match &cli.config {
        Some(path) if !path.exists() => {
            warn!("Configuration file not found: {:?}. Using defaults.", path)
        }
        Some(path) => info!("Loaded configuration from: {:?}", path),
        None => debug!("No configuration file specified. Using environment and defaults."),
    }
    debug!(runner_root = %config.paths.runner_root.display(), "Using simulation runner");

    let pipeline = RecordingPipeline::new(config).context("Invalid terminology table")?;
    let mut prompter = select_prompter(cli.non_interactive)?;

    let report = pipeline
        .run(&cli.recording, prompter.as_mut())
        .with_context(|| format!("Failed to rewrite {:?}", cli.recording))?;

    print_summary(&report);
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            std::process::exit(1);
        }
    };

    if !cli.recording.is_file() {
        eprintln!(
            "{} Input file is a required argument and must exist: {:?}\n",
            "✗".red().bold(),
            cli.recording
        );
        let _ = Cli::command().print_help();
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "✗ Error:".red().bold(), e);
        std::process::exit(1);
    }
}
