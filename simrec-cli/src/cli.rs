//! CLI argument parsing definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Rewrite a proxy-recorder capture into a parameterized agent simulation",
    long_about = None
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Simulation runner root (overrides paths.runner_root)
    #[arg(long, value_name = "DIR")]
    pub runner_root: Option<PathBuf>,

    /// Accept the default answer to every question
    #[arg(long)]
    pub non_interactive: bool,

    /// Recorded simulation, placed in the runner's simulation directory
    #[arg(value_name = "RECORDING")]
    pub recording: PathBuf,
}
