//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn the run added to the transcript
    Full,
    /// Stop reason, rounds and pending actions only
    Summary,
    /// The whole run output as JSON
    Json,
}

impl From<OutputFormat> for converge_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for converge
#[derive(Parser, Debug)]
#[command(name = "converge")]
#[command(author, version, about = "Bounded action loop - a decision-maker requests actions until the run converges")]
#[command(long_about = r#"
converge drives a decision-maker through rounds of action requests.

Each round:
1. The decision-maker sees the transcript and the available actions
2. Requested actions are de-duplicated, bounded and executed concurrently
3. Results are appended to the transcript in request order

The run stops when the decision-maker finishes, repeats an action that
already succeeded, returns nothing, or the round budget runs out.

Configuration files are loaded from (in priority order):
1. CONVERGE_* environment variables
2. --config <path>         Explicit config file
3. ./converge.toml         Project-level config
4. ~/.config/converge/config.toml   Global config

Example:
  converge --script demo.json "List the Rust sources"
  converge --script demo.json --max-rounds 3 --output json
"#)]
pub struct Cli {
    /// Initial instruction placed in the transcript as a human turn
    pub prompt: Option<String>,

    /// JSON file of scripted decision rounds
    #[arg(long, value_name = "PATH", required_unless_present = "show_config")]
    pub script: Option<PathBuf>,

    /// Maximum number of rounds
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Maximum distinct actions executed per round
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Malformed-argument events tolerated per run
    #[arg(long, value_name = "N")]
    pub correction_budget: Option<u32>,

    /// Consecutive failures of one call that abort the run
    #[arg(long, value_name = "N")]
    pub failure_limit: Option<u32>,

    /// Model selector forwarded to the decision client
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Append action results to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
