//! CLI entrypoint for converge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use converge_application::{
    Clock, NoRunObserver, RunActionsUseCase, RunContext, RunObserver, SystemClock,
};
use converge_domain::{OutputFormat, Transcript, Turn};
use converge_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditRecorder, ScriptedDecisionClient,
};
use converge_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status when the round budget ran out before the run was done.
const EXIT_NOT_DONE: u8 = 2;
/// Exit status for a fatal run error.
const EXIT_FATAL: u8 = 1;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    for issue in &issues {
        eprintln!("{}", issue);
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("invalid configuration");
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(script) = cli.script.as_ref() else {
        bail!("--script is required");
    };

    // === Dependency Injection ===
    let client = Arc::new(
        ScriptedDecisionClient::from_path(script)
            .with_context(|| format!("failed to load script {}", script.display()))?,
    );
    info!("Loaded script with {} round(s)", client.len());

    let actions = config.actions.to_builtin_actions().build();

    let mut use_case =
        RunActionsUseCase::new(client, actions).with_params(config.run.to_loop_params());

    let audit_path = cli
        .audit_log
        .clone()
        .or_else(|| config.audit.resolved_path());
    if let Some(path) = audit_path {
        let recorder = JsonlAuditRecorder::new(&path)
            .with_context(|| format!("failed to open audit log {}", path.display()))?;
        info!("Recording action results to {}", path.display());
        use_case = use_case.with_audit_recorder(Arc::new(recorder));
    }

    // === Seed transcript ===
    let mut seed = Transcript::new();
    if let Some(prompt) = &cli.prompt {
        seed.push(Turn::human(prompt.clone(), SystemClock.now_millis()));
    }
    let seed_len = seed.len();

    // === Cancellation ===
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            signal_token.cancel();
        }
    });

    let context = RunContext::new().with_cancellation(token);
    info!("Starting run {}", context.run_id);

    // === Run ===
    let reporter = ProgressReporter::new();
    let observer: &dyn RunObserver = if cli.quiet {
        &NoRunObserver
    } else if std::io::stderr().is_terminal() {
        &reporter
    } else {
        &SimpleProgress
    };

    let result = use_case.run_with_observer(seed, context, observer).await;
    reporter.finish();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(EXIT_FATAL));
        }
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter::render(&output, format, seed_len));

    if output.done {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_NOT_DONE))
    }
}

/// Command-line flags take precedence over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(max_rounds) = cli.max_rounds {
        config.run.max_rounds = max_rounds;
    }
    if let Some(concurrency) = cli.concurrency {
        config.run.concurrency = concurrency;
    }
    if let Some(budget) = cli.correction_budget {
        config.run.correction_budget = budget;
    }
    if let Some(limit) = cli.failure_limit {
        config.run.failure_limit = limit;
    }
    if let Some(model) = &cli.model {
        config.run.model = Some(model.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "converge",
            "--script",
            "s.json",
            "--max-rounds",
            "2",
            "--failure-limit",
            "5",
            "--model",
            "fast",
        ])
        .unwrap();

        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.run.max_rounds, 2);
        assert_eq!(config.run.failure_limit, 5);
        assert_eq!(config.run.concurrency, 4);
        assert_eq!(config.run.model.as_deref(), Some("fast"));
    }
}
