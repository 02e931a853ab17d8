//! hush binary entrypoint.
//!
//! Renders a silence document and delivers it to every configured
//! alert-management endpoint, then exits non-zero if any target failed.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hush_cli::cli::Cli;
use hush_cli::config;
use hush_cli::error::CliError;
use hush_cli::output::OutputFormat;

use hush_core::{summarize, Action, SilenceManager};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    let action = Action::from(cli.action);
    let config = config::build_config(&cli)?;
    let manager = SilenceManager::new(config)?;

    let outcomes = manager.run(action).await?;
    let summary = summarize(outcomes);
    format.write(&mut stdout, &summary)?;

    Ok(ExitCode::from(summary.exit_code()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_cli::cli::ActionArg;

    #[test]
    fn cli_parses_delete() {
        let cli = Cli::parse_from(["hush", "--action", "delete", "--urls", "http://am:9093"]);
        assert_eq!(cli.action, ActionArg::Delete);
    }

    #[tokio::test]
    async fn run_create_without_duration_fails() {
        let cli = Cli::parse_from(["hush", "--action", "create", "--urls", "http://127.0.0.1:1"]);
        let result = run(cli).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn run_create_against_unreachable_target_reports_failure() {
        // Transport failures are outcomes, not errors: run succeeds and the
        // exit code carries the failure.
        let cli = Cli::parse_from([
            "hush",
            "--action",
            "create",
            "--urls",
            "http://127.0.0.1:1",
            "--duration",
            "60",
            "--comment",
            "test",
        ]);
        let result = run(cli).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn run_delete_against_unreachable_target_reports_failure() {
        let cli = Cli::parse_from([
            "hush",
            "--action",
            "delete",
            "--urls",
            "http://127.0.0.1:1",
            "--comment",
            "test",
        ]);
        let result = run(cli).await;
        assert!(result.is_ok());
    }
}
