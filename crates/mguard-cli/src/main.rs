//! # mguard CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity flags drive the tracing filter.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mguard_cli::baseline::{run_baseline, BaselineArgs};
use mguard_cli::evaluate::{run_evaluate, EvaluateArgs};
use mguard_cli::serve::{run_serve, ServeArgs};
use mguard_cli::thresholds::{run_thresholds, ThresholdsArgs};

/// Merchant Guard Stack CLI
///
/// Runs the deliverability gate and revenue baseline engines from the
/// command line: one-shot evaluations and calculations over exported
/// files, threshold configuration checks, and the HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "mguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one gate from a metric snapshot file.
    Evaluate(EvaluateArgs),

    /// Calculate a revenue baseline from an order-history file.
    Baseline(BaselineArgs),

    /// Print or validate the threshold table.
    Thresholds(ThresholdsArgs),

    /// Serve the HTTP API with in-memory stores.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Evaluate(args) => run_evaluate(&args),
        Commands::Baseline(args) => run_baseline(&args),
        Commands::Thresholds(args) => run_thresholds(&args),
        Commands::Serve(args) => run_serve(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
