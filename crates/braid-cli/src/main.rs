#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "braid: branch-lane layout for chronological event graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Assign lanes and list branch points",
        after_help = "EXAMPLES:\n    # Lay out a JSON lines history\n    braid analyze history.jsonl\n\n    # Reject malformed input, machine-readable output\n    braid analyze --strict --format json history.tsv"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Draw the lane graph as text",
        after_help = "EXAMPLES:\n    # Draw with wider lanes\n    braid render --lane-width 3 history.jsonl\n\n    # Sort unordered input first\n    braid render --sort history.tsv"
    )]
    Render(cmd::render::RenderArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BRAID_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "braid=debug,info"
        } else {
            "braid=info,warn"
        })
    });

    let format = env::var("BRAID_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> (OutputMode, anyhow::Result<()>) {
    let config = env::current_dir()
        .context("Failed to determine working directory")
        .and_then(|root| config::load_config(&root));
    let config = match config {
        Ok(config) => config,
        Err(err) => return (output::resolve_output_mode(cli.format, cli.json, None), Err(err)),
    };

    let mode = output::resolve_output_mode(cli.format, cli.json, config.output.as_deref());
    debug!(?mode, "resolved output mode");

    let result = match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config, mode),
        Commands::Render(args) => cmd::render::run_render(args, &config, mode),
    };
    (mode, result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let (mode, result) = run(&cli);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = CliError::from(&err);
            debug!(code = error.code, "command failed");
            if output::render_error(mode, &error).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
