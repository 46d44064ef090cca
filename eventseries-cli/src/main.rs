mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventseries_core::{GenerationLimits, SeriesError};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::commands::generate::OutputFormat;

#[derive(Parser)]
#[command(name = "eventseries")]
#[command(about = "Preview and generate event series from camp ranges and recurrence rules")]
struct Cli {
    /// Limits config file (default: <config dir>/eventseries/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dates a submission expands to, one per line
    Dates {
        /// Submission file (.toml or .json)
        submission: PathBuf,
    },
    /// Generate the full event batch for a submission
    Generate {
        /// Submission file (.toml or .json)
        submission: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Series id to stamp on every event (random if omitted)
        #[arg(long)]
        series_id: Option<Uuid>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize a submission's pattern and the sessions it produces
    Describe {
        /// Submission file (.toml or .json)
        submission: PathBuf,
    },
    /// Show effective generation limits
    Config {
        /// Write a commented default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        report_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Dates { submission } => {
            let limits = load_limits(cli.config.as_deref())?;
            commands::dates::run(&submission, &limits)
        }
        Commands::Generate {
            submission,
            format,
            series_id,
            output,
        } => {
            let limits = load_limits(cli.config.as_deref())?;
            let series_id = series_id.unwrap_or_else(Uuid::new_v4);
            commands::generate::run(&submission, &limits, series_id, format, output.as_deref())
        }
        Commands::Describe { submission } => {
            let limits = load_limits(cli.config.as_deref())?;
            commands::describe::run(&submission, &limits)
        }
        Commands::Config { init } => commands::config::run(cli.config.as_deref(), init),
    }
}

fn load_limits(path: Option<&std::path::Path>) -> Result<GenerationLimits> {
    Ok(GenerationLimits::load(path)?)
}

/// Logs go to stderr so stdout stays pipeable. `-v` wins over RUST_LOG.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<SeriesError>() {
        Some(series_err) if series_err.is_user_input() => {
            eprintln!("{}", format!("  {series_err}").red());
            eprintln!(
                "{}",
                "  Check the dates and days of the week in the submission.".dimmed()
            );
        }
        _ => eprintln!("{} {:#}", "error:".red().bold(), e),
    }
}
