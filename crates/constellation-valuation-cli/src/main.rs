mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::config::ExportArgs;
use commands::projection::ProjectArgs;
use commands::sensitivity::SensitivityArgs;
use commands::valuation::{EvaluateArgs, ModelArgs};

/// Capacity and demand valuation of a satellite-broadband operator
#[derive(Parser)]
#[command(
    name = "cvm",
    version,
    about = "Capacity and demand valuation of a satellite-broadband operator",
    long_about = "Values a direct-to-device satellite broadband operator two ways: from \
                  constellation throughput (capacity) and from subscriber uptake (demand). \
                  Scenarios load from a snapshot JSON (--input or stdin) with flag overrides \
                  on top, and fall back to the stock 2030 full-constellation assumptions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions (schedule fallbacks, clamping) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline 2030 valuation with breakdowns, price regime and upside
    Evaluate(EvaluateArgs),
    /// Capacity (throughput) model only
    Capacity(ModelArgs),
    /// Demand (subscriber) model only
    Demand(ModelArgs),
    /// Year-by-year projection of both models
    Project(ProjectArgs),
    /// One- or two-way sensitivity grid of the headline result
    Sensitivity(SensitivityArgs),
    /// Write the resolved scenario as a snapshot JSON
    Export(ExportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::valuation::run_evaluate(args),
        Commands::Capacity(args) => commands::valuation::run_capacity(args),
        Commands::Demand(args) => commands::valuation::run_demand(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Export(args) => commands::config::run_export(args),
        Commands::Version => {
            println!("cvm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
