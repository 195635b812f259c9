mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::risk::RiskArgs;
use commands::rounds::{FieldsArgs, RoundArgs};
use commands::valuation::{MethodArgs, MultipliersArgs, ValuateArgs};

/// Multi-method startup valuation
#[derive(Parser)]
#[command(
    name = "startval",
    version,
    about = "Multi-method startup valuation",
    long_about = "Values an early-stage company with five independent methods \
                  (scorecard, risk-adjusted, venture capital, DCF, comparables), \
                  aggregates them into a range with a confidence score, and runs \
                  round-specific models for pre-seed through growth."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full five-method valuation with range and confidence
    Valuate(ValuateArgs),
    /// Four-factor risk analysis
    Risk(RiskArgs),
    /// Run a single valuation method and show its working
    Method(MethodArgs),
    /// Resolve industry multipliers and show where they came from
    Multipliers(MultipliersArgs),
    /// Value a funding round with its stage-specific model
    Round(RoundArgs),
    /// List the input fields a funding-round model requires
    Fields(FieldsArgs),
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Valuate(args) => commands::valuation::run_valuate(args).await,
        Commands::Risk(args) => commands::risk::run_risk(args),
        Commands::Method(args) => commands::valuation::run_method(args).await,
        Commands::Multipliers(args) => commands::valuation::run_multipliers(args).await,
        Commands::Round(args) => commands::rounds::run_round(args),
        Commands::Fields(args) => commands::rounds::run_fields(args),
        Commands::Version => {
            println!("startval {}", env!("CARGO_PKG_VERSION"));
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
