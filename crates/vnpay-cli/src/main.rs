mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::payroll::{CalculateArgs, SalaryArgs};

/// Vietnamese gross/net salary calculations
#[derive(Parser)]
#[command(
    name = "vnpay",
    version,
    about = "Vietnamese gross/net salary calculations",
    long_about = "Computes mandatory insurance (BHXH, BHYT, BHTN), progressive personal \
                  income tax, net pay and employer cost with decimal precision, and \
                  compares the current tax regime against the prior one."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file replacing the built-in statutory tables
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log solver and bracket detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Net pay from a contracted gross salary
    GrossToNet(SalaryArgs),
    /// Gross salary needed for a target net pay
    NetToGross(SalaryArgs),
    /// Run a calculation from a JSON input document
    Calculate(CalculateArgs),
    /// Print the effective statutory tables
    Config,
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
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match input::file::read_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::GrossToNet(args) => commands::payroll::run_gross_to_net(args, &config),
        Commands::NetToGross(args) => commands::payroll::run_net_to_gross(args, &config),
        Commands::Calculate(args) => commands::payroll::run_calculate(args, &config),
        Commands::Config => commands::config::run_show_config(&config),
        Commands::Version => {
            println!("vnpay {}", env!("CARGO_PKG_VERSION"));
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
