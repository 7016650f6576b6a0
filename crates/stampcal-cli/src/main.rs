mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stampcal", about = "Calibrate survey stamps and normalize source catalogs")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show raw header metadata for each band of a stamp
    Info(commands::info::InfoArgs),
    /// Calibrate all five bands and summarize the result
    Calibrate(commands::calibrate::CalibrateArgs),
    /// Normalize a source catalog and emit canonical entries
    Catalog(commands::catalog::CatalogArgs),
    /// Print or save the default fixture config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Catalog(args) => commands::catalog::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
