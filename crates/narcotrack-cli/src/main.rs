//! Narcotrack CLI
//!
//! Command-line interface for the medication inventory tracker

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "narcotrack")]
#[command(about = "Narcotrack - controlled substance inventory tracking", long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = ".narcotrack/inventory.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize the database and apply migrations
    Setup,
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Inventory adjustment operations
    Adjust(commands::adjust::AdjustArgs),
    /// Medication management
    Medication(commands::medication::MedicationArgs),
    /// Reporting period management
    Period(commands::period::PeriodArgs),
    /// Inventory reports
    Report(commands::report::ReportArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = match std::env::var("NARCOTRACK_LOG_FORMAT").as_deref() {
        Ok("json") => narcotrack_core::logging::Profile::Production,
        _ => narcotrack_core::logging::Profile::Development,
    };
    narcotrack_core::logging::init(profile);

    let result = match cli.command {
        Commands::Setup => commands::setup::execute(&cli.db),
        Commands::Seed(args) => commands::seed::execute(&cli.db, args),
        Commands::Adjust(args) => commands::adjust::execute(&cli.db, args),
        Commands::Medication(args) => commands::medication::execute(&cli.db, args),
        Commands::Period(args) => commands::period::execute(&cli.db, args),
        Commands::Report(args) => commands::report::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
