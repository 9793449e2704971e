//! Report commands
//!
//! Usage: narcotrack report current-inventory
//!        narcotrack report medication-stock <CODE>

use clap::{Args, Subcommand};
use std::error::Error;
use std::path::Path;

use narcotrack_store::reports;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Current on-hand stock for every medication
    CurrentInventory,
    /// Stock detail for one medication
    MedicationStock(MedicationStockArgs),
}

#[derive(Debug, Args)]
pub struct MedicationStockArgs {
    /// Medication code
    pub code: String,
}

/// Execute report command
pub fn execute(db_path: &Path, args: ReportArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        ReportCommand::CurrentInventory => execute_current_inventory(db_path),
        ReportCommand::MedicationStock(stock_args) => {
            execute_medication_stock(db_path, stock_args)
        }
    }
}

fn execute_current_inventory(db_path: &Path) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let rows = reports::current_inventory(&conn)?;
    if rows.is_empty() {
        println!("No medications registered.");
        return Ok(());
    }

    println!(
        "{:<16} {:<28} {:<14} {:>14} {:>8}",
        "CODE", "NAME", "STATUS", "ON HAND", "ENTRIES"
    );
    for row in rows {
        println!(
            "{:<16} {:<28} {:<14} {:>10.2} {:<3} {:>8}",
            row.code,
            row.name,
            row.status,
            row.balance_preferred,
            row.preferred_unit,
            row.adjustment_count
        );
    }
    Ok(())
}

fn execute_medication_stock(
    db_path: &Path,
    args: MedicationStockArgs,
) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let report = reports::medication_stock(&conn, &args.code)?;

    println!("{} ({})", report.name, report.code);
    println!("  status:      {}", report.status);
    println!(
        "  on hand:     {:.2} {} ({} mcg)",
        report.balance_preferred, report.preferred_unit, report.balance_mcg
    );
    println!("  volume:      {:.2} ml", report.balance_ml);
    println!("  adjustments: {}", report.adjustment_count);
    Ok(())
}
