//! Medication management commands
//!
//! Usage: narcotrack medication add --code fentanyl --name "Fentanyl citrate" \
//!            --amount 100 --unit mcg --fill-volume-ml 2.0

use clap::{Args, Subcommand};
use std::error::Error;
use std::path::Path;

use narcotrack_core::model::{MedicationStatus, Unit};
use narcotrack_core::conversion;
use narcotrack_store::commands::{AddMedication, Command, DeleteMedication, UpdateMedicationStatus};
use narcotrack_store::repo::SqliteRepo;

#[derive(Debug, Args)]
pub struct MedicationArgs {
    #[command(subcommand)]
    pub command: MedicationCommand,
}

#[derive(Debug, Subcommand)]
pub enum MedicationCommand {
    /// Register a new medication
    Add(AddArgs),
    /// List registered medications
    List,
    /// Change a medication's lifecycle status
    SetStatus(SetStatusArgs),
    /// Remove a medication with no recorded adjustments
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Medication code (lowercase, e.g. "fentanyl")
    #[arg(long)]
    pub code: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Active substance per container
    #[arg(long)]
    pub amount: f64,

    /// Unit the amount is expressed in: mcg, mg, or g
    #[arg(long)]
    pub unit: String,

    /// Container fill volume in milliliters
    #[arg(long = "fill-volume-ml")]
    pub fill_volume_ml: f64,
}

#[derive(Debug, Args)]
pub struct SetStatusArgs {
    /// Medication code
    pub code: String,

    /// New status: active, inactive, or discontinued
    pub status: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Medication code
    pub code: String,
}

/// Execute medication command
pub fn execute(db_path: &Path, args: MedicationArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        MedicationCommand::Add(add_args) => execute_add(db_path, add_args),
        MedicationCommand::List => execute_list(db_path),
        MedicationCommand::SetStatus(status_args) => execute_set_status(db_path, status_args),
        MedicationCommand::Delete(delete_args) => execute_delete(db_path, delete_args),
    }
}

fn execute_add(db_path: &Path, args: AddArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let unit: Unit = args.unit.parse()?;
    AddMedication::new(
        &conn,
        args.code.clone(),
        args.name.clone(),
        args.amount,
        unit,
        args.fill_volume_ml,
    )
    .execute()?;

    println!("✓ Registered {} ({})", args.code, args.name);
    Ok(())
}

fn execute_list(db_path: &Path) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let medications = SqliteRepo::list_medications(&conn)?;
    if medications.is_empty() {
        println!("No medications registered.");
        return Ok(());
    }

    println!(
        "{:<16} {:<28} {:>12} {:>8} {:<14}",
        "CODE", "NAME", "PER CONTAINER", "FILL ML", "STATUS"
    );
    for med in medications {
        let amount = conversion::from_canonical(med.container_amount_mcg, med.preferred_unit);
        println!(
            "{:<16} {:<28} {:>9} {:<3} {:>8.1} {:<14}",
            med.code,
            med.name,
            amount,
            med.preferred_unit,
            med.fill_volume_ml,
            med.status
        );
    }
    Ok(())
}

fn execute_set_status(db_path: &Path, args: SetStatusArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let status: MedicationStatus = args.status.parse()?;
    UpdateMedicationStatus::new(&conn, args.code.clone(), status).execute()?;

    println!("✓ {} is now {}", args.code, status);
    Ok(())
}

fn execute_delete(db_path: &Path, args: DeleteArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    DeleteMedication::new(&conn, args.code.clone()).execute()?;

    println!("✓ Deleted {}", args.code);
    Ok(())
}
