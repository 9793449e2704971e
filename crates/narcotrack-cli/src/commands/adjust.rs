//! Inventory adjustment commands
//!
//! Usage: narcotrack adjust record --medication fentanyl --event USE \
//!            --amount 100 --unit mcg [--date 2024-08-15] [--reference "PCR 2024-0815"]

use clap::{Args, Subcommand};
use std::error::Error;
use std::path::Path;

use narcotrack_core::model::{EventKind, Unit};
use narcotrack_store::commands::{Command, DeleteAdjustment, RecordAdjustment};

#[derive(Debug, Args)]
pub struct AdjustArgs {
    #[command(subcommand)]
    pub command: AdjustCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdjustCommand {
    /// Record an inventory adjustment
    Record(RecordArgs),
    /// Delete an adjustment recorded in error (open period only)
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Medication code
    #[arg(long)]
    pub medication: String,

    /// Event code: IMPORT, ORDER, USE, WASTE, DESTROY, or LOSS
    #[arg(long)]
    pub event: String,

    /// Amount moved (unsigned; the event decides the direction)
    #[arg(long)]
    pub amount: f64,

    /// Unit the amount is expressed in: mcg, mg, or g
    #[arg(long)]
    pub unit: String,

    /// When the change occurred (RFC 3339 or YYYY-MM-DD; defaults to now)
    #[arg(long)]
    pub date: Option<String>,

    /// Free-text reference (incident or PCR number)
    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Adjustment id
    pub id: String,
}

/// Execute adjust command
pub fn execute(db_path: &Path, args: AdjustArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        AdjustCommand::Record(record_args) => execute_record(db_path, record_args),
        AdjustCommand::Delete(delete_args) => execute_delete(db_path, delete_args),
    }
}

fn execute_record(db_path: &Path, args: RecordArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let event: EventKind = args.event.to_uppercase().parse()?;
    let unit: Unit = args.unit.parse()?;
    let occurred_at = match &args.date {
        Some(date) => narcotrack_core::time::parse_timestamp(date)?,
        None => narcotrack_core::time::now(),
    };

    let mut cmd = RecordAdjustment::new(
        &conn,
        occurred_at,
        event,
        args.medication.clone(),
        args.amount,
        unit,
        args.reference.clone(),
    );
    cmd.execute()?;

    println!(
        "✓ Recorded {} {} {} for {} (adjustment {})",
        event,
        args.amount,
        unit,
        args.medication,
        cmd.adjustment_id().unwrap_or("?")
    );
    Ok(())
}

fn execute_delete(db_path: &Path, args: DeleteArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    DeleteAdjustment::new(&conn, args.id.clone()).execute()?;

    println!("✓ Deleted adjustment {}", args.id);
    Ok(())
}
