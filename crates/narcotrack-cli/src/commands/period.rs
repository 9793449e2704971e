//! Reporting period commands
//!
//! Usage: narcotrack period open [--start 2024-07-01]
//!        narcotrack period close [--end 2024-09-30]

use clap::{Args, Subcommand};
use std::error::Error;
use std::path::Path;

use narcotrack_core::time;
use narcotrack_store::commands::{CloseReportingPeriod, Command, OpenReportingPeriod};
use narcotrack_store::repo::SqliteRepo;

#[derive(Debug, Args)]
pub struct PeriodArgs {
    #[command(subcommand)]
    pub command: PeriodCommand,
}

#[derive(Debug, Subcommand)]
pub enum PeriodCommand {
    /// Open a new reporting period
    Open(OpenArgs),
    /// Close the open reporting period
    Close(CloseArgs),
    /// List reporting periods
    List,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Period start (RFC 3339 or YYYY-MM-DD; defaults to now)
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Debug, Args)]
pub struct CloseArgs {
    /// Period end (RFC 3339 or YYYY-MM-DD; defaults to now)
    #[arg(long)]
    pub end: Option<String>,
}

/// Execute period command
pub fn execute(db_path: &Path, args: PeriodArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        PeriodCommand::Open(open_args) => execute_open(db_path, open_args),
        PeriodCommand::Close(close_args) => execute_close(db_path, close_args),
        PeriodCommand::List => execute_list(db_path),
    }
}

fn execute_open(db_path: &Path, args: OpenArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let starts_at = match &args.start {
        Some(start) => time::parse_timestamp(start)?,
        None => time::now(),
    };

    let mut cmd = OpenReportingPeriod::new(&conn, starts_at);
    cmd.execute()?;

    println!(
        "✓ Opened reporting period {} ({})",
        cmd.period_id().unwrap_or_default(),
        time::format_timestamp(starts_at)
    );
    Ok(())
}

fn execute_close(db_path: &Path, args: CloseArgs) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let ends_at = match &args.end {
        Some(end) => time::parse_timestamp(end)?,
        None => time::now(),
    };

    let mut cmd = CloseReportingPeriod::new(&conn, ends_at);
    cmd.execute()?;

    println!(
        "✓ Closed reporting period {} ({})",
        cmd.period_id().unwrap_or_default(),
        time::format_timestamp(ends_at)
    );
    Ok(())
}

fn execute_list(db_path: &Path) -> Result<(), Box<dyn Error>> {
    let conn = super::open_store(db_path)?;

    let periods = SqliteRepo::list_periods(&conn)?;
    if periods.is_empty() {
        println!("No reporting periods.");
        return Ok(());
    }

    println!("{:<6} {:<20} {:<20} {:<8}", "ID", "STARTS", "ENDS", "STATUS");
    for period in periods {
        println!(
            "{:<6} {:<20} {:<20} {:<8}",
            period.id,
            time::format_timestamp(period.starts_at),
            period
                .ends_at
                .map(time::format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
            period.status.as_str()
        );
    }
    Ok(())
}
