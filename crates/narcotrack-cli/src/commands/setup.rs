//! Setup command
//!
//! Usage: narcotrack setup [--db PATH]

use std::error::Error;
use std::path::Path;

/// Execute setup: create the database file and bring the schema current
pub fn execute(db_path: &Path) -> Result<(), Box<dyn Error>> {
    super::open_store(db_path)?;

    println!("✓ Database ready at {}", db_path.display());
    Ok(())
}
