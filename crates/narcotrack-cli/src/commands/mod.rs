//! CLI subcommand implementations

pub mod adjust;
pub mod medication;
pub mod period;
pub mod report;
pub mod seed;
pub mod setup;

use std::error::Error;
use std::path::Path;

/// Open the database, creating its directory and applying migrations
pub fn open_store(db_path: &Path) -> Result<rusqlite::Connection, Box<dyn Error>> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut conn = narcotrack_store::db::open(db_path)?;
    narcotrack_store::db::configure(&conn)?;
    narcotrack_store::migrations::apply_migrations(&mut conn)?;

    Ok(conn)
}
