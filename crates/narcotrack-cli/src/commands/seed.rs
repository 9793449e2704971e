//! Seed import command
//!
//! Usage: narcotrack seed import <PATH>

use clap::{Args, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file into the database
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

/// Execute seed command
pub fn execute(db_path: &Path, args: SeedArgs) -> Result<(), Box<dyn Error>> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(db_path, import_args),
    }
}

/// Execute seed import
fn execute_import(db_path: &Path, args: ImportArgs) -> Result<(), Box<dyn Error>> {
    let mut conn = super::open_store(db_path)?;

    if args.path.is_dir() {
        // Import directory of seeds (sorted for determinism)
        let mut seed_files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();

        seed_files.sort();

        for seed_file in seed_files {
            println!("Importing {}...", seed_file.display());
            let digest = narcotrack_store::seed::import_seed(&seed_file, &mut conn)?;
            println!("✓ Imported (digest: {})", digest);
        }
    } else {
        println!("Importing {}...", args.path.display());
        let digest = narcotrack_store::seed::import_seed(&args.path, &mut conn)?;
        println!("✓ Imported (digest: {})", digest);
    }

    Ok(())
}
