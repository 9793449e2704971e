//! Seed import
//!
//! Populates a database with an agency's known medications (and optional
//! opening stock) from a versioned YAML file. Imports are transactional and
//! leave a provenance trail keyed by the seed digest.

mod digest;
mod format_v0;
mod importer;
mod parser;
pub mod provenance;

pub use digest::compute_seed_digest;
pub use format_v0::{SeedAgency, SeedMedication, SeedStock, SeedV0};
pub use importer::import_seed;
pub use parser::{
    parse_seed_file, parse_seed_file_with_db, parse_seed_str, parse_seed_str_with_db,
};
