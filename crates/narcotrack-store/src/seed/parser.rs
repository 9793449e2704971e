//! Seed parser with validation
//!
//! Parses YAML and validates schema version, code uniqueness, amounts, and
//! that opening stock references a medication from the seed or the database

#![allow(clippy::result_large_err)]

use crate::errors::{seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use narcotrack_core::{conversion, rules};
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file from a path with optional database context for
/// cross-seed stock references
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<SeedV0> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str_with_db(&content, conn)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    parse_seed_str_with_db(content, None)
}

/// Parse a seed from a string with optional database context
pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed, conn)?;

    Ok(seed)
}

/// Validate a parsed seed
fn validate_seed(seed: &SeedV0, conn: Option<&Connection>) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    if seed.agency.name.trim().is_empty() {
        return Err(seed_validation("Agency name cannot be empty"));
    }

    // Validate medications and code uniqueness
    let mut codes = HashSet::new();
    for medication in &seed.medications {
        rules::validate_medication_code(&medication.code)
            .map_err(|e| seed_validation(&e.to_string()))?;
        rules::validate_display_name(&medication.name)
            .map_err(|e| seed_validation(&e.to_string()))?;

        if !codes.insert(&medication.code) {
            return Err(seed_validation(&format!(
                "Duplicate medication code: {}",
                medication.code
            )));
        }

        conversion::to_canonical(medication.container_amount, medication.unit)
            .map_err(|e| seed_validation(&e.to_string()))?;
        if medication.container_amount <= 0.0 {
            return Err(seed_validation(&format!(
                "Container amount for {} must be positive",
                medication.code
            )));
        }
        if !medication.fill_volume_ml.is_finite() || medication.fill_volume_ml <= 0.0 {
            return Err(seed_validation(&format!(
                "Fill volume for {} must be positive",
                medication.code
            )));
        }
    }

    // Validate opening stock references and amounts
    for stock in &seed.opening_stock {
        if !codes.contains(&stock.medication) {
            let in_db = conn
                .map(|conn| {
                    conn.query_row(
                        "SELECT 1 FROM medications WHERE code = ?1",
                        [&stock.medication],
                        |_| Ok(true),
                    )
                    .unwrap_or(false)
                })
                .unwrap_or(false);

            if !in_db {
                return Err(seed_validation(&format!(
                    "Opening stock references unknown medication: {}",
                    stock.medication
                )));
            }
        }

        if stock.amount <= 0.0 {
            return Err(seed_validation(&format!(
                "Opening stock amount for {} must be positive",
                stock.medication
            )));
        }
        conversion::to_canonical(stock.amount, stock.unit)
            .map_err(|e| seed_validation(&e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SEED: &str = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: fentanyl
    name: "Fentanyl citrate"
    container_amount: 100
    unit: mcg
    fill_volume_ml: 2.0
opening_stock:
  - medication: fentanyl
    amount: 500
    unit: mcg
"#;

    #[test]
    fn test_parse_valid_seed() {
        let result = parse_seed_str(VALID_SEED);
        assert!(result.is_ok());
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        let yaml = r#"
schema_version: 99
agency:
  name: Example VAC
medications: []
"#;

        let err = parse_seed_str(yaml).unwrap_err();
        assert!(err.to_string().contains("schema_version"));
    }

    #[test]
    fn test_reject_duplicate_code() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: fentanyl
    name: "Fentanyl citrate"
    container_amount: 100
    unit: mcg
    fill_volume_ml: 2.0
  - code: fentanyl
    name: "Fentanyl again"
    container_amount: 100
    unit: mcg
    fill_volume_ml: 2.0
"#;

        let err = parse_seed_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate medication code"));
    }

    #[test]
    fn test_reject_unknown_stock_reference() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications: []
opening_stock:
  - medication: fentanyl
    amount: 500
    unit: mcg
"#;

        let err = parse_seed_str(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown medication"));
    }

    #[test]
    fn test_stock_reference_resolved_from_db() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications: []
opening_stock:
  - medication: fentanyl
    amount: 500
    unit: mcg
"#;

        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        crate::migrations::apply_migrations(&mut conn).unwrap();
        let med = narcotrack_core::Medication::new(
            "fentanyl".to_string(),
            "Fentanyl citrate".to_string(),
            100,
            narcotrack_core::Unit::Mcg,
            2.0,
        );
        crate::repo::SqliteRepo::persist_medication(&conn, &med).unwrap();

        let result = parse_seed_str_with_db(yaml, Some(&conn));
        assert!(result.is_ok());
    }

    #[test]
    fn test_reject_negative_amounts() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: fentanyl
    name: "Fentanyl citrate"
    container_amount: -100
    unit: mcg
    fill_volume_ml: 2.0
"#;

        assert!(parse_seed_str(yaml).is_err());
    }
}
