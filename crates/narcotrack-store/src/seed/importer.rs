//! Seed importer orchestration
//!
//! Imports an agency seed: medications are upserted by code, opening stock
//! becomes IMPORT adjustments, everything runs in one transaction

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::SqliteRepo;
use crate::seed::{compute_seed_digest, parse_seed_file_with_db, provenance};
use narcotrack_core::conversion;
use narcotrack_core::model::{Adjustment, EventKind, Medication};
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

/// Import a seed file into the database
///
/// This is the main entry point for seed import. It:
/// 1. Parses and validates the seed YAML (checking the database for
///    cross-seed stock references)
/// 2. Computes the seed digest
/// 3. Upserts the seed's medications
/// 4. Records opening stock as IMPORT adjustments, opening a reporting
///    period if none is open
/// 5. Emits provenance events keyed by the digest
///
/// The whole import commits or rolls back as a unit. Returns the seed
/// digest on success.
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<String> {
    let seed = parse_seed_file_with_db(path, Some(conn))?;
    let seed_digest = compute_seed_digest(&seed)?;

    let tx = conn.transaction().map_err(crate::errors::from_rusqlite)?;

    provenance::emit_started(&tx, &seed_digest, &seed.agency.name)?;

    for seed_medication in &seed.medications {
        let canonical = conversion::to_canonical(
            seed_medication.container_amount,
            seed_medication.unit,
        )?;

        // Keep the original registration timestamp when reseeding
        let medication = match SqliteRepo::get_medication(&tx, &seed_medication.code)? {
            Some(mut existing) => {
                existing.name = seed_medication.name.clone();
                existing.container_amount_mcg = canonical;
                existing.preferred_unit = seed_medication.unit;
                existing.fill_volume_ml = seed_medication.fill_volume_ml;
                existing.updated_at = chrono::Utc::now();
                existing
            }
            None => Medication::new(
                seed_medication.code.clone(),
                seed_medication.name.clone(),
                canonical,
                seed_medication.unit,
                seed_medication.fill_volume_ml,
            ),
        };

        SqliteRepo::persist_medication_tx(&tx, &medication)?;
        provenance::emit_applied(&tx, &seed_digest, &seed_medication.code)?;
    }

    if !seed.opening_stock.is_empty() {
        // Opening stock needs a reporting period to land in
        let period_id = match SqliteRepo::get_open_period(&tx)? {
            Some(period) => period.id,
            None => SqliteRepo::insert_period(&tx, chrono::Utc::now())?,
        };

        for stock in &seed.opening_stock {
            let amount_mcg = conversion::to_canonical(stock.amount, stock.unit)?;
            let adjustment = Adjustment::new(
                Uuid::now_v7().to_string(),
                chrono::Utc::now(),
                EventKind::Import,
                stock.medication.clone(),
                amount_mcg,
                period_id,
                stock.reference.clone(),
            );
            SqliteRepo::insert_adjustment_tx(&tx, &adjustment)?;
        }
    }

    provenance::emit_completed(&tx, &seed_digest)?;

    tx.commit().map_err(crate::errors::from_rusqlite)?;

    tracing::info!(
        agency = %seed.agency.name,
        medications = seed.medications.len(),
        digest = %seed_digest,
        "seed imported"
    );

    Ok(seed_digest)
}
