//! Inventory reports
//!
//! Read-side aggregation over the adjustments ledger. Stock is never stored;
//! every figure here is the signed sum of a medication's adjustment deltas.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use narcotrack_core::model::{MedicationStatus, Unit};
use narcotrack_core::{conversion, TrackerError, TrackerErrorKind};
use rusqlite::Connection;

/// One line of the current-inventory report
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub code: String,
    pub name: String,
    pub status: MedicationStatus,
    pub preferred_unit: Unit,
    /// Balance in canonical micrograms
    pub balance_mcg: i64,
    /// Balance converted to the preferred unit
    pub balance_preferred: f64,
    pub adjustment_count: i64,
}

/// Stock report for a single medication
#[derive(Debug, Clone, PartialEq)]
pub struct StockReport {
    pub code: String,
    pub name: String,
    pub status: MedicationStatus,
    pub preferred_unit: Unit,
    pub balance_mcg: i64,
    pub balance_preferred: f64,
    /// Volume equivalent at the container concentration
    pub balance_ml: f64,
    pub adjustment_count: i64,
}

fn text_to<T: std::str::FromStr>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Current inventory across all medications, ordered by code
pub fn current_inventory(conn: &Connection) -> Result<Vec<InventoryRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT m.code, m.name, m.status, m.preferred_unit,
                    COALESCE(SUM(a.delta_mcg), 0), COUNT(a.id)
             FROM medications m
             LEFT JOIN adjustments a ON a.medication_code = m.code
             GROUP BY m.code
             ORDER BY m.code",
        )
        .map_err(from_rusqlite)?;

    let rows = stmt
        .query_map([], |row| {
            let code: String = row.get(0)?;
            let name: String = row.get(1)?;
            let status: String = row.get(2)?;
            let preferred_unit: String = row.get(3)?;
            let balance_mcg: i64 = row.get(4)?;
            let adjustment_count: i64 = row.get(5)?;

            let preferred_unit: Unit = text_to(3, &preferred_unit)?;
            Ok(InventoryRow {
                code,
                name,
                status: text_to(2, &status)?,
                preferred_unit,
                balance_mcg,
                balance_preferred: conversion::from_canonical(balance_mcg, preferred_unit),
                adjustment_count,
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(rows)
}

/// Stock report for one medication
pub fn medication_stock(conn: &Connection, code: &str) -> Result<StockReport> {
    let medication = crate::repo::SqliteRepo::get_medication(conn, code)?.ok_or_else(|| {
        TrackerError::new(TrackerErrorKind::NotFound)
            .with_op("medication_stock")
            .with_medication(code)
            .with_message("no medication with this code")
    })?;

    let (balance_mcg, adjustment_count): (i64, i64) = conn
        .query_row(
            "SELECT COALESCE(SUM(delta_mcg), 0), COUNT(id)
             FROM adjustments WHERE medication_code = ?",
            [code],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(from_rusqlite)?;

    let balance_ml =
        conversion::milliliters(balance_mcg, medication.concentration_mcg_per_ml())?;

    Ok(StockReport {
        code: medication.code,
        name: medication.name,
        status: medication.status,
        preferred_unit: medication.preferred_unit,
        balance_mcg,
        balance_preferred: conversion::from_canonical(balance_mcg, medication.preferred_unit),
        balance_ml,
        adjustment_count,
    })
}
