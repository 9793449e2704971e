//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds for reproducibility. Amounts are
//! canonicalized to integer micrograms so the digest is independent of the
//! unit a value was written in.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::seed::format_v0::SeedV0;
use narcotrack_core::conversion;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical representation of a seed for digest calculation
#[derive(Debug, Clone, Serialize)]
struct CanonicalSeed {
    schema_version: u32,
    agency_name: String,
    medications: Vec<CanonicalMedication>,
    opening_stock: Vec<CanonicalStock>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalMedication {
    code: String,
    name: String,
    container_amount_mcg: i64,
    preferred_unit: String,
    fill_volume_tenths_ml: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalStock {
    medication: String,
    amount_mcg: i64,
    reference: Option<String>,
}

/// Compute a stable digest for a validated seed
///
/// Returns a SHA256 hex digest of the canonicalized seed representation
pub fn compute_seed_digest(seed: &SeedV0) -> Result<String> {
    let canonical = canonicalize_seed(seed)?;

    // Serialize to JSON; struct field order is fixed, entries are sorted
    let json = serde_json::to_string(&canonical).expect("canonical seed serialization");

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(hex::encode(result))
}

/// Canonicalize a seed for deterministic digest calculation
fn canonicalize_seed(seed: &SeedV0) -> Result<CanonicalSeed> {
    let mut medications = Vec::with_capacity(seed.medications.len());
    for medication in &seed.medications {
        medications.push(CanonicalMedication {
            code: medication.code.clone(),
            name: medication.name.clone(),
            container_amount_mcg: conversion::to_canonical(
                medication.container_amount,
                medication.unit,
            )?,
            preferred_unit: medication.unit.as_str().to_string(),
            fill_volume_tenths_ml: (medication.fill_volume_ml * 10.0).round() as i64,
        });
    }
    medications.sort();

    let mut opening_stock = Vec::with_capacity(seed.opening_stock.len());
    for stock in &seed.opening_stock {
        opening_stock.push(CanonicalStock {
            medication: stock.medication.clone(),
            amount_mcg: conversion::to_canonical(stock.amount, stock.unit)?,
            reference: stock.reference.clone(),
        });
    }
    opening_stock.sort();

    Ok(CanonicalSeed {
        schema_version: seed.schema_version,
        agency_name: seed.agency.name.clone(),
        medications,
        opening_stock,
    })
}
