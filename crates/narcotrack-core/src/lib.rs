//! Narcotrack Core - domain kernel for medication inventory tracking
//!
//! This crate provides the database-independent pieces of narcotrack:
//! - Medication, adjustment, and reporting-period models
//! - The adjustment event catalog with stock-direction semantics
//! - Checked unit conversion over canonical microgram amounts
//! - Validation rules shared by the command layer and seed import
//! - The error facility with stable `ERR_*` codes
//! - Logging initialization profiles

pub mod conversion;
pub mod errors;
pub mod logging;
pub mod model;
pub mod rules;
pub mod time;

// Re-export commonly used types
pub use errors::{Result, TrackerError, TrackerErrorKind};
pub use model::{
    Adjustment, EventKind, Medication, MedicationStatus, PeriodStatus, ReportingPeriod, Unit,
};
