//! Medication commands

#![allow(clippy::result_large_err)]

use chrono::Utc;
use rusqlite::Connection;

use crate::commands::{Command, ExecutionGuard};
use crate::errors::Result;
use crate::repo::SqliteRepo;
use narcotrack_core::model::{Medication, MedicationStatus, Unit};
use narcotrack_core::{conversion, rules, TrackerError, TrackerErrorKind};

/// Register a new medication in the formulary
pub struct AddMedication<'c> {
    conn: &'c Connection,
    code: String,
    name: String,
    container_amount: f64,
    unit: Unit,
    fill_volume_ml: f64,
    guard: ExecutionGuard,
}

impl<'c> AddMedication<'c> {
    pub fn new(
        conn: &'c Connection,
        code: String,
        name: String,
        container_amount: f64,
        unit: Unit,
        fill_volume_ml: f64,
    ) -> Self {
        Self {
            conn,
            code,
            name,
            container_amount,
            unit,
            fill_volume_ml,
            guard: ExecutionGuard::default(),
        }
    }
}

impl Command for AddMedication<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("add_medication")?;

        rules::validate_medication_code(&self.code)?;
        rules::validate_display_name(&self.name)?;
        rules::validate_amount_magnitude(self.container_amount)?;
        if !self.fill_volume_ml.is_finite() || self.fill_volume_ml <= 0.0 {
            return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
                .with_op("add_medication")
                .with_medication(&self.code)
                .with_message(format!(
                    "fill volume must be positive, got {}",
                    self.fill_volume_ml
                )));
        }

        let canonical = conversion::to_canonical(self.container_amount, self.unit)?;

        if SqliteRepo::get_medication(self.conn, &self.code)?.is_some() {
            return Err(TrackerError::new(TrackerErrorKind::AlreadyExists)
                .with_op("add_medication")
                .with_medication(&self.code)
                .with_message("a medication with this code is already registered"));
        }

        let medication = Medication::new(
            self.code.clone(),
            self.name.clone(),
            canonical,
            self.unit,
            self.fill_volume_ml,
        );
        SqliteRepo::insert_medication(self.conn, &medication)?;

        tracing::info!(code = %self.code, "medication registered");
        Ok(())
    }
}

/// Change a medication's lifecycle status
pub struct UpdateMedicationStatus<'c> {
    conn: &'c Connection,
    code: String,
    status: MedicationStatus,
    guard: ExecutionGuard,
}

impl<'c> UpdateMedicationStatus<'c> {
    pub fn new(conn: &'c Connection, code: String, status: MedicationStatus) -> Self {
        Self {
            conn,
            code,
            status,
            guard: ExecutionGuard::default(),
        }
    }
}

impl Command for UpdateMedicationStatus<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("update_medication_status")?;

        let changed = SqliteRepo::update_medication_status(
            self.conn,
            &self.code,
            self.status.as_str(),
            Utc::now(),
        )?;
        if !changed {
            return Err(TrackerError::new(TrackerErrorKind::NotFound)
                .with_op("update_medication_status")
                .with_medication(&self.code)
                .with_message("no medication with this code"));
        }

        tracing::info!(code = %self.code, status = %self.status, "medication status updated");
        Ok(())
    }
}

/// Remove a medication that has no recorded adjustments
pub struct DeleteMedication<'c> {
    conn: &'c Connection,
    code: String,
    guard: ExecutionGuard,
}

impl<'c> DeleteMedication<'c> {
    pub fn new(conn: &'c Connection, code: String) -> Self {
        Self {
            conn,
            code,
            guard: ExecutionGuard::default(),
        }
    }
}

impl Command for DeleteMedication<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("delete_medication")?;

        let changed = SqliteRepo::delete_medication(self.conn, &self.code).map_err(|e| {
            if e.kind() == TrackerErrorKind::ConstraintViolation {
                TrackerError::new(TrackerErrorKind::ConstraintViolation)
                    .with_op("delete_medication")
                    .with_medication(&self.code)
                    .with_message("medication has recorded adjustments; the audit trail is retained")
                    .with_source(e)
            } else {
                e
            }
        })?;
        if !changed {
            return Err(TrackerError::new(TrackerErrorKind::NotFound)
                .with_op("delete_medication")
                .with_medication(&self.code)
                .with_message("no medication with this code"));
        }

        tracing::info!(code = %self.code, "medication deleted");
        Ok(())
    }
}
