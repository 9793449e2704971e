//! Inventory adjustment commands

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::commands::{Command, ExecutionGuard};
use crate::errors::Result;
use crate::repo::SqliteRepo;
use narcotrack_core::model::{Adjustment, EventKind, Unit};
use narcotrack_core::{conversion, rules, TrackerError, TrackerErrorKind};

/// Record a single change to a medication's on-hand stock
///
/// Resolves the open reporting period, checks the conservation invariant
/// (the balance may not go negative), and inserts the signed delta. The
/// generated adjustment id is available through [`RecordAdjustment::adjustment_id`]
/// after execution.
pub struct RecordAdjustment<'c> {
    conn: &'c Connection,
    occurred_at: DateTime<Utc>,
    event: EventKind,
    medication_code: String,
    amount: f64,
    unit: Unit,
    reference: Option<String>,
    adjustment_id: Option<String>,
    guard: ExecutionGuard,
}

impl<'c> RecordAdjustment<'c> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conn: &'c Connection,
        occurred_at: DateTime<Utc>,
        event: EventKind,
        medication_code: String,
        amount: f64,
        unit: Unit,
        reference: Option<String>,
    ) -> Self {
        Self {
            conn,
            occurred_at,
            event,
            medication_code,
            amount,
            unit,
            reference,
            adjustment_id: None,
            guard: ExecutionGuard::default(),
        }
    }

    /// Id of the recorded adjustment (set once `execute` succeeds)
    pub fn adjustment_id(&self) -> Option<&str> {
        self.adjustment_id.as_deref()
    }
}

impl Command for RecordAdjustment<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("record_adjustment")?;

        rules::validate_amount_magnitude(self.amount)?;
        let amount_mcg = conversion::to_canonical(self.amount, self.unit)?;
        if amount_mcg == 0 {
            return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
                .with_op("record_adjustment")
                .with_message("amount is below one microgram"));
        }

        let medication = SqliteRepo::get_medication(self.conn, &self.medication_code)?
            .ok_or_else(|| {
                TrackerError::new(TrackerErrorKind::NotFound)
                    .with_op("record_adjustment")
                    .with_medication(&self.medication_code)
                    .with_message("no medication with this code")
            })?;

        // Outbound events stay recordable for inactive medications (waste
        // and destruction must always be bookable); inbound stock is not.
        if !medication.is_active() && self.event.sign() > 0 {
            return Err(TrackerError::new(TrackerErrorKind::ConstraintViolation)
                .with_op("record_adjustment")
                .with_medication(&self.medication_code)
                .with_message(format!(
                    "cannot receive stock for a medication with status '{}'",
                    medication.status
                )));
        }

        let period = SqliteRepo::get_open_period(self.conn)?.ok_or_else(|| {
            TrackerError::new(TrackerErrorKind::NoOpenPeriod)
                .with_op("record_adjustment")
                .with_message("open a reporting period before recording adjustments")
        })?;
        if self.occurred_at < period.starts_at {
            return Err(TrackerError::new(TrackerErrorKind::PeriodClosed)
                .with_op("record_adjustment")
                .with_period(period.id)
                .with_message("occurred before the open reporting period started"));
        }

        if self.event.sign() < 0 {
            let balance = SqliteRepo::medication_balance(self.conn, &self.medication_code)?;
            if balance - amount_mcg < 0 {
                return Err(TrackerError::new(TrackerErrorKind::InsufficientStock)
                    .with_op("record_adjustment")
                    .with_medication(&self.medication_code)
                    .with_message(format!(
                        "balance is {} mcg, adjustment removes {} mcg",
                        balance, amount_mcg
                    )));
            }
        }

        let id = Uuid::now_v7().to_string();
        let adjustment = Adjustment::new(
            id.clone(),
            self.occurred_at,
            self.event,
            self.medication_code.clone(),
            amount_mcg,
            period.id,
            self.reference.clone(),
        );
        SqliteRepo::insert_adjustment(self.conn, &adjustment)?;

        tracing::info!(
            adjustment_id = %id,
            medication = %self.medication_code,
            event = %self.event,
            delta_mcg = adjustment.delta_mcg,
            "adjustment recorded"
        );
        self.adjustment_id = Some(id);
        Ok(())
    }
}

/// Remove an adjustment recorded in error
///
/// Only allowed while the owning reporting period is still open; closed
/// periods are immutable audit history.
pub struct DeleteAdjustment<'c> {
    conn: &'c Connection,
    id: String,
    guard: ExecutionGuard,
}

impl<'c> DeleteAdjustment<'c> {
    pub fn new(conn: &'c Connection, id: String) -> Self {
        Self {
            conn,
            id,
            guard: ExecutionGuard::default(),
        }
    }
}

impl Command for DeleteAdjustment<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("delete_adjustment")?;

        let adjustment = SqliteRepo::get_adjustment(self.conn, &self.id)?.ok_or_else(|| {
            TrackerError::new(TrackerErrorKind::NotFound)
                .with_op("delete_adjustment")
                .with_adjustment(&self.id)
                .with_message("no adjustment with this id")
        })?;

        let period = SqliteRepo::get_period(self.conn, adjustment.reporting_period_id)?
            .ok_or_else(|| {
                TrackerError::new(TrackerErrorKind::Internal)
                    .with_op("delete_adjustment")
                    .with_adjustment(&self.id)
                    .with_message("adjustment references a missing reporting period")
            })?;
        if !period.is_open() {
            return Err(TrackerError::new(TrackerErrorKind::PeriodClosed)
                .with_op("delete_adjustment")
                .with_adjustment(&self.id)
                .with_period(period.id)
                .with_message("adjustments in a closed period are immutable"));
        }

        // Removing an inbound adjustment must not leave the balance negative
        if adjustment.delta_mcg > 0 {
            let balance =
                SqliteRepo::medication_balance(self.conn, &adjustment.medication_code)?;
            if balance - adjustment.delta_mcg < 0 {
                return Err(TrackerError::new(TrackerErrorKind::InsufficientStock)
                    .with_op("delete_adjustment")
                    .with_adjustment(&self.id)
                    .with_medication(&adjustment.medication_code)
                    .with_message("removing this receipt would drive the balance negative"));
            }
        }

        SqliteRepo::delete_adjustment(self.conn, &self.id)?;

        tracing::info!(adjustment_id = %self.id, "adjustment deleted");
        Ok(())
    }
}
