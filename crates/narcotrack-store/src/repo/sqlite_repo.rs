//! SQLite repository implementation
//!
//! Persists medications, adjustments, and reporting periods

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use chrono::{DateTime, Utc};
use narcotrack_core::model::{
    Adjustment, Medication, PeriodStatus, ReportingPeriod,
};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// SQLite repository for the inventory tables
pub struct SqliteRepo;

/// Parse a TEXT column through FromStr inside a row-mapping closure
fn text_to<T: std::str::FromStr>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

impl SqliteRepo {
    /// Persist a medication (insert or update by code)
    pub fn persist_medication(conn: &Connection, medication: &Medication) -> Result<()> {
        conn.execute(
            "INSERT INTO medications (code, name, container_amount_mcg, preferred_unit, fill_volume_ml, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                container_amount_mcg = excluded.container_amount_mcg,
                preferred_unit = excluded.preferred_unit,
                fill_volume_ml = excluded.fill_volume_ml,
                status = excluded.status,
                updated_at = excluded.updated_at",
            rusqlite::params![
                medication.code,
                medication.name,
                medication.container_amount_mcg,
                medication.preferred_unit.as_str(),
                medication.fill_volume_ml,
                medication.status.as_str(),
                medication.created_at.timestamp(),
                medication.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Persist a medication within a transaction
    pub fn persist_medication_tx(tx: &Transaction, medication: &Medication) -> Result<()> {
        Self::persist_medication(tx, medication)
    }

    /// Insert a medication, failing on a duplicate code
    pub fn insert_medication(conn: &Connection, medication: &Medication) -> Result<()> {
        conn.execute(
            "INSERT INTO medications (code, name, container_amount_mcg, preferred_unit, fill_volume_ml, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                medication.code,
                medication.name,
                medication.container_amount_mcg,
                medication.preferred_unit.as_str(),
                medication.fill_volume_ml,
                medication.status.as_str(),
                medication.created_at.timestamp(),
                medication.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Get a medication by code
    pub fn get_medication(conn: &Connection, code: &str) -> Result<Option<Medication>> {
        let mut stmt = conn
            .prepare(
                "SELECT code, name, container_amount_mcg, preferred_unit, fill_volume_ml, status, created_at, updated_at
                 FROM medications WHERE code = ?",
            )
            .map_err(from_rusqlite)?;

        let result = stmt
            .query_row([code], Self::map_medication_row)
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// List all medications ordered by code
    pub fn list_medications(conn: &Connection) -> Result<Vec<Medication>> {
        let mut stmt = conn
            .prepare(
                "SELECT code, name, container_amount_mcg, preferred_unit, fill_volume_ml, status, created_at, updated_at
                 FROM medications ORDER BY code",
            )
            .map_err(from_rusqlite)?;

        let medications = stmt
            .query_map([], Self::map_medication_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(medications)
    }

    /// Update a medication's status, returning whether a row changed
    pub fn update_medication_status(
        conn: &Connection,
        code: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE medications SET status = ?2, updated_at = ?3 WHERE code = ?1",
                rusqlite::params![code, status, updated_at.timestamp()],
            )
            .map_err(from_rusqlite)?;

        Ok(changed > 0)
    }

    /// Delete a medication, returning whether a row changed
    ///
    /// The adjustments foreign key restricts this when history exists.
    pub fn delete_medication(conn: &Connection, code: &str) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM medications WHERE code = ?", [code])
            .map_err(from_rusqlite)?;

        Ok(changed > 0)
    }

    fn map_medication_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Medication> {
        let code: String = row.get(0)?;
        let name: String = row.get(1)?;
        let container_amount_mcg: i64 = row.get(2)?;
        let preferred_unit: String = row.get(3)?;
        let fill_volume_ml: f64 = row.get(4)?;
        let status: String = row.get(5)?;
        let created_at: i64 = row.get(6)?;
        let updated_at: i64 = row.get(7)?;

        let mut medication = Medication::new(
            code,
            name,
            container_amount_mcg,
            text_to(3, &preferred_unit)?,
            fill_volume_ml,
        );
        medication.status = text_to(5, &status)?;
        medication.created_at = timestamp_to_datetime(created_at);
        medication.updated_at = timestamp_to_datetime(updated_at);

        Ok(medication)
    }

    /// Insert an adjustment
    pub fn insert_adjustment(conn: &Connection, adjustment: &Adjustment) -> Result<()> {
        conn.execute(
            "INSERT INTO adjustments (id, occurred_at, event_code, medication_code, delta_mcg, reporting_period_id, reference, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                adjustment.id,
                adjustment.occurred_at.timestamp(),
                adjustment.event.code(),
                adjustment.medication_code,
                adjustment.delta_mcg,
                adjustment.reporting_period_id,
                adjustment.reference,
                adjustment.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Insert an adjustment within a transaction
    pub fn insert_adjustment_tx(tx: &Transaction, adjustment: &Adjustment) -> Result<()> {
        Self::insert_adjustment(tx, adjustment)
    }

    /// Get an adjustment by id
    pub fn get_adjustment(conn: &Connection, id: &str) -> Result<Option<Adjustment>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, occurred_at, event_code, medication_code, delta_mcg, reporting_period_id, reference, created_at
                 FROM adjustments WHERE id = ?",
            )
            .map_err(from_rusqlite)?;

        let result = stmt
            .query_row([id], Self::map_adjustment_row)
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// List adjustments for a reporting period, oldest first
    pub fn list_adjustments_for_period(
        conn: &Connection,
        period_id: i64,
    ) -> Result<Vec<Adjustment>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, occurred_at, event_code, medication_code, delta_mcg, reporting_period_id, reference, created_at
                 FROM adjustments WHERE reporting_period_id = ?
                 ORDER BY occurred_at, id",
            )
            .map_err(from_rusqlite)?;

        let adjustments = stmt
            .query_map([period_id], Self::map_adjustment_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(adjustments)
    }

    /// Delete an adjustment, returning whether a row changed
    pub fn delete_adjustment(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM adjustments WHERE id = ?", [id])
            .map_err(from_rusqlite)?;

        Ok(changed > 0)
    }

    /// Signed balance of a medication in canonical micrograms
    pub fn medication_balance(conn: &Connection, code: &str) -> Result<i64> {
        let balance: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(delta_mcg), 0) FROM adjustments WHERE medication_code = ?",
                [code],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;

        Ok(balance)
    }

    fn map_adjustment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Adjustment> {
        let id: String = row.get(0)?;
        let occurred_at: i64 = row.get(1)?;
        let event_code: String = row.get(2)?;
        let medication_code: String = row.get(3)?;
        let delta_mcg: i64 = row.get(4)?;
        let reporting_period_id: i64 = row.get(5)?;
        let reference: Option<String> = row.get(6)?;
        let created_at: i64 = row.get(7)?;

        let mut adjustment = Adjustment::new(
            id,
            timestamp_to_datetime(occurred_at),
            text_to(2, &event_code)?,
            medication_code,
            delta_mcg.abs(),
            reporting_period_id,
            reference,
        );
        // The stored delta is authoritative; keep it as written
        adjustment.delta_mcg = delta_mcg;
        adjustment.created_at = timestamp_to_datetime(created_at);

        Ok(adjustment)
    }

    /// Open a new reporting period, returning its id
    pub fn insert_period(conn: &Connection, starts_at: DateTime<Utc>) -> Result<i64> {
        conn.execute(
            "INSERT INTO reporting_periods (starts_at, ends_at, status) VALUES (?1, NULL, 'open')",
            [starts_at.timestamp()],
        )
        .map_err(from_rusqlite)?;

        Ok(conn.last_insert_rowid())
    }

    /// Get the currently open reporting period, if any
    pub fn get_open_period(conn: &Connection) -> Result<Option<ReportingPeriod>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, starts_at, ends_at, status FROM reporting_periods
                 WHERE status = 'open' ORDER BY id DESC LIMIT 1",
            )
            .map_err(from_rusqlite)?;

        let result = stmt
            .query_row([], Self::map_period_row)
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// Get a reporting period by id
    pub fn get_period(conn: &Connection, id: i64) -> Result<Option<ReportingPeriod>> {
        let mut stmt = conn
            .prepare("SELECT id, starts_at, ends_at, status FROM reporting_periods WHERE id = ?")
            .map_err(from_rusqlite)?;

        let result = stmt
            .query_row([id], Self::map_period_row)
            .optional()
            .map_err(from_rusqlite)?;

        Ok(result)
    }

    /// List all reporting periods, oldest first
    pub fn list_periods(conn: &Connection) -> Result<Vec<ReportingPeriod>> {
        let mut stmt = conn
            .prepare("SELECT id, starts_at, ends_at, status FROM reporting_periods ORDER BY id")
            .map_err(from_rusqlite)?;

        let periods = stmt
            .query_map([], Self::map_period_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(periods)
    }

    /// Close a reporting period, returning whether a row changed
    pub fn close_period(conn: &Connection, id: i64, ends_at: DateTime<Utc>) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE reporting_periods SET status = 'closed', ends_at = ?2
                 WHERE id = ?1 AND status = 'open'",
                rusqlite::params![id, ends_at.timestamp()],
            )
            .map_err(from_rusqlite)?;

        Ok(changed > 0)
    }

    fn map_period_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportingPeriod> {
        let id: i64 = row.get(0)?;
        let starts_at: i64 = row.get(1)?;
        let ends_at: Option<i64> = row.get(2)?;
        let status: String = row.get(3)?;

        Ok(ReportingPeriod {
            id,
            starts_at: timestamp_to_datetime(starts_at),
            ends_at: ends_at.map(timestamp_to_datetime),
            status: text_to::<PeriodStatus>(3, &status)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use narcotrack_core::model::{EventKind, Unit};

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::db::configure(&conn).unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    fn fentanyl() -> Medication {
        Medication::new(
            "fentanyl".to_string(),
            "Fentanyl citrate".to_string(),
            100,
            Unit::Mcg,
            2.0,
        )
    }

    #[test]
    fn test_persist_and_get_medication() {
        let conn = setup_test_db();

        SqliteRepo::persist_medication(&conn, &fentanyl()).unwrap();

        let retrieved = SqliteRepo::get_medication(&conn, "fentanyl")
            .unwrap()
            .expect("medication should exist");

        assert_eq!(retrieved.code, "fentanyl");
        assert_eq!(retrieved.name, "Fentanyl citrate");
        assert_eq!(retrieved.container_amount_mcg, 100);
        assert_eq!(retrieved.preferred_unit, Unit::Mcg);
        assert!(retrieved.is_active());
    }

    #[test]
    fn test_persist_medication_idempotent() {
        let conn = setup_test_db();
        let mut med = fentanyl();

        SqliteRepo::persist_medication(&conn, &med).unwrap();

        med.name = "Fentanyl (updated)".to_string();
        SqliteRepo::persist_medication(&conn, &med).unwrap();

        let retrieved = SqliteRepo::get_medication(&conn, "fentanyl")
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.name, "Fentanyl (updated)");
        assert_eq!(SqliteRepo::list_medications(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_medication_rejects_duplicate() {
        let conn = setup_test_db();

        SqliteRepo::insert_medication(&conn, &fentanyl()).unwrap();
        let err = SqliteRepo::insert_medication(&conn, &fentanyl()).unwrap_err();
        assert_eq!(
            err.kind(),
            narcotrack_core::TrackerErrorKind::ConstraintViolation
        );
    }

    #[test]
    fn test_adjustment_round_trip_and_balance() {
        let conn = setup_test_db();
        SqliteRepo::persist_medication(&conn, &fentanyl()).unwrap();
        let period_id = SqliteRepo::insert_period(&conn, Utc::now()).unwrap();

        let order = Adjustment::new(
            "adj-1".to_string(),
            Utc::now(),
            EventKind::Order,
            "fentanyl".to_string(),
            1_000,
            period_id,
            None,
        );
        let used = Adjustment::new(
            "adj-2".to_string(),
            Utc::now(),
            EventKind::Use,
            "fentanyl".to_string(),
            100,
            period_id,
            Some("PCR 2024-0815".to_string()),
        );

        SqliteRepo::insert_adjustment(&conn, &order).unwrap();
        SqliteRepo::insert_adjustment(&conn, &used).unwrap();

        assert_eq!(SqliteRepo::medication_balance(&conn, "fentanyl").unwrap(), 900);

        let retrieved = SqliteRepo::get_adjustment(&conn, "adj-2").unwrap().unwrap();
        assert_eq!(retrieved.event, EventKind::Use);
        assert_eq!(retrieved.delta_mcg, -100);
        assert_eq!(retrieved.reference.as_deref(), Some("PCR 2024-0815"));

        let listed = SqliteRepo::list_adjustments_for_period(&conn, period_id).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_delete_medication_with_history_restricted() {
        let conn = setup_test_db();
        SqliteRepo::persist_medication(&conn, &fentanyl()).unwrap();
        let period_id = SqliteRepo::insert_period(&conn, Utc::now()).unwrap();

        let order = Adjustment::new(
            "adj-1".to_string(),
            Utc::now(),
            EventKind::Order,
            "fentanyl".to_string(),
            500,
            period_id,
            None,
        );
        SqliteRepo::insert_adjustment(&conn, &order).unwrap();

        let err = SqliteRepo::delete_medication(&conn, "fentanyl").unwrap_err();
        assert_eq!(
            err.kind(),
            narcotrack_core::TrackerErrorKind::ConstraintViolation
        );
    }

    #[test]
    fn test_period_lifecycle() {
        let conn = setup_test_db();

        assert!(SqliteRepo::get_open_period(&conn).unwrap().is_none());

        let id = SqliteRepo::insert_period(&conn, Utc::now()).unwrap();
        let open = SqliteRepo::get_open_period(&conn).unwrap().unwrap();
        assert_eq!(open.id, id);
        assert!(open.is_open());
        assert!(open.ends_at.is_none());

        assert!(SqliteRepo::close_period(&conn, id, Utc::now()).unwrap());
        assert!(SqliteRepo::get_open_period(&conn).unwrap().is_none());

        // Closing twice changes nothing
        assert!(!SqliteRepo::close_period(&conn, id, Utc::now()).unwrap());

        let closed = SqliteRepo::get_period(&conn, id).unwrap().unwrap();
        assert_eq!(closed.status, PeriodStatus::Closed);
        assert!(closed.ends_at.is_some());
    }
}
