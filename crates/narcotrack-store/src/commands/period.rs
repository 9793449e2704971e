//! Reporting period commands

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::commands::{Command, ExecutionGuard};
use crate::errors::Result;
use crate::repo::SqliteRepo;
use narcotrack_core::{TrackerError, TrackerErrorKind};

/// Open a new reporting period
///
/// At most one period is open at a time. The assigned id is available
/// through [`OpenReportingPeriod::period_id`] after execution.
pub struct OpenReportingPeriod<'c> {
    conn: &'c Connection,
    starts_at: DateTime<Utc>,
    period_id: Option<i64>,
    guard: ExecutionGuard,
}

impl<'c> OpenReportingPeriod<'c> {
    pub fn new(conn: &'c Connection, starts_at: DateTime<Utc>) -> Self {
        Self {
            conn,
            starts_at,
            period_id: None,
            guard: ExecutionGuard::default(),
        }
    }

    /// Id of the opened period (set once `execute` succeeds)
    pub fn period_id(&self) -> Option<i64> {
        self.period_id
    }
}

impl Command for OpenReportingPeriod<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("open_reporting_period")?;

        if let Some(open) = SqliteRepo::get_open_period(self.conn)? {
            return Err(TrackerError::new(TrackerErrorKind::AlreadyExists)
                .with_op("open_reporting_period")
                .with_period(open.id)
                .with_message("a reporting period is already open"));
        }

        let id = SqliteRepo::insert_period(self.conn, self.starts_at)?;

        tracing::info!(period_id = id, "reporting period opened");
        self.period_id = Some(id);
        Ok(())
    }
}

/// Close the open reporting period
pub struct CloseReportingPeriod<'c> {
    conn: &'c Connection,
    ends_at: DateTime<Utc>,
    period_id: Option<i64>,
    guard: ExecutionGuard,
}

impl<'c> CloseReportingPeriod<'c> {
    pub fn new(conn: &'c Connection, ends_at: DateTime<Utc>) -> Self {
        Self {
            conn,
            ends_at,
            period_id: None,
            guard: ExecutionGuard::default(),
        }
    }

    /// Id of the closed period (set once `execute` succeeds)
    pub fn period_id(&self) -> Option<i64> {
        self.period_id
    }
}

impl Command for CloseReportingPeriod<'_> {
    fn execute(&mut self) -> Result<()> {
        self.guard.begin("close_reporting_period")?;

        let open = SqliteRepo::get_open_period(self.conn)?.ok_or_else(|| {
            TrackerError::new(TrackerErrorKind::NoOpenPeriod)
                .with_op("close_reporting_period")
                .with_message("no reporting period is open")
        })?;

        if self.ends_at < open.starts_at {
            return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
                .with_op("close_reporting_period")
                .with_period(open.id)
                .with_message("period cannot end before it started"));
        }

        SqliteRepo::close_period(self.conn, open.id, self.ends_at)?;

        tracing::info!(period_id = open.id, "reporting period closed");
        self.period_id = Some(open.id);
        Ok(())
    }
}
