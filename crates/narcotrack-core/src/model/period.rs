use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Status of a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    Open,
    Closed,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "open",
            PeriodStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for PeriodStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(PeriodStatus::Open),
            "closed" => Ok(PeriodStatus::Closed),
            other => Err(TrackerError::new(TrackerErrorKind::InvalidInput)
                .with_message(format!("unknown period status '{}'", other))),
        }
    }
}

/// A reconciliation window for controlled-substance reporting
///
/// At most one period is open at a time. Every adjustment belongs to the
/// period that was open when it was recorded, and adjustments inside a
/// closed period are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Database-assigned identifier
    pub id: i64,

    /// When the period opened
    pub starts_at: DateTime<Utc>,

    /// When the period closed (None while open)
    pub ends_at: Option<DateTime<Utc>>,

    /// Open or closed
    pub status: PeriodStatus,
}

impl ReportingPeriod {
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }
}
