use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventKind;

/// A single change to a medication's on-hand stock
///
/// The delta is stored with the event's sign already applied, so the balance
/// of a medication is always `SUM(delta_mcg)` over its adjustments.
/// Adjustments are append-only audit records; they are only ever deleted
/// while their reporting period is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// When the stock change occurred
    pub occurred_at: DateTime<Utc>,

    /// Which catalog event caused the change
    pub event: EventKind,

    /// Code of the medication affected
    pub medication_code: String,

    /// Signed stock change in canonical micrograms
    pub delta_mcg: i64,

    /// Reporting period this adjustment belongs to
    pub reporting_period_id: i64,

    /// Optional free-text reference (incident or PCR number)
    pub reference: Option<String>,

    /// Timestamp when this adjustment was recorded
    pub created_at: DateTime<Utc>,
}

impl Adjustment {
    /// Create an adjustment from an unsigned amount, applying the event sign
    pub fn new(
        id: String,
        occurred_at: DateTime<Utc>,
        event: EventKind,
        medication_code: String,
        amount_mcg: i64,
        reporting_period_id: i64,
        reference: Option<String>,
    ) -> Self {
        Self {
            id,
            occurred_at,
            event,
            medication_code,
            delta_mcg: event.sign() * amount_mcg,
            reporting_period_id,
            reference,
            created_at: Utc::now(),
        }
    }

    /// Unsigned magnitude of the stock change
    pub fn amount_mcg(&self) -> i64 {
        self.delta_mcg.abs()
    }

    /// Check if this adjustment moves stock in
    pub fn is_inbound(&self) -> bool {
        self.delta_mcg > 0
    }
}
