use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::unit::Unit;
use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Lifecycle status of a tracked medication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    /// In the active formulary, stock movements expected
    Active,
    /// Temporarily out of the formulary, history retained
    Inactive,
    /// Permanently removed from the formulary
    Discontinued,
}

impl MedicationStatus {
    /// Stable lowercase wire code
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "active",
            MedicationStatus::Inactive => "inactive",
            MedicationStatus::Discontinued => "discontinued",
        }
    }
}

impl std::str::FromStr for MedicationStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(MedicationStatus::Active),
            "inactive" => Ok(MedicationStatus::Inactive),
            "discontinued" => Ok(MedicationStatus::Discontinued),
            other => Err(TrackerError::new(TrackerErrorKind::InvalidInput).with_message(format!(
                "unknown medication status '{}', expected active, inactive, or discontinued",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A controlled substance tracked by the agency
///
/// The medication row describes the container the agency stocks (e.g.
/// fentanyl, 100 mcg in a 2 ml vial). On-hand stock is never stored here;
/// it is always the signed sum of the medication's adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Unique lowercase code identifying the medication (e.g. "fentanyl")
    pub code: String,

    /// Human-readable display name
    pub name: String,

    /// Active substance per container, in canonical micrograms
    pub container_amount_mcg: i64,

    /// Unit used when displaying amounts of this medication
    pub preferred_unit: Unit,

    /// Container fill volume in milliliters
    pub fill_volume_ml: f64,

    /// Lifecycle status
    pub status: MedicationStatus,

    /// Timestamp when this medication was registered
    pub created_at: DateTime<Utc>,

    /// Timestamp when this medication was last updated
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    /// Create a new active medication with current timestamps
    pub fn new(
        code: String,
        name: String,
        container_amount_mcg: i64,
        preferred_unit: Unit,
        fill_volume_ml: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            code,
            name,
            container_amount_mcg,
            preferred_unit,
            fill_volume_ml,
            status: MedicationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Concentration of the container in mcg per ml
    pub fn concentration_mcg_per_ml(&self) -> f64 {
        self.container_amount_mcg as f64 / self.fill_volume_ml
    }

    /// Check if stock movements are expected for this medication
    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }
}
