use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Mass unit a medication amount can be expressed in
///
/// Amounts are stored canonically in micrograms; `Unit` only affects how
/// values enter and leave the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mcg,
    Mg,
    G,
}

impl Unit {
    /// Micrograms per one of this unit
    pub fn factor(&self) -> i64 {
        match self {
            Unit::Mcg => 1,
            Unit::Mg => 1_000,
            Unit::G => 1_000_000,
        }
    }

    /// Stable lowercase wire code
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mcg => "mcg",
            Unit::Mg => "mg",
            Unit::G => "g",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mcg" => Ok(Unit::Mcg),
            "mg" => Ok(Unit::Mg),
            "g" => Ok(Unit::G),
            other => Err(TrackerError::new(TrackerErrorKind::InvalidUnit)
                .with_message(format!("unknown unit '{}', expected mcg, mg, or g", other))),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_wire_codes() {
        for unit in [Unit::Mcg, Unit::Mg, Unit::G] {
            let parsed: Unit = unit.as_str().parse().unwrap();
            assert_eq!(parsed, unit);
        }
    }

    #[test]
    fn test_reject_unknown_unit() {
        let err = "ml".parse::<Unit>().unwrap_err();
        assert_eq!(err.kind(), TrackerErrorKind::InvalidUnit);
    }

    #[test]
    fn test_factors() {
        assert_eq!(Unit::Mcg.factor(), 1);
        assert_eq!(Unit::Mg.factor(), 1_000);
        assert_eq!(Unit::G.factor(), 1_000_000);
    }
}
