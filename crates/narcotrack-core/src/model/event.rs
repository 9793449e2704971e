use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Catalog of inventory adjustment events
///
/// Each event moves stock in exactly one direction. The enum is the
/// authoritative catalog; the `adjustments` table mirrors it with a CHECK
/// constraint on the stored code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// Stock brought in from outside the ordering process (e.g. agency merge)
    Import,
    /// Stock received from a supplier order
    Order,
    /// Administration to a patient
    Use,
    /// Partial dose wasted after administration
    Waste,
    /// Stock destroyed (expired or recalled)
    Destroy,
    /// Stock lost or unaccounted for
    Loss,
}

impl EventKind {
    /// Stable uppercase wire code
    pub fn code(&self) -> &'static str {
        match self {
            EventKind::Import => "IMPORT",
            EventKind::Order => "ORDER",
            EventKind::Use => "USE",
            EventKind::Waste => "WASTE",
            EventKind::Destroy => "DESTROY",
            EventKind::Loss => "LOSS",
        }
    }

    /// Direction the event moves stock: +1 in, -1 out
    pub fn sign(&self) -> i64 {
        match self {
            EventKind::Import | EventKind::Order => 1,
            EventKind::Use | EventKind::Waste | EventKind::Destroy | EventKind::Loss => -1,
        }
    }

    /// All catalog members, in wire-code order
    pub fn all() -> [EventKind; 6] {
        [
            EventKind::Import,
            EventKind::Order,
            EventKind::Use,
            EventKind::Waste,
            EventKind::Destroy,
            EventKind::Loss,
        ]
    }
}

impl std::str::FromStr for EventKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IMPORT" => Ok(EventKind::Import),
            "ORDER" => Ok(EventKind::Order),
            "USE" => Ok(EventKind::Use),
            "WASTE" => Ok(EventKind::Waste),
            "DESTROY" => Ok(EventKind::Destroy),
            "LOSS" => Ok(EventKind::Loss),
            other => Err(TrackerError::new(TrackerErrorKind::InvalidInput)
                .with_message(format!("unknown event code '{}'", other))),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signs_partition_the_catalog() {
        let inbound: Vec<_> = EventKind::all().into_iter().filter(|e| e.sign() > 0).collect();
        let outbound: Vec<_> = EventKind::all().into_iter().filter(|e| e.sign() < 0).collect();

        assert_eq!(inbound, vec![EventKind::Import, EventKind::Order]);
        assert_eq!(outbound.len(), 4);
    }

    #[test]
    fn test_round_trip_wire_codes() {
        for event in EventKind::all() {
            let parsed: EventKind = event.code().parse().unwrap();
            assert_eq!(parsed, event);
        }
    }

    #[test]
    fn test_reject_unknown_code() {
        assert!("TRANSFER".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&EventKind::Use).unwrap(), "\"USE\"");
        let parsed: EventKind = serde_json::from_str("\"WASTE\"").unwrap();
        assert_eq!(parsed, EventKind::Waste);
    }
}
