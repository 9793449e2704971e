//! Seed Format v0 schema
//!
//! Defines the YAML structure for seed import

use narcotrack_core::model::Unit;
use serde::{Deserialize, Serialize};

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Agency the seed belongs to
    pub agency: SeedAgency,

    /// Medications to register (upserted by code)
    pub medications: Vec<SeedMedication>,

    /// Opening stock recorded as IMPORT adjustments
    #[serde(default)]
    pub opening_stock: Vec<SeedStock>,
}

/// Agency metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAgency {
    /// Agency name
    pub name: String,
}

/// Medication definition in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMedication {
    /// Medication code (stable across imports)
    pub code: String,

    /// Display name
    pub name: String,

    /// Active substance per container, in `unit`
    pub container_amount: f64,

    /// Unit the container amount is expressed in
    pub unit: Unit,

    /// Container fill volume in milliliters
    pub fill_volume_ml: f64,
}

/// Opening stock entry in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedStock {
    /// Code of the medication the stock belongs to
    pub medication: String,

    /// Amount on hand, in `unit`
    pub amount: f64,

    /// Unit the amount is expressed in
    pub unit: Unit,

    /// Optional free-text reference for the count
    #[serde(default)]
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_seed() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: fentanyl
    name: "Fentanyl citrate"
    container_amount: 100
    unit: mcg
    fill_volume_ml: 2.0
"#;

        let seed: SeedV0 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.schema_version, 0);
        assert_eq!(seed.agency.name, "Example VAC");
        assert_eq!(seed.medications.len(), 1);
        assert_eq!(seed.medications[0].code, "fentanyl");
        assert_eq!(seed.medications[0].unit, Unit::Mcg);
        assert!(seed.opening_stock.is_empty());
    }

    #[test]
    fn test_parse_opening_stock() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: midazolam
    name: "Midazolam"
    container_amount: 10
    unit: mg
    fill_volume_ml: 2.0
opening_stock:
  - medication: midazolam
    amount: 50
    unit: mg
    reference: "initial count"
"#;

        let seed: SeedV0 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.opening_stock.len(), 1);
        assert_eq!(seed.opening_stock[0].unit, Unit::Mg);
        assert_eq!(
            seed.opening_stock[0].reference.as_deref(),
            Some("initial count")
        );
    }

    #[test]
    fn test_reject_unknown_unit() {
        let yaml = r#"
schema_version: 0
agency:
  name: Example VAC
medications:
  - code: saline
    name: "Saline"
    container_amount: 100
    unit: ml
    fill_volume_ml: 100.0
"#;

        let result: Result<SeedV0, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
