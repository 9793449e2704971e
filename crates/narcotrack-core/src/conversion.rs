//! Unit conversion
//!
//! All amounts are stored canonically as integer micrograms. Conversion in
//! is checked: values that are not finite, negative, fractional after
//! scaling, or too large to represent exactly are rejected rather than
//! silently rounded, so stored deltas always reconcile exactly.

use crate::errors::{Result, TrackerError, TrackerErrorKind};
use crate::model::Unit;

/// Largest magnitude an f64 can hold with integer exactness (2^53)
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Tolerance for f64 scaling noise when checking for fractional micrograms
const FRACT_EPSILON: f64 = 1e-6;

/// Convert an amount in the given unit to canonical micrograms
pub fn to_canonical(amount: f64, unit: Unit) -> Result<i64> {
    if !amount.is_finite() {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_op("to_canonical")
            .with_message(format!("amount must be finite, got {}", amount)));
    }
    if amount < 0.0 {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_op("to_canonical")
            .with_message(format!("amount must not be negative, got {}", amount)));
    }

    let scaled = amount * unit.factor() as f64;
    if scaled > MAX_EXACT {
        return Err(TrackerError::new(TrackerErrorKind::ConversionOverflow)
            .with_op("to_canonical")
            .with_message(format!(
                "{} {} exceeds the exactly representable range",
                amount, unit
            )));
    }

    let rounded = scaled.round();
    if (scaled - rounded).abs() > FRACT_EPSILON {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_op("to_canonical")
            .with_message(format!(
                "{} {} is not a whole number of micrograms",
                amount, unit
            )));
    }

    Ok(rounded as i64)
}

/// Convert canonical micrograms to the given unit
pub fn from_canonical(mcg: i64, unit: Unit) -> f64 {
    mcg as f64 / unit.factor() as f64
}

/// Volume in milliliters equivalent to a mass amount at a concentration
pub fn milliliters(mcg: i64, concentration_mcg_per_ml: f64) -> Result<f64> {
    if !concentration_mcg_per_ml.is_finite() || concentration_mcg_per_ml <= 0.0 {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_op("milliliters")
            .with_message(format!(
                "concentration must be positive, got {}",
                concentration_mcg_per_ml
            )));
    }

    Ok(mcg as f64 / concentration_mcg_per_ml)
}
