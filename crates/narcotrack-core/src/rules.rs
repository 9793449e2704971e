//! Validation rules
//!
//! Input checks shared by the command layer and the seed parser.

use crate::errors::{Result, TrackerError, TrackerErrorKind};

/// Validate a medication code
///
/// Codes are lowercase ASCII alphanumerics plus `-` and `_`, non-empty.
/// They appear in adjustment rows and report output, so the format is
/// deliberately narrow.
pub fn validate_medication_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(TrackerError::new(TrackerErrorKind::InvalidCode)
            .with_message("medication code cannot be empty"));
    }

    let valid = code
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(TrackerError::new(TrackerErrorKind::InvalidCode)
            .with_medication(code)
            .with_message(
                "medication code must be lowercase ASCII alphanumeric, '-', or '_'",
            ));
    }

    Ok(())
}

/// Validate a display name (non-empty after trimming)
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_message("display name cannot be empty"));
    }
    Ok(())
}

/// Validate an adjustment amount magnitude before the event sign is applied
pub fn validate_amount_magnitude(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TrackerError::new(TrackerErrorKind::InvalidInput)
            .with_message(format!("amount must be positive, got {}", amount)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert!(validate_medication_code("fentanyl").is_ok());
        assert!(validate_medication_code("midazolam-5").is_ok());
        assert!(validate_medication_code("morphine_sulfate").is_ok());
    }

    #[test]
    fn test_invalid_codes() {
        assert!(validate_medication_code("").is_err());
        assert!(validate_medication_code("Fentanyl").is_err());
        assert!(validate_medication_code("fentanyl 100").is_err());

        let err = validate_medication_code("Fentanyl").unwrap_err();
        assert_eq!(err.kind(), TrackerErrorKind::InvalidCode);
    }

    #[test]
    fn test_display_name() {
        assert!(validate_display_name("Fentanyl citrate").is_ok());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn test_amount_magnitude() {
        assert!(validate_amount_magnitude(0.5).is_ok());
        assert!(validate_amount_magnitude(0.0).is_err());
        assert!(validate_amount_magnitude(-2.0).is_err());
        assert!(validate_amount_magnitude(f64::NAN).is_err());
    }
}
