//! Input validation utilities.
//!
//! Checks applied before values reach the entity model, shared by direct engine calls and the
//! ingestion parser.

use crate::{ClinicError, ClinicResult};

/// Validates that a body temperature is a usable number.
///
/// # Errors
///
/// Returns a `ClinicError::InvalidInput` for NaN or infinite values.
pub fn validate_body_temperature(temperature: f64) -> ClinicResult<()> {
    if !temperature.is_finite() {
        return Err(ClinicError::InvalidInput(format!(
            "body temperature must be a finite number, got {temperature}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_temperatures() {
        validate_body_temperature(36.6).unwrap();
        validate_body_temperature(-1.0).unwrap();
    }

    #[test]
    fn rejects_non_finite_temperature() {
        let err = validate_body_temperature(f64::NAN).expect_err("expected NaN to fail");
        assert!(matches!(err, ClinicError::InvalidInput(_)));
        assert!(validate_body_temperature(f64::INFINITY).is_err());
    }
}
