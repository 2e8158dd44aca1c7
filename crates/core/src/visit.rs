//! Visit records attached to a patient's timeline.

use crate::validation::validate_body_temperature;
use crate::ClinicResult;
use chrono::NaiveDateTime;

/// Display format for visit timestamps (ISO local date-time).
pub const VISIT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single visit.
///
/// Body temperature is rounded to one decimal place when the record is created. Records start
/// incomplete; [`ClinicService::complete_visit`](crate::ClinicService::complete_visit) is the
/// only transition.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VisitRecord {
    visit_time: NaiveDateTime,
    chief_complaint: String,
    body_temperature: f64,
    complete: bool,
}

impl VisitRecord {
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`](crate::ClinicError::InvalidInput) if the
    /// temperature is not a finite number.
    pub fn new(
        visit_time: NaiveDateTime,
        chief_complaint: impl Into<String>,
        body_temperature: f64,
    ) -> ClinicResult<Self> {
        validate_body_temperature(body_temperature)?;

        Ok(Self {
            visit_time,
            chief_complaint: chief_complaint.into().trim().to_string(),
            body_temperature: (body_temperature * 10.0).round() / 10.0,
            complete: false,
        })
    }

    pub fn visit_time(&self) -> NaiveDateTime {
        self.visit_time
    }

    pub fn chief_complaint(&self) -> &str {
        &self.chief_complaint
    }

    pub fn body_temperature(&self) -> f64 {
        self.body_temperature
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }
}

impl std::fmt::Display for VisitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Visit on {}: Complaint: {}, Temperature: {:.1}°C, Completed: {}",
            self.visit_time.format(VISIT_TIME_FORMAT),
            self.chief_complaint,
            self.body_temperature,
            if self.complete { "Yes" } else { "No" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn temperature_is_rounded_to_one_decimal() {
        let visit = VisitRecord::new(at(2024, 3, 1), "Fever", 38.26).unwrap();
        assert_eq!(visit.body_temperature(), 38.3);

        let visit = VisitRecord::new(at(2024, 3, 1), "Chills", 36.04).unwrap();
        assert_eq!(visit.body_temperature(), 36.0);
    }

    #[test]
    fn new_visits_are_incomplete_until_marked() {
        let mut visit = VisitRecord::new(at(2024, 3, 1), "Checkup", 36.6).unwrap();
        assert!(!visit.is_complete());
        visit.mark_complete();
        assert!(visit.is_complete());
    }

    #[test]
    fn rejects_non_finite_temperature() {
        assert!(VisitRecord::new(at(2024, 3, 1), "Checkup", f64::NAN).is_err());
        assert!(VisitRecord::new(at(2024, 3, 1), "Checkup", f64::INFINITY).is_err());
    }

    #[test]
    fn display_matches_visit_summary_format() {
        let visit = VisitRecord::new(at(2024, 3, 1), " Flu ", 37.1).unwrap();
        assert_eq!(
            visit.to_string(),
            "Visit on 2024-03-01T09:30:00: Complaint: Flu, Temperature: 37.1°C, Completed: No"
        );
    }
}
