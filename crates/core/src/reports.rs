//! Aggregate and temporal queries over the clinic records.
//!
//! Two different "past year" rules live here and must not be merged:
//!
//! - [`list_inactive_patients`](ClinicService::list_inactive_patients) compares visit
//!   **dates** against the cutoff **date**
//! - [`patient_visit_summary_past_year`](ClinicService::patient_visit_summary_past_year)
//!   compares visit **timestamps** against the cutoff **timestamp**
//!
//! A visit earlier on the same calendar day as the cutoff therefore counts as recent for
//! neither, while a visit later that day counts toward the summary but still leaves the
//! patient inactive.
//!
//! Every time-dependent query has an `_at` variant taking an explicit `now`.

use crate::clinic::ClinicService;
use crate::ids::{RoomId, StaffId};
use crate::patient::Patient;
use crate::staff::Staff;
use chrono::{Local, NaiveDateTime};

/// Visit count for one patient over the lookback window.
#[derive(Debug, serde::Serialize)]
pub struct VisitSummary<'a> {
    pub patient: &'a Patient,
    pub visits: usize,
}

/// A clinician and the patients with open visits they currently treat.
#[derive(Debug, serde::Serialize)]
pub struct StaffPatients<'a> {
    pub staff: &'a Staff,
    pub patients: Vec<&'a Patient>,
}

/// Number of registered patients currently assigned to a staff member.
#[derive(Debug, serde::Serialize)]
pub struct StaffPatientCount<'a> {
    pub staff: &'a Staff,
    pub patients: usize,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl ClinicService {
    /// `now` minus the lookback window, clamped to the earliest representable time.
    fn lookback_cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_sub_signed(self.config().lookback())
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Patients with no visit dated after the cutoff date (today minus the lookback window).
    ///
    /// Patients with no visits at all are always included.
    pub fn list_inactive_patients(&self) -> Vec<&Patient> {
        self.list_inactive_patients_at(local_now())
    }

    pub fn list_inactive_patients_at(&self, now: NaiveDateTime) -> Vec<&Patient> {
        let cutoff_date = self.lookback_cutoff(now).date();
        self.patients()
            .filter(|p| p.visits().iter().all(|v| v.visit_time().date() <= cutoff_date))
            .collect()
    }

    /// For every patient, in registration order, the number of visits with a timestamp
    /// strictly after now minus the lookback window.
    pub fn patient_visit_summary_past_year(&self) -> Vec<VisitSummary<'_>> {
        self.patient_visit_summary_past_year_at(local_now())
    }

    pub fn patient_visit_summary_past_year_at(&self, now: NaiveDateTime) -> Vec<VisitSummary<'_>> {
        let cutoff = self.lookback_cutoff(now);
        self.patients()
            .map(|patient| VisitSummary {
                patient,
                visits: patient.visits_since(cutoff).count(),
            })
            .collect()
    }

    /// Active clinicians treating at least one patient with an incomplete visit.
    ///
    /// Each clinician appears once, in the order first met walking patients by registration.
    pub fn list_active_clinical_staff(&self) -> Vec<&Staff> {
        self.list_active_staff_with_patients()
            .into_iter()
            .map(|entry| entry.staff)
            .filter(|staff| staff.is_active())
            .collect()
    }

    /// Clinicians grouped with every patient they treat that has an incomplete visit.
    ///
    /// Staff activation is not considered here. Ordering follows the first qualifying patient
    /// for each clinician.
    pub fn list_active_staff_with_patients(&self) -> Vec<StaffPatients<'_>> {
        let mut grouped: Vec<StaffPatients<'_>> = Vec::new();

        for patient in self.patients().filter(|p| p.has_incomplete_visit()) {
            for staff_id in patient.clinical_staff() {
                match grouped.iter_mut().find(|e| e.staff.id() == *staff_id) {
                    Some(entry) => entry.patients.push(patient),
                    None => {
                        if let Some(staff) = self.staff_member(*staff_id) {
                            grouped.push(StaffPatients {
                                staff,
                                patients: vec![patient],
                            });
                        }
                    }
                }
            }
        }

        grouped
    }

    /// Every staff member with the number of registered patients listing them as current
    /// staff. Non-clinical staff are always zero.
    pub fn list_staff_patient_counts(&self) -> Vec<StaffPatientCount<'_>> {
        self.staff()
            .map(|staff| StaffPatientCount {
                staff,
                patients: self.patient_count_for(staff.id()),
            })
            .collect()
    }

    fn patient_count_for(&self, staff: StaffId) -> usize {
        self.patients().filter(|p| p.is_treated_by(staff)).count()
    }

    /// Occupancy text for one room: its name and category, then each patient with their latest
    /// visit's complaint and temperature.
    ///
    /// Returns `None` for an unknown room.
    pub fn room_info(&self, room: RoomId) -> Option<String> {
        let room = self.room(room)?;
        let mut info = format!(
            "Room: {} ({})\nPatients and their details:\n",
            room.name(),
            room.category()
        );

        for patient in room.patients().iter().filter_map(|id| self.patient(*id)) {
            let details = match patient.latest_visit() {
                Some(visit) => format!(
                    "Complaint: {}, Temp: {:.1}°C",
                    visit.chief_complaint(),
                    visit.body_temperature()
                ),
                None => "No recent visits".to_string(),
            };
            info.push_str(&format!("{} - {}\n", patient.full_name(), details));
        }

        Some(info)
    }

    /// [`room_info`](Self::room_info) for every room, separated by newlines.
    pub fn seating_chart(&self) -> String {
        self.rooms()
            .filter_map(|room| self.room_info(room.id()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One-line summary of the room at `index`, or `"Room not found"`.
    pub fn room_details(&self, index: usize) -> String {
        self.room_by_index(index)
            .map(|room| room.to_string())
            .unwrap_or_else(|_| "Room not found".to_string())
    }

    /// Room occupancy for display: `"Empty"` or the occupants' names, comma-separated.
    pub fn room_occupancy(&self, room: RoomId) -> Option<String> {
        let room = self.room(room)?;
        if !room.is_occupied() {
            return Some("Empty".to_string());
        }
        let names: Vec<String> = room
            .patients()
            .iter()
            .filter_map(|id| self.patient(*id))
            .map(Patient::full_name)
            .collect();
        Some(names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{Room, RoomBounds};
    use crate::visit::VisitRecord;
    use chrono::{Duration, NaiveDate};
    use clinic_types::{NonEmptyText, PersonName};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn patient(name: &str) -> Patient {
        Patient::new(PersonName::parse(name).unwrap(), "1980-01-01")
    }

    fn doctor(name: &str) -> Staff {
        Staff::clinical(PersonName::parse(name).unwrap(), "MD", "Doctor", None)
    }

    fn visit(at: NaiveDateTime, complaint: &str, temp: f64) -> VisitRecord {
        VisitRecord::new(at, complaint, temp).unwrap()
    }

    fn names(patients: &[&Patient]) -> Vec<String> {
        patients.iter().map(|p| p.full_name()).collect()
    }

    #[test]
    fn inactive_patients_use_date_cutoff() {
        let mut clinic = ClinicService::default();
        let recent = clinic.add_patient(patient("Recent Visitor"));
        let stale = clinic.add_patient(patient("Stale Visitor"));
        clinic.add_patient(patient("Never Visited"));
        let boundary = clinic.add_patient(patient("Boundary Visitor"));

        clinic
            .record_visit(recent, visit(now() - Duration::days(30), "Flu", 37.5))
            .unwrap();
        clinic
            .record_visit(stale, visit(now() - Duration::days(730), "Checkup", 36.5))
            .unwrap();
        // Same calendar day as the cutoff but later in the day: still inactive.
        clinic
            .record_visit(
                boundary,
                visit(now() - Duration::days(365) + Duration::hours(6), "Cough", 37.0),
            )
            .unwrap();

        let inactive = clinic.list_inactive_patients_at(now());
        assert_eq!(
            names(&inactive),
            vec!["Stale Visitor", "Never Visited", "Boundary Visitor"]
        );
    }

    #[test]
    fn visit_summary_uses_timestamp_cutoff() {
        let mut clinic = ClinicService::default();
        let john = clinic.add_patient(patient("John Doe"));
        let jane = clinic.add_patient(patient("Jane Doe"));
        let boundary = clinic.add_patient(patient("Boundary Visitor"));

        clinic
            .record_visit(john, visit(now() - Duration::days(30), "Flu", 37.1))
            .unwrap();
        clinic
            .record_visit(john, visit(now() - Duration::days(150), "Checkup", 36.6))
            .unwrap();
        clinic
            .record_visit(john, visit(now() - Duration::days(500), "Old", 36.6))
            .unwrap();
        clinic
            .record_visit(
                boundary,
                visit(now() - Duration::days(365) + Duration::hours(6), "Cough", 37.0),
            )
            .unwrap();

        let summary = clinic.patient_visit_summary_past_year_at(now());
        let counts: Vec<_> = summary
            .iter()
            .map(|s| (s.patient.id(), s.visits))
            .collect();
        assert_eq!(counts, vec![(john, 2), (jane, 0), (boundary, 1)]);
    }

    #[test]
    fn cutoff_before_earliest_time_clamps_instead_of_overflowing() {
        let mut clinic = ClinicService::default();
        let john = clinic.add_patient(patient("John Doe"));
        clinic.add_patient(patient("Jane Doe"));
        let early = NaiveDateTime::MIN + Duration::days(10);
        clinic.record_visit(john, visit(early, "Flu", 37.0)).unwrap();

        let inactive = clinic.list_inactive_patients_at(early);
        assert_eq!(names(&inactive), vec!["Jane Doe"]);

        let summary = clinic.patient_visit_summary_past_year_at(early);
        assert_eq!(summary[0].visits, 1);
        assert_eq!(summary[1].visits, 0);
    }

    #[test]
    fn active_clinical_staff_need_patient_with_open_visit() {
        let mut clinic = ClinicService::default();
        let alice = clinic.add_staff(doctor("Alice Smith"));
        let bob = clinic.add_staff(doctor("Bob Brown"));
        let carl = clinic.add_staff(doctor("Carl Jones"));
        let john = clinic.add_patient(patient("John Doe"));
        let jane = clinic.add_patient(patient("Jane Doe"));

        clinic
            .record_visit(john, visit(now(), "Flu", 37.1))
            .unwrap();
        clinic
            .record_visit(jane, visit(now(), "Rash", 36.9))
            .unwrap();
        clinic.complete_visit(jane, 0).unwrap();

        clinic.assign_clinical_staff_to_patient(alice, john).unwrap();
        clinic.assign_clinical_staff_to_patient(bob, jane).unwrap();
        clinic.assign_clinical_staff_to_patient(carl, john).unwrap();
        clinic.deactivate_staff(carl).unwrap();

        let active: Vec<_> = clinic
            .list_active_clinical_staff()
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(active, vec![alice]);
    }

    #[test]
    fn staff_with_patients_groups_each_clinician_once() {
        let mut clinic = ClinicService::default();
        let alice = clinic.add_staff(doctor("Alice Smith"));
        let bob = clinic.add_staff(doctor("Bob Brown"));
        let john = clinic.add_patient(patient("John Doe"));
        let jane = clinic.add_patient(patient("Jane Doe"));
        let idle = clinic.add_patient(patient("Idle Patient"));

        for id in [john, jane] {
            clinic.record_visit(id, visit(now(), "Flu", 37.1)).unwrap();
        }
        clinic.assign_clinical_staff_to_patient(alice, john).unwrap();
        clinic.assign_clinical_staff_to_patient(alice, jane).unwrap();
        clinic.assign_clinical_staff_to_patient(bob, jane).unwrap();
        clinic.assign_clinical_staff_to_patient(bob, idle).unwrap();

        let grouped = clinic.list_active_staff_with_patients();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].staff.id(), alice);
        assert_eq!(names(&grouped[0].patients), vec!["John Doe", "Jane Doe"]);
        assert_eq!(grouped[1].staff.id(), bob);
        assert_eq!(names(&grouped[1].patients), vec!["Jane Doe"]);
    }

    #[test]
    fn staff_patient_counts_cover_everyone() {
        let mut clinic = ClinicService::default();
        let alice = clinic.add_staff(doctor("Alice Smith"));
        let bob = clinic.add_staff(doctor("Bob Brown"));
        let dan = clinic.add_staff(Staff::non_clinical(
            PersonName::parse("Dan Green").unwrap(),
            "BA",
            "Receptionist",
            "Basic",
        ));
        let john = clinic.add_patient(patient("John Doe"));
        let jane = clinic.add_patient(patient("Jane Doe"));

        clinic.assign_clinical_staff_to_patient(alice, john).unwrap();
        clinic.assign_clinical_staff_to_patient(alice, jane).unwrap();
        assert!(clinic.assign_clinical_staff_to_patient(dan, john).is_err());

        let counts: Vec<_> = clinic
            .list_staff_patient_counts()
            .iter()
            .map(|c| (c.staff.id(), c.patients))
            .collect();
        assert_eq!(counts, vec![(alice, 2), (bob, 0), (dan, 0)]);
    }

    #[test]
    fn room_info_shows_latest_visit_or_placeholder() {
        let mut clinic = ClinicService::default();
        let waiting = clinic.add_room(Room::new(
            RoomBounds::new(0, 0, 10, 10),
            NonEmptyText::new("waiting").unwrap(),
            NonEmptyText::new("Waiting Room").unwrap(),
        ));
        let john = clinic.add_patient(patient("John Doe"));
        let jane = clinic.add_patient(patient("Jane Doe"));
        clinic
            .record_visit(john, visit(now(), "Flu", 37.14))
            .unwrap();
        clinic.assign_patient_to_room(john, waiting).unwrap();
        clinic.assign_patient_to_room(jane, waiting).unwrap();

        let info = clinic.room_info(waiting).unwrap();
        assert_eq!(
            info,
            "Room: Waiting Room (waiting)\nPatients and their details:\n\
             John Doe - Complaint: Flu, Temp: 37.1°C\n\
             Jane Doe - No recent visits\n"
        );
        assert_eq!(clinic.seating_chart(), info);
        assert_eq!(
            clinic.room_occupancy(waiting).unwrap(),
            "John Doe, Jane Doe"
        );
    }

    #[test]
    fn room_details_by_index() {
        let mut clinic = ClinicService::default();
        assert_eq!(clinic.room_details(0), "Room not found");

        clinic.add_room(Room::new(
            RoomBounds::new(0, 0, 10, 10),
            NonEmptyText::new("exam").unwrap(),
            NonEmptyText::new("Exam Room 1").unwrap(),
        ));
        assert!(clinic.room_details(0).contains("Exam Room 1"));
    }
}
