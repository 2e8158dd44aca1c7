//! Patients and their visit timelines.

use crate::ids::{PatientId, RoomId, StaffId};
use crate::person::Person;
use crate::visit::VisitRecord;
use chrono::NaiveDateTime;
use clinic_types::PersonName;

/// A patient record.
///
/// Room and staff links are stored as ids. The engine keeps them consistent with the room
/// and staff side of each relationship; nothing outside the crate can change them.
#[derive(Debug, serde::Serialize)]
pub struct Patient {
    id: PatientId,
    #[serde(flatten)]
    person: Person,
    dob: String,
    room: Option<RoomId>,
    visits: Vec<VisitRecord>,
    clinical_staff: Vec<StaffId>,
    deactivation_approver: Option<StaffId>,
}

impl Patient {
    /// Creates an active patient with no room, staff or visits.
    ///
    /// The date of birth is stored as given.
    pub fn new(name: PersonName, dob: impl Into<String>) -> Self {
        Self {
            id: PatientId::generate(),
            person: Person::new(name),
            dob: dob.into(),
            room: None,
            visits: Vec::new(),
            clinical_staff: Vec::new(),
            deactivation_approver: None,
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn full_name(&self) -> String {
        self.person.full_name()
    }

    pub fn is_active(&self) -> bool {
        self.person.is_active()
    }

    pub fn dob(&self) -> &str {
        &self.dob
    }

    /// Renames the patient from a full name using the [`PersonName`] parse rule.
    pub fn set_name(&mut self, full_name: &str) -> crate::ClinicResult<()> {
        self.person.rename(PersonName::parse(full_name)?);
        Ok(())
    }

    pub fn assigned_room(&self) -> Option<RoomId> {
        self.room
    }

    /// Visits in the order they were recorded.
    pub fn visits(&self) -> &[VisitRecord] {
        &self.visits
    }

    /// The most recently recorded visit (by entry order, not visit time).
    pub fn latest_visit(&self) -> Option<&VisitRecord> {
        self.visits.last()
    }

    pub fn incomplete_visits(&self) -> impl Iterator<Item = &VisitRecord> {
        self.visits.iter().filter(|v| !v.is_complete())
    }

    pub fn has_incomplete_visit(&self) -> bool {
        self.incomplete_visits().next().is_some()
    }

    /// Visits whose timestamp is strictly after `cutoff`.
    pub fn visits_since(&self, cutoff: NaiveDateTime) -> impl Iterator<Item = &VisitRecord> {
        self.visits.iter().filter(move |v| v.visit_time() > cutoff)
    }

    pub fn clinical_staff(&self) -> &[StaffId] {
        &self.clinical_staff
    }

    pub fn is_treated_by(&self, staff: StaffId) -> bool {
        self.clinical_staff.contains(&staff)
    }

    pub fn deactivation_approver(&self) -> Option<StaffId> {
        self.deactivation_approver
    }

    pub(crate) fn person_mut(&mut self) -> &mut Person {
        &mut self.person
    }

    pub(crate) fn set_room(&mut self, room: Option<RoomId>) {
        self.room = room;
    }

    pub(crate) fn push_visit(&mut self, visit: VisitRecord) {
        self.visits.push(visit);
    }

    pub(crate) fn visit_mut(&mut self, index: usize) -> Option<&mut VisitRecord> {
        self.visits.get_mut(index)
    }

    /// Returns false if the staff member was already assigned.
    pub(crate) fn add_clinical_staff(&mut self, staff: StaffId) -> bool {
        if self.clinical_staff.contains(&staff) {
            return false;
        }
        self.clinical_staff.push(staff);
        true
    }

    /// Returns false if the staff member was not assigned.
    pub(crate) fn remove_clinical_staff(&mut self, staff: StaffId) -> bool {
        let before = self.clinical_staff.len();
        self.clinical_staff.retain(|s| *s != staff);
        before != self.clinical_staff.len()
    }

    pub(crate) fn set_deactivation_approver(&mut self, approver: StaffId) {
        self.deactivation_approver = Some(approver);
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Patient {}

impl std::hash::Hash for Patient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Patient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Patient{{dob='{}', fullName='{}', isActive={}}}",
            self.dob,
            self.full_name(),
            self.is_active()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient(name: &str) -> Patient {
        Patient::new(PersonName::parse(name).unwrap(), "1980-01-01")
    }

    fn visit_on(day: u32, complaint: &str) -> VisitRecord {
        let at = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        VisitRecord::new(at, complaint, 36.8).unwrap()
    }

    #[test]
    fn equality_is_by_id_not_name() {
        let a = patient("John Doe");
        let b = patient("John Doe");
        assert_eq!(a.full_name(), b.full_name());
        assert_ne!(a, b);
    }

    #[test]
    fn latest_visit_follows_entry_order() {
        let mut p = patient("John Doe");
        assert!(p.latest_visit().is_none());
        p.push_visit(visit_on(20, "Cough"));
        p.push_visit(visit_on(2, "Rash"));
        assert_eq!(p.latest_visit().unwrap().chief_complaint(), "Rash");
    }

    #[test]
    fn clinical_staff_list_has_no_duplicates() {
        let mut p = patient("John Doe");
        let s = StaffId::generate();
        assert!(p.add_clinical_staff(s));
        assert!(!p.add_clinical_staff(s));
        assert_eq!(p.clinical_staff(), &[s]);
        assert!(p.remove_clinical_staff(s));
        assert!(!p.remove_clinical_staff(s));
        assert!(!p.is_treated_by(s));
    }

    #[test]
    fn set_name_uses_person_name_rule() {
        let mut p = patient("John Doe");
        p.set_name("Jean Luc Picard").unwrap();
        assert_eq!(p.person().first_name(), "Jean");
        assert_eq!(p.person().last_name(), "Luc Picard");
        assert!(p.set_name("   ").is_err());
    }

    #[test]
    fn incomplete_visits_skip_completed_ones() {
        let mut p = patient("John Doe");
        p.push_visit(visit_on(1, "Cough"));
        p.push_visit(visit_on(2, "Rash"));
        p.visit_mut(0).unwrap().mark_complete();
        let open: Vec<_> = p.incomplete_visits().map(|v| v.chief_complaint()).collect();
        assert_eq!(open, vec!["Rash"]);
        assert!(p.has_incomplete_visit());
    }
}
