//! Staff directory entities.
//!
//! Staff are either clinical (may be assigned to patients, carry an optional NPI) or
//! non-clinical (carry a CPR certification level, never assigned). The split is a closed
//! enum so every caller has to say what it does with each kind.

use crate::constants::{CLINICAL_DEPARTMENT, DOCTOR_ROLES, NURSE_AIDE_ROLE};
use crate::ids::{PatientId, StaffId};
use crate::person::Person;
use clinic_types::PersonName;

/// Clinical credentials and patient bookkeeping.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ClinicalStaff {
    npi: Option<String>,
    role: String,
    current_patients: Vec<PatientId>,
    lifetime_patients: Vec<PatientId>,
}

impl ClinicalStaff {
    /// A blank `npi` is stored as absent.
    pub fn new(role: impl Into<String>, npi: Option<String>) -> Self {
        Self {
            npi: npi
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            role: role.into(),
            current_patients: Vec::new(),
            lifetime_patients: Vec::new(),
        }
    }

    pub fn npi(&self) -> Option<&str> {
        self.npi.as_deref()
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_doctor(&self) -> bool {
        DOCTOR_ROLES.contains(&self.role.as_str())
    }

    pub fn current_patients(&self) -> &[PatientId] {
        &self.current_patients
    }

    /// Every patient ever assigned, including ones since unassigned.
    pub fn lifetime_patients(&self) -> &[PatientId] {
        &self.lifetime_patients
    }

    pub fn total_assigned_patients_count(&self) -> usize {
        self.lifetime_patients.len()
    }

    pub(crate) fn assign(&mut self, patient: PatientId) {
        if !self.current_patients.contains(&patient) {
            self.current_patients.push(patient);
        }
        if !self.lifetime_patients.contains(&patient) {
            self.lifetime_patients.push(patient);
        }
    }

    /// Lifetime bookkeeping is untouched.
    pub(crate) fn unassign(&mut self, patient: PatientId) {
        self.current_patients.retain(|p| *p != patient);
    }

    pub(crate) fn forget_current(&mut self) {
        self.current_patients.clear();
    }
}

/// Non-clinical role data.
#[derive(Clone, Debug, serde::Serialize)]
pub struct NonClinicalStaff {
    cpr_level: String,
    role: String,
}

impl NonClinicalStaff {
    pub fn new(role: impl Into<String>, cpr_level: impl Into<String>) -> Self {
        Self {
            cpr_level: cpr_level.into(),
            role: role.into(),
        }
    }

    pub fn cpr_level(&self) -> &str {
        &self.cpr_level
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaffKind {
    Clinical(ClinicalStaff),
    NonClinical(NonClinicalStaff),
}

/// A staff member.
#[derive(Debug, serde::Serialize)]
pub struct Staff {
    id: StaffId,
    #[serde(flatten)]
    person: Person,
    education_level: String,
    #[serde(flatten)]
    kind: StaffKind,
}

impl Staff {
    pub fn clinical(
        name: PersonName,
        education_level: impl Into<String>,
        role: impl Into<String>,
        npi: Option<String>,
    ) -> Self {
        Self::with_kind(
            name,
            education_level,
            StaffKind::Clinical(ClinicalStaff::new(role, npi)),
        )
    }

    pub fn non_clinical(
        name: PersonName,
        education_level: impl Into<String>,
        role: impl Into<String>,
        cpr_level: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            name,
            education_level,
            StaffKind::NonClinical(NonClinicalStaff::new(role, cpr_level)),
        )
    }

    fn with_kind(name: PersonName, education_level: impl Into<String>, kind: StaffKind) -> Self {
        Self {
            id: StaffId::generate(),
            person: Person::new(name),
            education_level: education_level.into(),
            kind,
        }
    }

    pub fn id(&self) -> StaffId {
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

    pub fn education_level(&self) -> &str {
        &self.education_level
    }

    pub fn kind(&self) -> &StaffKind {
        &self.kind
    }

    pub fn role(&self) -> &str {
        match &self.kind {
            StaffKind::Clinical(c) => c.role(),
            StaffKind::NonClinical(n) => n.role(),
        }
    }

    pub fn as_clinical(&self) -> Option<&ClinicalStaff> {
        match &self.kind {
            StaffKind::Clinical(c) => Some(c),
            StaffKind::NonClinical(_) => None,
        }
    }

    pub fn is_clinical(&self) -> bool {
        self.as_clinical().is_some()
    }

    /// Name with a title: `Dr.` for doctors and physicians, `Nurse` for everyone else.
    pub fn display_name(&self) -> String {
        let title = match &self.kind {
            StaffKind::Clinical(c) if c.is_doctor() => "Dr.",
            _ => "Nurse",
        };
        format!("{} {}", title, self.full_name())
    }

    pub fn department(&self) -> &'static str {
        match &self.kind {
            StaffKind::Clinical(_) => CLINICAL_DEPARTMENT,
            StaffKind::NonClinical(n) if n.role().eq_ignore_ascii_case(NURSE_AIDE_ROLE) => {
                "Nursing"
            }
            StaffKind::NonClinical(_) => "Administration",
        }
    }

    /// One-line summary of credentials.
    pub fn staff_details(&self) -> String {
        match &self.kind {
            StaffKind::Clinical(c) => format!(
                "ClinicalStaff: {}, Education Level: {}, NPI: {}",
                self.display_name(),
                self.education_level,
                c.npi().unwrap_or("none")
            ),
            StaffKind::NonClinical(n) => format!(
                "Non-Clinical Staff: {}, Education Level: {}, CPR Level: {}",
                self.display_name(),
                self.education_level,
                n.cpr_level()
            ),
        }
    }

    pub(crate) fn person_mut(&mut self) -> &mut Person {
        &mut self.person
    }

    pub(crate) fn as_clinical_mut(&mut self) -> Option<&mut ClinicalStaff> {
        match &mut self.kind {
            StaffKind::Clinical(c) => Some(c),
            StaffKind::NonClinical(_) => None,
        }
    }
}

impl PartialEq for Staff {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Staff {}

impl std::hash::Hash for Staff {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Staff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            StaffKind::Clinical(c) => write!(
                f,
                "ClinicalStaff{{name='{}', isActive={}, educationLevel='{}', npi='{}', role='{}'}}",
                self.display_name(),
                self.is_active(),
                self.education_level,
                c.npi().unwrap_or(""),
                c.role()
            ),
            StaffKind::NonClinical(n) => write!(
                f,
                "NonClinicalStaff{{name='{}', isActive={}, educationLevel='{}', cprLevel='{}', role='{}'}}",
                self.full_name(),
                self.is_active(),
                self.education_level,
                n.cpr_level(),
                n.role()
            ),
        }
    }
}
