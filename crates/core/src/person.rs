//! Identity and activation state shared by patients and staff.

use clinic_types::PersonName;

/// A person known to the clinic.
///
/// The `active` flag is administrative state toggled by activate/deactivate operations. It
/// is unrelated to reporting "inactivity" (no visit within the lookback window), which is
/// computed from visit history and never stored.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Person {
    name: PersonName,
    active: bool,
}

impl Person {
    /// New people start active.
    pub fn new(name: PersonName) -> Self {
        Self { name, active: true }
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn first_name(&self) -> &str {
        self.name.first()
    }

    pub fn last_name(&self) -> &str {
        self.name.last()
    }

    pub fn full_name(&self) -> String {
        self.name.to_string()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn rename(&mut self, name: PersonName) {
        self.name = name;
    }
}
