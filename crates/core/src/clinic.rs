//! The clinic records engine.
//!
//! [`ClinicService`] owns every patient, staff member and room for one session and is the
//! only place their relationships change. Both sides of each link are updated together:
//!
//! - patient room pointer and room membership
//! - patient current-staff list and the clinician's current/lifetime patient sets
//!
//! Callers get read-only views (`&Patient`, iterators) and ids; they never hold the backing
//! collections. Every structural mutation ends with one call to the attached
//! [`RefreshHook`], which is how the presentation layer learns it should redraw.

use crate::config::CoreConfig;
use crate::ids::{PatientId, RoomId, StaffId};
use crate::patient::Patient;
use crate::room::Room;
use crate::staff::Staff;
use crate::visit::VisitRecord;
use crate::{ClinicError, ClinicResult};
use std::sync::Arc;

/// Notification point called once after each structural mutation.
pub trait RefreshHook {
    fn refresh(&mut self);
}

impl<F: FnMut()> RefreshHook for F {
    fn refresh(&mut self) {
        self()
    }
}

/// Owner of all clinic records for a session.
pub struct ClinicService {
    cfg: Arc<CoreConfig>,
    patients: Vec<Patient>,
    staff: Vec<Staff>,
    rooms: Vec<Room>,
    refresh_hook: Option<Box<dyn RefreshHook>>,
}

impl Default for ClinicService {
    fn default() -> Self {
        Self::new(Arc::new(CoreConfig::default()))
    }
}

impl std::fmt::Debug for ClinicService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClinicService")
            .field("cfg", &self.cfg)
            .field("patients", &self.patients.len())
            .field("staff", &self.staff.len())
            .field("rooms", &self.rooms.len())
            .field("refresh_hook", &self.refresh_hook.is_some())
            .finish()
    }
}

impl ClinicService {
    /// Creates an empty engine.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            patients: Vec::new(),
            staff: Vec::new(),
            rooms: Vec::new(),
            refresh_hook: None,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Attaches the refresh hook, replacing any previous one.
    pub fn set_refresh_hook(&mut self, hook: impl RefreshHook + 'static) {
        self.refresh_hook = Some(Box::new(hook));
    }

    pub(crate) fn notify(&mut self) {
        match self.refresh_hook.as_mut() {
            Some(hook) => hook.refresh(),
            None => tracing::debug!("records changed; no refresh hook attached"),
        }
    }

    // ------------------------------------------------------------------
    // Registration and lookup
    // ------------------------------------------------------------------

    pub fn add_patient(&mut self, patient: Patient) -> PatientId {
        let id = patient.id();
        tracing::debug!(patient = %id, name = %patient.full_name(), "patient registered");
        self.patients.push(patient);
        self.notify();
        id
    }

    pub fn add_staff(&mut self, staff: Staff) -> StaffId {
        let id = staff.id();
        tracing::debug!(staff = %id, name = %staff.full_name(), "staff registered");
        self.staff.push(staff);
        self.notify();
        id
    }

    pub fn add_room(&mut self, room: Room) -> RoomId {
        let id = room.id();
        tracing::debug!(room = %id, name = room.name(), "room registered");
        self.rooms.push(room);
        self.notify();
        id
    }

    /// Patients in registration order.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    /// Staff in registration order.
    pub fn staff(&self) -> impl Iterator<Item = &Staff> {
        self.staff.iter()
    }

    /// Rooms in registration order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    pub fn staff_member(&self, id: StaffId) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id() == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id() == id)
    }

    /// Room by registration index.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::RoomIndexOutOfRange`] if no room has that index.
    pub fn room_by_index(&self, index: usize) -> ClinicResult<&Room> {
        self.rooms
            .get(index)
            .ok_or(ClinicError::RoomIndexOutOfRange {
                index,
                count: self.rooms.len(),
            })
    }

    /// First registered room whose rectangle contains the point.
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.bounds().contains(x, y))
    }

    /// Exact match on first and last name.
    ///
    /// Names are not unique; when several patients share a name the one registered first is
    /// returned.
    pub fn find_patient_by_name(&self, first: &str, last: &str) -> Option<&Patient> {
        self.patients
            .iter()
            .find(|p| p.person().name().matches(first, last))
    }

    /// Exact match on first and last name; the first registered match wins.
    pub fn find_staff_by_name(&self, first: &str, last: &str) -> Option<&Staff> {
        self.staff
            .iter()
            .find(|s| s.person().name().matches(first, last))
    }

    /// Case-insensitive match on room name; the first registered match wins.
    pub fn find_room_by_name(&self, name: &str) -> Option<&Room> {
        let name = name.trim();
        self.rooms
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    fn patient_index(&self, id: PatientId) -> ClinicResult<usize> {
        self.patients
            .iter()
            .position(|p| p.id() == id)
            .ok_or(ClinicError::PatientNotFound(id.entity_id()))
    }

    fn staff_index(&self, id: StaffId) -> ClinicResult<usize> {
        self.staff
            .iter()
            .position(|s| s.id() == id)
            .ok_or(ClinicError::StaffNotFound(id.entity_id()))
    }

    fn room_index(&self, id: RoomId) -> ClinicResult<usize> {
        self.rooms
            .iter()
            .position(|r| r.id() == id)
            .ok_or(ClinicError::RoomNotFound(id.entity_id()))
    }

    fn patient_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.id() == id)
    }

    // ------------------------------------------------------------------
    // Room assignment
    // ------------------------------------------------------------------

    /// Moves a patient into a room.
    ///
    /// The patient leaves their current room first. In a non-waiting room everyone already
    /// there is evicted and their room pointer cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::RoomNotFound`] or [`ClinicError::PatientNotFound`] for unknown
    /// ids. Nothing changes on error.
    pub fn assign_patient_to_room(&mut self, patient: PatientId, room: RoomId) -> ClinicResult<()> {
        let room_idx = self.room_index(room)?;
        let patient_idx = self.patient_index(patient)?;

        if let Some(current) = self.patients[patient_idx].assigned_room() {
            if let Some(current_room) = self.rooms.iter_mut().find(|r| r.id() == current) {
                current_room.discharge(patient);
            }
        }

        let evicted = self.rooms[room_idx].admit(patient);
        for evicted_id in &evicted {
            if let Some(p) = self.patient_mut(*evicted_id) {
                p.set_room(None);
            }
        }
        self.patients[patient_idx].set_room(Some(room));

        tracing::debug!(
            patient = %patient,
            room = self.rooms[room_idx].name(),
            evicted = evicted.len(),
            "patient assigned to room"
        );
        self.notify();
        Ok(())
    }

    /// Takes a patient out of whatever room they are in. A patient with no room is left as is.
    pub fn unassign_patient_from_room(&mut self, patient: PatientId) -> ClinicResult<()> {
        let patient_idx = self.patient_index(patient)?;
        if let Some(current) = self.patients[patient_idx].assigned_room() {
            if let Some(room) = self.rooms.iter_mut().find(|r| r.id() == current) {
                room.discharge(patient);
            }
            self.patients[patient_idx].set_room(None);
        }
        self.notify();
        Ok(())
    }

    /// Empties a room, clearing the room pointer of everyone who was in it.
    pub fn vacate_room(&mut self, room: RoomId) -> ClinicResult<()> {
        let room_idx = self.room_index(room)?;
        for patient in self.rooms[room_idx].vacate() {
            if let Some(p) = self.patient_mut(patient) {
                p.set_room(None);
            }
        }
        self.notify();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Staff assignment
    // ------------------------------------------------------------------

    /// Adds a clinician to a patient's care team. Assigning twice has no further effect.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotClinicalStaff`] for non-clinical staff, or a not-found error
    /// for unknown ids.
    pub fn assign_clinical_staff_to_patient(
        &mut self,
        staff: StaffId,
        patient: PatientId,
    ) -> ClinicResult<()> {
        let staff_idx = self.staff_index(staff)?;
        let patient_idx = self.patient_index(patient)?;

        let member = &mut self.staff[staff_idx];
        let display_name = member.display_name();
        let clinical = member
            .as_clinical_mut()
            .ok_or(ClinicError::NotClinicalStaff(display_name))?;

        clinical.assign(patient);
        self.patients[patient_idx].add_clinical_staff(staff);

        self.notify();
        Ok(())
    }

    /// Removes one clinician-patient pair. Lifetime counts are not reduced.
    pub fn unassign_clinical_staff_from_patient(
        &mut self,
        staff: StaffId,
        patient: PatientId,
    ) -> ClinicResult<()> {
        let staff_idx = self.staff_index(staff)?;
        let patient_idx = self.patient_index(patient)?;

        self.patients[patient_idx].remove_clinical_staff(staff);
        if let Some(clinical) = self.staff[staff_idx].as_clinical_mut() {
            clinical.unassign(patient);
        }

        self.notify();
        Ok(())
    }

    /// Removes a clinician from every patient they currently treat.
    pub fn unassign_clinical_staff(&mut self, staff: StaffId) -> ClinicResult<()> {
        let staff_idx = self.staff_index(staff)?;

        for patient in &mut self.patients {
            patient.remove_clinical_staff(staff);
        }
        if let Some(clinical) = self.staff[staff_idx].as_clinical_mut() {
            clinical.forget_current();
        }

        self.notify();
        Ok(())
    }

    /// Current care team of a patient, in assignment order. Empty for unknown patients.
    pub fn clinical_staff_for_patient(&self, patient: PatientId) -> Vec<&Staff> {
        self.patient(patient)
            .map(|p| {
                p.clinical_staff()
                    .iter()
                    .filter_map(|id| self.staff_member(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    pub fn activate_patient(&mut self, patient: PatientId) -> ClinicResult<()> {
        let idx = self.patient_index(patient)?;
        self.patients[idx].person_mut().activate();
        self.notify();
        Ok(())
    }

    /// Deactivates a patient ("send home") and records who approved it.
    ///
    /// The approver must be clinical staff whose role satisfies the configured
    /// [`ApproverPolicy`](crate::ApproverPolicy). A later deactivation overwrites the recorded
    /// approver; reactivation leaves it in place.
    ///
    /// # Errors
    ///
    /// - [`ClinicError::NotClinicalStaff`] if the approver is non-clinical
    /// - [`ClinicError::ApproverRoleRejected`] if the policy refuses the approver's role
    /// - not-found errors for unknown ids
    pub fn deactivate_patient(&mut self, patient: PatientId, approver: StaffId) -> ClinicResult<()> {
        let patient_idx = self.patient_index(patient)?;
        let staff_idx = self.staff_index(approver)?;

        let member = &self.staff[staff_idx];
        let clinical = member
            .as_clinical()
            .ok_or_else(|| ClinicError::NotClinicalStaff(member.display_name()))?;
        if !self.cfg.approver_policy().permits(clinical.role()) {
            return Err(ClinicError::ApproverRoleRejected {
                name: member.display_name(),
                role: clinical.role().to_string(),
            });
        }

        let target = &mut self.patients[patient_idx];
        target.person_mut().deactivate();
        target.set_deactivation_approver(approver);

        tracing::debug!(patient = %patient, approver = %approver, "patient deactivated");
        self.notify();
        Ok(())
    }

    pub fn deactivation_approver(&self, patient: PatientId) -> Option<&Staff> {
        self.patient(patient)
            .and_then(Patient::deactivation_approver)
            .and_then(|id| self.staff_member(id))
    }

    pub fn activate_staff(&mut self, staff: StaffId) -> ClinicResult<()> {
        let idx = self.staff_index(staff)?;
        self.staff[idx].person_mut().activate();
        self.notify();
        Ok(())
    }

    /// Flag only; the staff member's patients keep them on their care team.
    pub fn deactivate_staff(&mut self, staff: StaffId) -> ClinicResult<()> {
        let idx = self.staff_index(staff)?;
        self.staff[idx].person_mut().deactivate();
        self.notify();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Visits
    // ------------------------------------------------------------------

    pub fn record_visit(&mut self, patient: PatientId, visit: VisitRecord) -> ClinicResult<()> {
        let idx = self.patient_index(patient)?;
        self.patients[idx].push_visit(visit);
        self.notify();
        Ok(())
    }

    /// Marks the visit at `index` (entry order) as complete.
    pub fn complete_visit(&mut self, patient: PatientId, index: usize) -> ClinicResult<()> {
        let idx = self.patient_index(patient)?;
        self.patients[idx]
            .visit_mut(index)
            .ok_or(ClinicError::VisitNotFound {
                patient: patient.entity_id(),
                index,
            })?
            .mark_complete();
        self.notify();
        Ok(())
    }

    /// Discards every patient, staff member and room. Cannot be undone.
    pub fn clear_records(&mut self) {
        tracing::info!(
            patients = self.patients.len(),
            staff = self.staff.len(),
            rooms = self.rooms.len(),
            "clearing all records"
        );
        self.patients.clear();
        self.staff.clear();
        self.rooms.clear();
        self.notify();
    }
}
