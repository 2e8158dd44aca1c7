//! Rooms and their occupancy rules.

use crate::constants::WAITING_ROOM_CATEGORY;
use crate::ids::{PatientId, RoomId};
use clinic_types::NonEmptyText;

/// Floor-plan rectangle, top-left `(x1, y1)` to bottom-right `(x2, y2)`.
///
/// Corners may be given in either order; they are stored normalised so `x1 <= x2` and
/// `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RoomBounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RoomBounds {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.abs_diff(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.abs_diff(self.y1)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }
}

/// A room on the clinic floor.
///
/// Waiting-category rooms (case-insensitive `"waiting"`) admit any number of patients. Every
/// other category is single-occupancy: admitting a patient evicts whoever was there. The room
/// only tracks its own membership; [`ClinicService`](crate::ClinicService) clears the room
/// pointer on evicted patients.
#[derive(Debug, serde::Serialize)]
pub struct Room {
    id: RoomId,
    bounds: RoomBounds,
    category: NonEmptyText,
    name: NonEmptyText,
    patients: Vec<PatientId>,
}

impl Room {
    pub fn new(bounds: RoomBounds, category: NonEmptyText, name: NonEmptyText) -> Self {
        Self {
            id: RoomId::generate(),
            bounds,
            category,
            name,
            patients: Vec::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn bounds(&self) -> RoomBounds {
        self.bounds
    }

    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_waiting_room(&self) -> bool {
        self.category.eq_ignore_case(WAITING_ROOM_CATEGORY)
    }

    pub fn is_occupied(&self) -> bool {
        !self.patients.is_empty()
    }

    /// Current occupants. Order is admission order but callers should not rely on it.
    pub fn patients(&self) -> &[PatientId] {
        &self.patients
    }

    pub fn has_patient(&self, patient: PatientId) -> bool {
        self.patients.contains(&patient)
    }

    /// Admits `patient` under the occupancy rule and returns whoever was evicted.
    pub(crate) fn admit(&mut self, patient: PatientId) -> Vec<PatientId> {
        let evicted = if self.is_waiting_room() {
            Vec::new()
        } else {
            std::mem::take(&mut self.patients)
                .into_iter()
                .filter(|p| *p != patient)
                .collect()
        };

        if !self.patients.contains(&patient) {
            self.patients.push(patient);
        }
        evicted
    }

    pub(crate) fn discharge(&mut self, patient: PatientId) -> bool {
        let before = self.patients.len();
        self.patients.retain(|p| *p != patient);
        before != self.patients.len()
    }

    pub(crate) fn vacate(&mut self) -> Vec<PatientId> {
        std::mem::take(&mut self.patients)
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Room {}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Room{{x1={}, y1={}, x2={}, y2={}, roomType='{}', roomName='{}'}}",
            self.bounds.x1,
            self.bounds.y1,
            self.bounds.x2,
            self.bounds.y2,
            self.category,
            self.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(category: &str) -> Room {
        Room::new(
            RoomBounds::new(0, 0, 10, 10),
            NonEmptyText::new(category).unwrap(),
            NonEmptyText::new("Room A").unwrap(),
        )
    }

    #[test]
    fn exam_room_keeps_only_newest_patient() {
        let mut exam = room("exam");
        let a = PatientId::generate();
        let b = PatientId::generate();

        assert!(exam.admit(a).is_empty());
        assert_eq!(exam.admit(b), vec![a]);
        assert_eq!(exam.patients(), &[b]);
    }

    #[test]
    fn readmitting_current_occupant_evicts_nobody() {
        let mut exam = room("exam");
        let a = PatientId::generate();
        exam.admit(a);
        assert!(exam.admit(a).is_empty());
        assert_eq!(exam.patients(), &[a]);
    }

    #[test]
    fn waiting_room_category_is_case_insensitive() {
        let mut waiting = room("WAITING");
        assert!(waiting.is_waiting_room());
        for _ in 0..3 {
            assert!(waiting.admit(PatientId::generate()).is_empty());
        }
        assert_eq!(waiting.patients().len(), 3);
    }

    #[test]
    fn discharge_and_vacate() {
        let mut waiting = room("waiting");
        let a = PatientId::generate();
        let b = PatientId::generate();
        waiting.admit(a);
        waiting.admit(b);

        assert!(waiting.discharge(a));
        assert!(!waiting.discharge(a));
        assert_eq!(waiting.vacate(), vec![b]);
        assert!(!waiting.is_occupied());
    }

    #[test]
    fn bounds_contain_edges() {
        let bounds = RoomBounds::new(10, 20, 30, 40);
        assert!(bounds.contains(10, 20));
        assert!(bounds.contains(30, 40));
        assert!(!bounds.contains(31, 40));
        assert_eq!((bounds.width(), bounds.height()), (20, 20));
    }

    #[test]
    fn inverted_corners_are_normalised() {
        let bounds = RoomBounds::new(30, 40, 10, 20);
        assert_eq!(bounds, RoomBounds::new(10, 20, 30, 40));
        assert!(bounds.contains(15, 25));
    }

    #[test]
    fn extreme_corners_do_not_overflow() {
        let bounds = RoomBounds::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        assert_eq!(bounds.width(), u32::MAX);
        assert_eq!(bounds.height(), u32::MAX);
        assert!(bounds.contains(0, 0));
    }
}
