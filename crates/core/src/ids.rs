//! Typed identifiers for each entity kind.
//!
//! All three wrap an [`EntityId`]; the wrappers stop a room id being passed where a patient
//! id is expected.

use clinic_uuid::EntityId;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(EntityId);

        impl $name {
            pub(crate) fn generate() -> Self {
                Self(EntityId::new())
            }

            pub fn entity_id(&self) -> EntityId {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifies a patient.
    PatientId
);
entity_id!(
    /// Identifies a staff member, clinical or not.
    StaffId
);
entity_id!(
    /// Identifies a room.
    RoomId
);
