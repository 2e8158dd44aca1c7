use crate::ingest::DirectiveError;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("patient not found: {0}")]
    PatientNotFound(clinic_uuid::EntityId),
    #[error("staff member not found: {0}")]
    StaffNotFound(clinic_uuid::EntityId),
    #[error("room not found: {0}")]
    RoomNotFound(clinic_uuid::EntityId),
    #[error("no room at index {index} ({count} rooms registered)")]
    RoomIndexOutOfRange { index: usize, count: usize },
    #[error("patient {patient} has no visit at index {index}")]
    VisitNotFound {
        patient: clinic_uuid::EntityId,
        index: usize,
    },

    #[error("{0} is not clinical staff and cannot be assigned to patients")]
    NotClinicalStaff(String),
    #[error("{name} (role '{role}') may not approve a patient deactivation")]
    ApproverRoleRejected { name: String, role: String },

    #[error("failed to read clinic data file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid directive: {0}")]
    Directive(#[from] DirectiveError),
    #[error("invalid text: {0}")]
    Text(#[from] clinic_types::TextError),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
