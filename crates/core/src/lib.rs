//! # Clinic Core
//!
//! Core business logic for the clinic records engine.
//!
//! This crate owns the in-memory clinic model and every operation on it:
//! - Patients, staff, rooms and visit records
//! - Room and care-team assignment with both sides of each link kept in step
//! - Reporting queries over visit history and staff workload
//! - Bulk ingestion of line-oriented clinic data files
//!
//! **No presentation concerns**: command-line output and process setup belong in the `cli`
//! crate and the `clinic-run` binary.

pub mod clinic;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod ingest;
pub mod patient;
pub mod person;
pub mod reports;
pub mod room;
pub mod staff;
pub mod validation;
pub mod visit;

pub use clinic::{ClinicService, RefreshHook};
pub use config::{ApproverPolicy, CoreConfig};
pub use error::{ClinicError, ClinicResult};
pub use ids::{PatientId, RoomId, StaffId};
pub use ingest::{Directive, DirectiveError, IngestReport, SkippedLine};
pub use patient::Patient;
pub use person::Person;
pub use reports::{StaffPatientCount, StaffPatients, VisitSummary};
pub use room::{Room, RoomBounds};
pub use staff::{ClinicalStaff, NonClinicalStaff, Staff, StaffKind};
pub use visit::VisitRecord;

pub use clinic_types::{NonEmptyText, PersonName, TextError};
pub use clinic_uuid::EntityId;
