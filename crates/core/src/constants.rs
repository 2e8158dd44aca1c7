//! Constants used throughout the clinic core crate.

/// Room category whose occupancy rule admits any number of patients.
pub const WAITING_ROOM_CATEGORY: &str = "waiting";

/// Default window, in days, for "past year" reporting and inactivity checks.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Longest accepted lookback window, in days (100 years).
pub const MAX_LOOKBACK_DAYS: i64 = 36_525;

/// CPR level given to non-clinical staff created by ingestion.
pub const DEFAULT_CPR_LEVEL: &str = "Basic";

/// Staff roles that ingestion turns into clinical staff (case-insensitive).
pub const CLINICAL_INGEST_ROLES: [&str; 2] = ["Doctor", "Physician"];

/// Roles that earn the `Dr.` display prefix (exact match).
pub const DOCTOR_ROLES: [&str; 2] = ["Physician", "Doctor"];

/// Department reported for every clinical staff member.
pub const CLINICAL_DEPARTMENT: &str = "Medical";

/// Non-clinical role that belongs to the nursing department (case-insensitive).
pub const NURSE_AIDE_ROLE: &str = "Nurse Aide";

/// Ingestion lines starting with this prefix are comments.
pub const COMMENT_PREFIX: char = '#';

/// Environment variable naming the data file loaded at startup.
pub const DATA_FILE_ENV: &str = "CLINIC_DATA_FILE";

/// Environment variable overriding [`DEFAULT_LOOKBACK_DAYS`].
pub const LOOKBACK_DAYS_ENV: &str = "CLINIC_LOOKBACK_DAYS";

/// Environment variable listing roles allowed to approve deactivations (comma-separated).
pub const APPROVER_ROLES_ENV: &str = "CLINIC_APPROVER_ROLES";
