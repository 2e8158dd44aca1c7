//! # Bulk Ingestion
//!
//! Line-oriented loader for clinic data files.
//!
//! Each non-blank line that does not start with `#` is one directive. Fields are separated by
//! commas; surrounding whitespace is trimmed and a field wrapped in double quotes has the
//! quotes removed. The first field selects the directive (case-insensitive):
//!
//! ```text
//! room, Waiting Room, waiting, 0, 0, 100, 100
//! staff, "Alice Smith", Doctor, MD, 1234567890
//! patient, "John Doe", 1990-01-01, 2024-05-01T09:30, Flu, 37.8
//! assign, "John Doe", Waiting Room
//! assignstaff, "John Doe", "Alice Smith"
//! deactivatestaff, "Alice Smith"
//! sendhome, "John Doe", "Alice Smith"
//! ```
//!
//! A bad line is logged and skipped; it never stops the rest of the file. Commas cannot be
//! escaped, so names containing commas cannot be loaded.
//!
//! Parsing ([`Directive::parse`]) is separate from applying so a line can be checked without
//! touching any records.

use crate::constants::{CLINICAL_INGEST_ROLES, COMMENT_PREFIX, DEFAULT_CPR_LEVEL};
use crate::ids::{PatientId, StaffId};
use crate::room::{Room, RoomBounds};
use crate::staff::Staff;
use crate::visit::VisitRecord;
use crate::{ClinicError, ClinicResult, ClinicService, Patient};
use chrono::NaiveDateTime;
use clinic_types::{NonEmptyText, PersonName, TextError};
use std::io::BufRead;
use std::path::Path;

/// Accepted visit timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Why a single line could not be turned into a directive or resolved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectiveError {
    #[error("'{directive}' needs at least {expected} fields, found {found}")]
    MissingFields {
        directive: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{field} must be a whole number, got '{value}'")]
    BadInteger { field: &'static str, value: String },
    #[error("{field} must be a number, got '{value}'")]
    BadNumber { field: &'static str, value: String },
    #[error("'{0}' is not an ISO local date-time")]
    BadTimestamp(String),
    #[error("invalid name '{value}': {source}")]
    InvalidName {
        value: String,
        #[source]
        source: TextError,
    },
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    #[error("no {kind} named '{name}'")]
    Unresolved { kind: &'static str, name: String },
}

/// Visit data carried on a `patient` line.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitFields {
    pub visit_time: NaiveDateTime,
    pub chief_complaint: String,
    pub body_temperature: f64,
}

/// One parsed line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Room {
        name: String,
        category: String,
        coords: [i32; 4],
    },
    Staff {
        name: PersonName,
        role: String,
        education_level: String,
        npi: Option<String>,
    },
    /// `visit` is `None` when the line has no visit fields, `Some(Err(_))` when they are
    /// present but malformed. The patient is created either way.
    Patient {
        name: PersonName,
        dob: String,
        visit: Option<Result<VisitFields, DirectiveError>>,
    },
    Assign {
        patient: PersonName,
        room: String,
    },
    AssignStaff {
        patient: PersonName,
        staff: PersonName,
    },
    DeactivateStaff {
        staff: PersonName,
    },
    SendHome {
        patient: PersonName,
        approver: PersonName,
    },
}

impl Directive {
    /// Parses one line. Returns `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>, DirectiveError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').map(clean_field).collect();
        let keyword = fields[0].to_ascii_lowercase();

        let directive = match keyword.as_str() {
            "room" => {
                require(&fields, "room", 7)?;
                Self::Room {
                    name: fields[1].to_string(),
                    category: fields[2].to_string(),
                    coords: [
                        parse_int("x1", fields[3])?,
                        parse_int("y1", fields[4])?,
                        parse_int("x2", fields[5])?,
                        parse_int("y2", fields[6])?,
                    ],
                }
            }
            "staff" => {
                require(&fields, "staff", 4)?;
                Self::Staff {
                    name: parse_name(fields[1])?,
                    role: fields[2].to_string(),
                    education_level: fields[3].to_string(),
                    npi: fields.get(4).map(|n| n.to_string()),
                }
            }
            "patient" => {
                require(&fields, "patient", 3)?;
                let visit = (fields.len() > 3).then(|| parse_visit(&fields[3..]));
                Self::Patient {
                    name: parse_name(fields[1])?,
                    dob: fields[2].to_string(),
                    visit,
                }
            }
            "assign" => {
                require(&fields, "assign", 3)?;
                Self::Assign {
                    patient: parse_name(fields[1])?,
                    room: fields[2].to_string(),
                }
            }
            "assignstaff" => {
                require(&fields, "assignstaff", 3)?;
                Self::AssignStaff {
                    patient: parse_name(fields[1])?,
                    staff: parse_name(fields[2])?,
                }
            }
            "deactivatestaff" => {
                require(&fields, "deactivatestaff", 2)?;
                Self::DeactivateStaff {
                    staff: parse_name(fields[1])?,
                }
            }
            "sendhome" => {
                require(&fields, "sendhome", 3)?;
                Self::SendHome {
                    patient: parse_name(fields[1])?,
                    approver: parse_name(fields[2])?,
                }
            }
            _ => return Err(DirectiveError::UnknownDirective(fields[0].to_string())),
        };

        Ok(Some(directive))
    }
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(field)
}

fn require(fields: &[&str], directive: &'static str, expected: usize) -> Result<(), DirectiveError> {
    if fields.len() < expected {
        return Err(DirectiveError::MissingFields {
            directive,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_int(field: &'static str, value: &str) -> Result<i32, DirectiveError> {
    value.parse().map_err(|_| DirectiveError::BadInteger {
        field,
        value: value.to_string(),
    })
}

fn parse_name(value: &str) -> Result<PersonName, DirectiveError> {
    PersonName::parse(value).map_err(|source| DirectiveError::InvalidName {
        value: value.to_string(),
        source,
    })
}

/// Parses an ISO local date-time with optional seconds and fraction.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DirectiveError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DirectiveError::BadTimestamp(value.to_string()))
}

fn parse_visit(tail: &[&str]) -> Result<VisitFields, DirectiveError> {
    if tail.len() < 3 {
        return Err(DirectiveError::MissingFields {
            directive: "patient visit",
            expected: 6,
            found: tail.len() + 3,
        });
    }
    let body_temperature = tail[2].parse().map_err(|_| DirectiveError::BadNumber {
        field: "temperature",
        value: tail[2].to_string(),
    })?;

    Ok(VisitFields {
        visit_time: parse_timestamp(tail[0])?,
        chief_complaint: tail[1].to_string(),
        body_temperature,
    })
}

/// A line that was not applied.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

/// Outcome of loading a data source.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct IngestReport {
    pub applied: usize,
    pub skipped: Vec<SkippedLine>,
    /// Patients created without the visit on their line.
    pub visits_dropped: usize,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.visits_dropped == 0
    }
}

impl ClinicService {
    /// Loads directives from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::FileRead`] if the file cannot be opened or read. Lines applied
    /// before a read failure stay applied.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> ClinicResult<IngestReport> {
        let path = path.as_ref();
        let read_error = |source| ClinicError::FileRead {
            path: path.to_path_buf(),
            source,
        };

        let file = std::fs::File::open(path).map_err(read_error)?;
        let mut report = IngestReport::default();
        // Bytes that are not UTF-8 are replaced per line so one bad byte cannot stop the load.
        for (idx, line) in std::io::BufReader::new(file).split(b'\n').enumerate() {
            let line = line.map_err(read_error)?;
            self.ingest_line(idx + 1, &String::from_utf8_lossy(&line), &mut report);
        }

        tracing::info!(
            path = %path.display(),
            applied = report.applied,
            skipped = report.skipped.len(),
            visits_dropped = report.visits_dropped,
            "clinic data loaded"
        );
        Ok(report)
    }

    /// Loads directives from in-memory text.
    pub fn load_from_str(&mut self, text: &str) -> IngestReport {
        let mut report = IngestReport::default();
        for (idx, line) in text.lines().enumerate() {
            self.ingest_line(idx + 1, line, &mut report);
        }

        tracing::info!(
            applied = report.applied,
            skipped = report.skipped.len(),
            visits_dropped = report.visits_dropped,
            "clinic data loaded"
        );
        report
    }

    fn ingest_line(&mut self, number: usize, line: &str, report: &mut IngestReport) {
        let outcome = Directive::parse(line)
            .map_err(ClinicError::from)
            .and_then(|directive| match directive {
                Some(directive) => self.apply_directive(directive, report).map(|_| true),
                None => Ok(false),
            });

        match outcome {
            Ok(true) => report.applied += 1,
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(line = number, error = %err, "skipping clinic data line");
                report.skipped.push(SkippedLine {
                    line: number,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Applies one parsed directive. Name lookups use the first registered match.
    pub fn apply_directive(
        &mut self,
        directive: Directive,
        report: &mut IngestReport,
    ) -> ClinicResult<()> {
        match directive {
            Directive::Room {
                name,
                category,
                coords: [x1, y1, x2, y2],
            } => {
                self.add_room(Room::new(
                    RoomBounds::new(x1, y1, x2, y2),
                    NonEmptyText::new(category)?,
                    NonEmptyText::new(name)?,
                ));
            }
            Directive::Staff {
                name,
                role,
                education_level,
                npi,
            } => {
                let clinical = CLINICAL_INGEST_ROLES
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(&role));
                let staff = if clinical {
                    Staff::clinical(name, education_level, role, npi)
                } else {
                    Staff::non_clinical(name, education_level, role, DEFAULT_CPR_LEVEL)
                };
                self.add_staff(staff);
            }
            Directive::Patient { name, dob, visit } => {
                let patient = self.add_patient(Patient::new(name, dob));
                let record = visit.map(|fields| -> ClinicResult<VisitRecord> {
                    let fields = fields?;
                    VisitRecord::new(
                        fields.visit_time,
                        fields.chief_complaint,
                        fields.body_temperature,
                    )
                });
                match record {
                    Some(Ok(record)) => self.record_visit(patient, record)?,
                    Some(Err(err)) => {
                        tracing::warn!(patient = %patient, error = %err, "dropping malformed visit");
                        report.visits_dropped += 1;
                    }
                    None => {}
                }
            }
            Directive::Assign { patient, room } => {
                let patient = self.resolve_patient(&patient)?;
                let room = self
                    .find_room_by_name(&room)
                    .ok_or(DirectiveError::Unresolved {
                        kind: "room",
                        name: room.clone(),
                    })?
                    .id();
                self.assign_patient_to_room(patient, room)?;
            }
            Directive::AssignStaff { patient, staff } => {
                let patient = self.resolve_patient(&patient)?;
                let staff = self.resolve_staff(&staff)?;
                self.assign_clinical_staff_to_patient(staff, patient)?;
            }
            Directive::DeactivateStaff { staff } => {
                let staff = self.resolve_staff(&staff)?;
                self.deactivate_staff(staff)?;
            }
            Directive::SendHome { patient, approver } => {
                let patient = self.resolve_patient(&patient)?;
                let approver = self.resolve_staff(&approver)?;
                self.deactivate_patient(patient, approver)?;
            }
        }
        Ok(())
    }

    fn resolve_patient(&self, name: &PersonName) -> Result<PatientId, DirectiveError> {
        self.find_patient_by_name(name.first(), name.last())
            .map(Patient::id)
            .ok_or_else(|| DirectiveError::Unresolved {
                kind: "patient",
                name: name.to_string(),
            })
    }

    fn resolve_staff(&self, name: &PersonName) -> Result<StaffId, DirectiveError> {
        self.find_staff_by_name(name.first(), name.last())
            .map(Staff::id)
            .ok_or_else(|| DirectiveError::Unresolved {
                kind: "staff member",
                name: name.to_string(),
            })
    }
}
