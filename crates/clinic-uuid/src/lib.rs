//! Entity identifiers for the clinic records engine.
//!
//! Every patient, staff member and room gets an [`EntityId`] when it is constructed. Two
//! records with the same first and last name are still distinct entities, and membership
//! checks (is this patient in this room, is this clinician on this patient) compare ids,
//! never names or references.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the value you would get from `Uuid::new_v4().simple().to_string()`, and it is the
//! form used in log fields, error messages and JSON output.

mod id;

pub use id::EntityId;
