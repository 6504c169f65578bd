//! Row structs mapping database tables onto `leadform-core` domain types.
//!
//! Each submodule contains a `FromRow` struct matching the table and a
//! `TryFrom` conversion into the domain record.

pub mod lead;
pub mod status;
pub mod webform;
