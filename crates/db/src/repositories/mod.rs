//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Steps that must share a transaction take
//! `&mut PgConnection` instead.

pub mod lead_repo;
pub mod webform_repo;

pub use lead_repo::LeadRepo;
pub use webform_repo::WebFormRepo;
