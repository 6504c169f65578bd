//! Form lifecycle and submission engine.
//!
//! Pure domain logic with no database or HTTP dependency: identifier
//! generation, conversion analytics, template validation, the store traits
//! the persistence layer implements, and [`service::FormService`], which
//! orchestrates every operation on web forms and leads.

pub mod analytics;
pub mod error;
pub mod identifiers;
pub mod lead;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;
pub mod webform;
