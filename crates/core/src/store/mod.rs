//! Persistence boundary for web forms and leads.
//!
//! The lifecycle service depends only on these traits; `leadform-db`
//! implements them over PostgreSQL and [`memory::MemoryStore`] implements
//! them in process. Counter mutations are increment-and-fetch primitives so
//! concurrent views, interactions and submissions never lose updates.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::lead::{Lead, NewLead};
use crate::webform::{Counter, FormContent, NewWebForm, WebForm};

/// Storage for [`WebForm`] records.
///
/// `token` and `template_id` are unique; inserting a duplicate fails with
/// [`CoreError::Conflict`](crate::error::CoreError::Conflict).
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert a new form, returning the stored record.
    async fn insert(&self, form: NewWebForm) -> CoreResult<WebForm>;

    /// Find a live (not soft-deleted) form by its public token.
    async fn find_live_by_token(&self, token: &str) -> CoreResult<Option<WebForm>>;

    /// All forms with this template identifier, including soft-deleted ones.
    async fn find_by_template_id(&self, template_id: &str) -> CoreResult<Vec<WebForm>>;

    /// All live forms in storage order.
    async fn list_live(&self) -> CoreResult<Vec<WebForm>>;

    /// Atomically increment `counter` on the live form with `token` and
    /// recompute its conversion rate. Returns `None` if no live form matches.
    ///
    /// [`Counter::Viewed`] is only incremented on active forms; an inactive
    /// form yields `None` in the same step.
    async fn increment(&self, token: &str, counter: Counter) -> CoreResult<Option<WebForm>>;

    /// Replace the editable content of the form with `template_id`,
    /// regardless of deletion state. Returns `None` if it does not exist.
    async fn replace(&self, template_id: &str, content: FormContent)
        -> CoreResult<Option<WebForm>>;

    /// Stamp `deleted_at` on the live form with `template_id`.
    /// Returns `None` if no live form matches.
    async fn soft_delete(&self, template_id: &str) -> CoreResult<Option<WebForm>>;

    /// Verify the backing storage is reachable.
    async fn health_check(&self) -> CoreResult<()>;
}

/// Storage for [`Lead`] records.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert `lead` and increment `submitted` on the live form with `token`
    /// as one atomic unit. Returns `None`, storing nothing, if no live form
    /// matches.
    async fn record_submission(
        &self,
        token: &str,
        lead: NewLead,
    ) -> CoreResult<Option<(Lead, WebForm)>>;

    /// All leads captured for a template identifier, oldest first.
    async fn list_by_source_id(&self, source_id: &str) -> CoreResult<Vec<Lead>>;
}
