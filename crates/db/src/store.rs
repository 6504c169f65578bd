//! [`PgStore`]: the PostgreSQL implementation of the core store traits.

use async_trait::async_trait;
use leadform_core::error::{CoreError, CoreResult};
use leadform_core::lead::{Lead, NewLead};
use leadform_core::store::{LeadStore, TemplateStore};
use leadform_core::webform::{Counter, FormContent, NewWebForm, WebForm};

use crate::models::webform::WebFormRow;
use crate::repositories::{LeadRepo, WebFormRepo};
use crate::DbPool;

/// Store handle over a connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a sqlx error into the core error taxonomy.
///
/// - Unique constraint violations (constraint name starting with `uq_`) map to
///   [`CoreError::Conflict`].
/// - Everything else maps to [`CoreError::Persistence`] and is logged.
pub fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Persistence(err.to_string())
}

fn to_forms(rows: Vec<WebFormRow>) -> CoreResult<Vec<WebForm>> {
    rows.into_iter().map(WebForm::try_from).collect()
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn insert(&self, form: NewWebForm) -> CoreResult<WebForm> {
        let row = WebFormRepo::create(&self.pool, &form)
            .await
            .map_err(classify_sqlx_error)?;
        WebForm::try_from(row)
    }

    async fn find_live_by_token(&self, token: &str) -> CoreResult<Option<WebForm>> {
        WebFormRepo::find_live_by_token(&self.pool, token)
            .await
            .map_err(classify_sqlx_error)?
            .map(WebForm::try_from)
            .transpose()
    }

    async fn find_by_template_id(&self, template_id: &str) -> CoreResult<Vec<WebForm>> {
        let rows = WebFormRepo::find_by_template_id(&self.pool, template_id)
            .await
            .map_err(classify_sqlx_error)?;
        to_forms(rows)
    }

    async fn list_live(&self) -> CoreResult<Vec<WebForm>> {
        let rows = WebFormRepo::list_live(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        to_forms(rows)
    }

    async fn increment(&self, token: &str, counter: Counter) -> CoreResult<Option<WebForm>> {
        WebFormRepo::increment(&self.pool, token, counter)
            .await
            .map_err(classify_sqlx_error)?
            .map(WebForm::try_from)
            .transpose()
    }

    async fn replace(
        &self,
        template_id: &str,
        content: FormContent,
    ) -> CoreResult<Option<WebForm>> {
        WebFormRepo::replace(&self.pool, template_id, &content)
            .await
            .map_err(classify_sqlx_error)?
            .map(WebForm::try_from)
            .transpose()
    }

    async fn soft_delete(&self, template_id: &str) -> CoreResult<Option<WebForm>> {
        WebFormRepo::soft_delete(&self.pool, template_id)
            .await
            .map_err(classify_sqlx_error)?
            .map(WebForm::try_from)
            .transpose()
    }

    async fn health_check(&self) -> CoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl LeadStore for PgStore {
    async fn record_submission(
        &self,
        token: &str,
        lead: NewLead,
    ) -> CoreResult<Option<(Lead, WebForm)>> {
        let Some((lead_row, form_row)) = LeadRepo::record_submission(&self.pool, token, &lead)
            .await
            .map_err(classify_sqlx_error)?
        else {
            return Ok(None);
        };
        Ok(Some((Lead::try_from(lead_row)?, WebForm::try_from(form_row)?)))
    }

    async fn list_by_source_id(&self, source_id: &str) -> CoreResult<Vec<Lead>> {
        LeadRepo::list_by_source_id(&self.pool, source_id)
            .await
            .map_err(classify_sqlx_error)?
            .into_iter()
            .map(Lead::try_from)
            .collect()
    }
}
