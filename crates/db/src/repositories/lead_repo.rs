//! Repository for the `leads` table.

use leadform_core::lead::NewLead;
use leadform_core::webform::Counter;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::lead::LeadRow;
use crate::models::webform::WebFormRow;
use crate::repositories::WebFormRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, source, source_id, form_data, created_at";

/// Provides insert and lookup operations for leads. Leads are never updated
/// or deleted.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a lead on an existing connection or transaction.
    pub async fn create_on(
        conn: &mut PgConnection,
        input: &NewLead,
    ) -> Result<LeadRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (source, source_id, form_data)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeadRow>(&query)
            .bind(input.source.as_str())
            .bind(&input.source_id)
            .bind(Json(&input.form_data))
            .fetch_one(conn)
            .await
    }

    /// Record a submission: bump `submitted` on the live form with `token` and
    /// insert the lead in one transaction.
    ///
    /// Returns `None`, inserting nothing, if no live form has this token.
    pub async fn record_submission(
        pool: &PgPool,
        token: &str,
        input: &NewLead,
    ) -> Result<Option<(LeadRow, WebFormRow)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(form) = WebFormRepo::increment_on(&mut *tx, token, Counter::Submitted).await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };
        let lead = Self::create_on(&mut *tx, input).await?;

        tx.commit().await?;
        Ok(Some((lead, form)))
    }

    /// List leads captured for a template identifier, oldest first.
    pub async fn list_by_source_id(
        pool: &PgPool,
        source_id: &str,
    ) -> Result<Vec<LeadRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE source_id = $1 ORDER BY id");
        sqlx::query_as::<_, LeadRow>(&query)
            .bind(source_id)
            .fetch_all(pool)
            .await
    }
}
