//! Repository for the `webforms` table.

use leadform_core::analytics::conversion_rate;
use leadform_core::webform::{Counter, FormContent, NewWebForm};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::status::{self, status_id};
use crate::models::webform::WebFormRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template_id, token, title, form_des, fields, button, action_type, \
     thank_you_title, thank_you_desc, redirect_url, viewed, interacted, submitted, \
     conversion_rate, status_id, created_by, created_at, updated_at, deleted_at";

/// Provides persistence operations for web forms.
pub struct WebFormRepo;

impl WebFormRepo {
    /// Insert a new form, returning the created row.
    ///
    /// Counters and conversion rate take their column defaults.
    pub async fn create(pool: &PgPool, input: &NewWebForm) -> Result<WebFormRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO webforms
                (template_id, token, created_by, title, form_des, fields, button,
                 action_type, thank_you_title, thank_you_desc, redirect_url, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let content = &input.content;
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(&input.template_id)
            .bind(&input.token)
            .bind(&input.created_by)
            .bind(&content.title)
            .bind(&content.form_des)
            .bind(Json(&content.fields))
            .bind(Json(&content.button))
            .bind(content.action_type.map(|a| a.as_str()))
            .bind(&content.show_thank_you.title)
            .bind(&content.show_thank_you.desc)
            .bind(&content.redirect_url)
            .bind(status_id(content.status))
            .fetch_one(pool)
            .await
    }

    /// Find a form by its public token. Excludes soft-deleted rows.
    pub async fn find_live_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<WebFormRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM webforms WHERE token = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Find forms by template identifier, including soft-deleted rows.
    pub async fn find_by_template_id(
        pool: &PgPool,
        template_id: &str,
    ) -> Result<Vec<WebFormRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webforms WHERE template_id = $1 ORDER BY id");
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// List all forms in insertion order. Excludes soft-deleted rows.
    pub async fn list_live(pool: &PgPool) -> Result<Vec<WebFormRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webforms WHERE deleted_at IS NULL ORDER BY id");
        sqlx::query_as::<_, WebFormRow>(&query).fetch_all(pool).await
    }

    /// Increment a counter on a live form and store the recomputed
    /// conversion rate, in one transaction.
    ///
    /// Returns `None` if no live form has this token.
    pub async fn increment(
        pool: &PgPool,
        token: &str,
        counter: Counter,
    ) -> Result<Option<WebFormRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let row = Self::increment_on(&mut *tx, token, counter).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Transaction step behind [`WebFormRepo::increment`].
    ///
    /// The first `UPDATE` takes the row lock, so the conversion rate written
    /// by the second one always matches the counters it was computed from.
    /// Views only match active forms.
    pub async fn increment_on(
        conn: &mut PgConnection,
        token: &str,
        counter: Counter,
    ) -> Result<Option<WebFormRow>, sqlx::Error> {
        let column = counter.as_str();
        let status_filter = match counter {
            Counter::Viewed => format!(" AND status_id = {}", status::ACTIVE),
            Counter::Interacted | Counter::Submitted => String::new(),
        };
        let query = format!(
            "UPDATE webforms SET {column} = {column} + 1
             WHERE token = $1 AND deleted_at IS NULL{status_filter}
             RETURNING {COLUMNS}"
        );
        let Some(row) = sqlx::query_as::<_, WebFormRow>(&query)
            .bind(token)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let rate = conversion_rate(row.viewed, row.interacted, row.submitted);
        let query = format!(
            "UPDATE webforms SET conversion_rate = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(row.id)
            .bind(rate)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Replace every editable column of a form, including soft-deleted rows.
    ///
    /// Returns `None` if no row has this template identifier.
    pub async fn replace(
        pool: &PgPool,
        template_id: &str,
        content: &FormContent,
    ) -> Result<Option<WebFormRow>, sqlx::Error> {
        let query = format!(
            "UPDATE webforms SET
                title = $2,
                form_des = $3,
                fields = $4,
                button = $5,
                action_type = $6,
                thank_you_title = $7,
                thank_you_desc = $8,
                redirect_url = $9,
                status_id = $10,
                updated_at = NOW()
             WHERE template_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(template_id)
            .bind(&content.title)
            .bind(&content.form_des)
            .bind(Json(&content.fields))
            .bind(Json(&content.button))
            .bind(content.action_type.map(|a| a.as_str()))
            .bind(&content.show_thank_you.title)
            .bind(&content.show_thank_you.desc)
            .bind(&content.redirect_url)
            .bind(status_id(content.status))
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live form, returning the stamped row.
    ///
    /// Returns `None` if the form does not exist or is already deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        template_id: &str,
    ) -> Result<Option<WebFormRow>, sqlx::Error> {
        let query = format!(
            "UPDATE webforms SET deleted_at = NOW()
             WHERE template_id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebFormRow>(&query)
            .bind(template_id)
            .fetch_optional(pool)
            .await
    }
}
