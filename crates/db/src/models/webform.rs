//! Web form row model.

use leadform_core::error::CoreError;
use leadform_core::types::{DbId, Timestamp};
use leadform_core::webform::{ActionType, ButtonConfig, FieldDefinition, ThankYouMessage, WebForm};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::status::{form_status, StatusId};

/// A row from the `webforms` table.
#[derive(Debug, Clone, FromRow)]
pub struct WebFormRow {
    pub id: DbId,
    pub template_id: String,
    pub token: String,
    pub title: String,
    pub form_des: String,
    pub fields: Json<Vec<FieldDefinition>>,
    pub button: Json<ButtonConfig>,
    pub action_type: Option<String>,
    pub thank_you_title: String,
    pub thank_you_desc: String,
    pub redirect_url: String,
    pub viewed: i64,
    pub interacted: i64,
    pub submitted: i64,
    pub conversion_rate: String,
    pub status_id: StatusId,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl TryFrom<WebFormRow> for WebForm {
    type Error = CoreError;

    fn try_from(row: WebFormRow) -> Result<Self, Self::Error> {
        let action_type = row
            .action_type
            .as_deref()
            .map(str::parse::<ActionType>)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("webform {}: {e}", row.id)))?;
        let status = form_status(row.status_id).ok_or_else(|| {
            CoreError::Internal(format!(
                "webform {}: unknown status_id {}",
                row.id, row.status_id
            ))
        })?;

        Ok(WebForm {
            id: row.id,
            template_id: row.template_id,
            token: row.token,
            title: row.title,
            form_des: row.form_des,
            fields: row.fields.0,
            button: row.button.0,
            action_type,
            show_thank_you: ThankYouMessage {
                title: row.thank_you_title,
                desc: row.thank_you_desc,
            },
            redirect_url: row.redirect_url,
            viewed: row.viewed,
            interacted: row.interacted,
            submitted: row.submitted,
            conversion_rate: row.conversion_rate,
            status,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}
