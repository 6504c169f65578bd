//! Lead row model.

use leadform_core::error::CoreError;
use leadform_core::lead::{FormData, Lead, LeadSource};
use leadform_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: DbId,
    pub source: String,
    pub source_id: String,
    pub form_data: Json<FormData>,
    pub created_at: Timestamp,
}

impl TryFrom<LeadRow> for Lead {
    type Error = CoreError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let source = row
            .source
            .parse::<LeadSource>()
            .map_err(|e| CoreError::Internal(format!("lead {}: {e}", row.id)))?;
        Ok(Lead {
            id: row.id,
            source,
            source_id: row.source_id,
            form_data: row.form_data.0,
            created_at: row.created_at,
        })
    }
}
