//! Handlers for the `/webforms` resource.
//!
//! Handlers only translate between HTTP and [`FormService`]; every rule lives
//! in the service.
//!
//! [`FormService`]: leadform_core::service::FormService

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leadform_core::lead::{FormData, Lead};
use leadform_core::service::Submission;
use leadform_core::webform::{DeletedForm, FormDefinition, WebForm};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Interaction total after logging one interaction.
#[derive(Debug, Serialize)]
pub struct InteractionCount {
    pub interacted: i64,
}

/// POST /api/v1/webforms
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<FormDefinition>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<WebForm>>)> {
    let Json(definition) = payload?;
    let form = state.forms.create_form(definition).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// GET /api/v1/webforms
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<WebForm>>>> {
    let forms = state.forms.list_forms().await?;
    Ok(Json(DataResponse { data: forms }))
}

/// GET /api/v1/webforms/{token}
///
/// Counts a view.
pub async fn display(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<WebForm>>> {
    let form = state.forms.get_form_for_display(&token).await?;
    Ok(Json(DataResponse { data: form }))
}

/// GET /api/v1/webforms/{token}/preview
pub async fn preview(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<WebForm>>> {
    let form = state.forms.preview_form(&token).await?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/webforms/{token}
pub async fn submit(
    State(state): State<AppState>,
    Path(token): Path<String>,
    payload: Result<Json<FormData>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Submission>>)> {
    let Json(form_data) = payload?;
    let submission = state.forms.submit(&token, form_data).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}

/// GET|POST /api/v1/webforms/interaction/{token}
pub async fn log_interaction(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<InteractionCount>>> {
    let interacted = state.forms.log_interaction(&token).await?;
    Ok(Json(DataResponse {
        data: InteractionCount { interacted },
    }))
}

/// GET /api/v1/webforms/template/{template_id}
pub async fn list_by_template_id(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<WebForm>>>> {
    let forms = state.forms.list_by_template_id(&template_id).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// PUT /api/v1/webforms/template/{template_id}
pub async fn update(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    payload: Result<Json<FormDefinition>, JsonRejection>,
) -> AppResult<Json<DataResponse<WebForm>>> {
    let Json(definition) = payload?;
    let form = state.forms.update_form(&template_id, definition).await?;
    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/webforms/template/{template_id}
pub async fn delete(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<Json<DataResponse<DeletedForm>>> {
    let deleted = state.forms.soft_delete(&template_id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/webforms/template/{template_id}/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let leads = state.forms.list_leads(&template_id).await?;
    Ok(Json(DataResponse { data: leads }))
}
