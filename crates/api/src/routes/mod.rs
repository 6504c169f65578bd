pub mod health;
pub mod webforms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /webforms                                      list, create
/// /webforms/{token}                              display, submit
/// /webforms/{token}/preview                      preview (no view counted)
/// /webforms/interaction/{token}                  log interaction (GET or POST)
/// /webforms/template/{template_id}               list, update, soft delete
/// /webforms/template/{template_id}/leads         captured leads
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/webforms", webforms::router())
}
