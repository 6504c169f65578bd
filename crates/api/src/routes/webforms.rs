//! Route definitions for the `/webforms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::webforms;
use crate::state::AppState;

/// Routes mounted at `/webforms`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create
/// GET    /{token}                          -> display
/// POST   /{token}                          -> submit
/// GET    /{token}/preview                  -> preview
/// GET    /interaction/{token}              -> log_interaction
/// POST   /interaction/{token}              -> log_interaction
/// GET    /template/{template_id}           -> list_by_template_id
/// PUT    /template/{template_id}           -> update
/// DELETE /template/{template_id}           -> delete
/// GET    /template/{template_id}/leads     -> list_leads
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(webforms::list).post(webforms::create))
        .route("/{token}", get(webforms::display).post(webforms::submit))
        .route("/{token}/preview", get(webforms::preview))
        .route(
            "/interaction/{token}",
            get(webforms::log_interaction).post(webforms::log_interaction),
        )
        .route(
            "/template/{template_id}",
            get(webforms::list_by_template_id)
                .put(webforms::update)
                .delete(webforms::delete),
        )
        .route("/template/{template_id}/leads", get(webforms::list_leads))
}
