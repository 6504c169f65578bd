use std::sync::Arc;

use leadform_core::service::FormService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Form lifecycle service with its stores already injected.
    pub forms: Arc<FormService>,
}
