//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use homeref_app::ports::{CacheStore, RegistrySource};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` and a `/health` check. Includes a
/// [`TraceLayer`] that logs each request/response at the `DEBUG` level.
pub fn build<R, S>(state: AppState<R, S>) -> Router
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
