//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod areas;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod registry;
#[allow(clippy::missing_errors_doc)]
pub mod resolve;
#[allow(clippy::missing_errors_doc)]
pub mod search;

use axum::Router;
use axum::routing::{get, post};

use homeref_app::ports::{CacheStore, RegistrySource};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, S>() -> Router<AppState<R, S>>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    Router::new()
        .route("/resolve", post(resolve::resolve::<R, S>))
        .route("/search", get(search::search::<R, S>))
        .route("/entities", get(entities::list::<R, S>))
        .route("/entities/{id}", get(entities::get::<R, S>))
        .route("/areas", get(areas::list::<R, S>))
        .route("/registry/refresh", post(registry::refresh::<R, S>))
}
