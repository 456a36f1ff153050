//! JSON handler for areas of the current snapshot.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_domain::area::Area;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Area>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/areas`
pub async fn list<R, S>(State(state): State<AppState<R, S>>) -> Result<ListResponse, ApiError>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let areas = state.registry_service.snapshot().areas().to_vec();
    Ok(ListResponse::Ok(Json(areas)))
}
