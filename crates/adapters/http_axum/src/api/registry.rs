//! `POST /api/registry/refresh`: force a registry fetch.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Summary of the snapshot published by a refresh.
#[derive(Serialize)]
pub struct RefreshBody {
    pub entities: usize,
    pub areas: usize,
    pub built_at: Timestamp,
}

/// Possible responses from the refresh endpoint.
pub enum RefreshResponse {
    Ok(Json<RefreshBody>),
}

impl IntoResponse for RefreshResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/registry/refresh`
pub async fn refresh<R, S>(State(state): State<AppState<R, S>>) -> Result<RefreshResponse, ApiError>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let snapshot = state.registry_service.refresh().await?;
    Ok(RefreshResponse::Ok(Json(RefreshBody {
        entities: snapshot.len(),
        areas: snapshot.areas().len(),
        built_at: snapshot.built_at(),
    })))
}
