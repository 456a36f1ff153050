//! JSON handlers for entities of the current snapshot.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_domain::entity::Entity;
use homeref_domain::error::{HomeRefError, NotFoundError};
use homeref_domain::id::EntityId;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional list filters.
#[derive(Debug, Default, Deserialize)]
pub struct EntityFilter {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Entity>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Entity>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/entities?domain=&area=`
pub async fn list<R, S>(
    State(state): State<AppState<R, S>>,
    Query(filter): Query<EntityFilter>,
) -> Result<ListResponse, ApiError>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let snapshot = state.registry_service.snapshot();
    let entities = snapshot
        .filter(filter.domain.as_deref(), filter.area.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Ok(ListResponse::Ok(Json(entities)))
}

/// `GET /api/entities/{id}`
pub async fn get<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let entity_id = EntityId::from_str(&id).map_err(HomeRefError::from)?;
    let entity = state
        .registry_service
        .snapshot()
        .entity(&entity_id)
        .cloned()
        .ok_or_else(|| {
            HomeRefError::from(NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            })
        })?;
    Ok(GetResponse::Ok(Json(entity)))
}
