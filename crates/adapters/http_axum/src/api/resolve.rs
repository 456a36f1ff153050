//! `POST /api/resolve`: turn a reference into one entity id.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_app::services::resolver_service::Resolution;
use homeref_app::services::search_service::SearchHit;
use homeref_domain::entity::Entity;
use homeref_domain::error::{HomeRefError, NotFoundError, ValidationError};
use homeref_domain::id::EntityId;
use homeref_domain::query::ResolutionQuery;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_SUGGESTIONS: usize = 5;

/// Request body: an explicit id, or a name with optional hints.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub suggestions: Option<usize>,
}

impl ResolveRequest {
    /// Explicit ids are passed through verbatim, trimmed but not validated.
    fn into_query(self) -> Result<ResolutionQuery, HomeRefError> {
        let explicit_id = self
            .entity_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(EntityId::new);
        let name = self.name.filter(|name| !name.trim().is_empty());
        if explicit_id.is_none() && name.is_none() {
            return Err(ValidationError::EmptyQuery.into());
        }
        Ok(ResolutionQuery {
            explicit_id,
            name,
            area: self.area,
            floor: self.floor,
            domain_hint: self.domain,
        })
    }
}

#[derive(Serialize)]
pub struct ResolvedBody {
    pub entity_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

#[derive(Serialize)]
pub struct NotFoundBody {
    pub error: String,
    pub suggestions: Vec<SearchHit>,
}

/// Possible responses from the resolve endpoint.
pub enum ResolveResponse {
    Resolved(Json<ResolvedBody>),
    NotFound(Json<NotFoundBody>),
}

impl IntoResponse for ResolveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Resolved(json) => json.into_response(),
            Self::NotFound(json) => (StatusCode::NOT_FOUND, json).into_response(),
        }
    }
}

/// `POST /api/resolve`
pub async fn resolve<R, S>(
    State(state): State<AppState<R, S>>,
    Json(req): Json<ResolveRequest>,
) -> Result<ResolveResponse, ApiError>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let limit = req.suggestions.unwrap_or(DEFAULT_SUGGESTIONS);
    let query = req.into_query()?;
    match state.resolver_service.resolve_or_suggest(&query, limit) {
        Resolution::Resolved { entity_id } => {
            let entity = state.registry_service.snapshot().entity(&entity_id).cloned();
            Ok(ResolveResponse::Resolved(Json(ResolvedBody { entity_id, entity })))
        }
        Resolution::NotFound { suggestions } => {
            let error = NotFoundError {
                entity: "Entity",
                id: query.describe(),
            };
            Ok(ResolveResponse::NotFound(Json(NotFoundBody {
                error: error.to_string(),
                suggestions,
            })))
        }
    }
}
