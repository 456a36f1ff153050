//! `GET /api/search`: ranked fuzzy search.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_app::services::search_service::SearchHit;
use homeref_domain::query::{DEFAULT_SEARCH_LIMIT, SearchQuery};

use crate::state::AppState;

const MAX_SEARCH_LIMIT: usize = 100;

/// Query-string parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        Self {
            text: params.query,
            limit: params
                .limit
                .unwrap_or(DEFAULT_SEARCH_LIMIT)
                .min(MAX_SEARCH_LIMIT),
            domain_hint: params.domain,
            area_hint: params.area,
        }
    }
}

#[derive(Serialize)]
pub struct SearchBody {
    pub results: Vec<SearchHit>,
    pub suggestions: Vec<String>,
}

/// Possible responses from the search endpoint.
pub enum SearchResponse {
    Ok(Json<SearchBody>),
}

impl IntoResponse for SearchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/search?query=&limit=&domain=&area=`
pub async fn search<R, S>(
    State(state): State<AppState<R, S>>,
    Query(params): Query<SearchParams>,
) -> SearchResponse
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    let outcome = state.search_service.search(&SearchQuery::from(params));
    SearchResponse::Ok(Json(SearchBody {
        results: outcome.hits,
        suggestions: outcome.suggestions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_and_cap_limit() {
        let query = SearchQuery::from(SearchParams {
            query: "lamp".to_string(),
            ..SearchParams::default()
        });
        assert_eq!(query.limit, DEFAULT_SEARCH_LIMIT);

        let query = SearchQuery::from(SearchParams {
            limit: Some(10_000),
            ..SearchParams::default()
        });
        assert_eq!(query.limit, MAX_SEARCH_LIMIT);
    }
}
