//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homeref_domain::error::HomeRefError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HomeRefError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(HomeRefError);

impl From<HomeRefError> for ApiError {
    fn from(err: HomeRefError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            HomeRefError::Validation(_) => StatusCode::BAD_REQUEST,
            HomeRefError::NotFound(_) => StatusCode::NOT_FOUND,
            HomeRefError::Upstream(_) => StatusCode::BAD_GATEWAY,
            HomeRefError::Storage(_) | HomeRefError::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            HomeRefError::Validation(err) => err.to_string(),
            HomeRefError::NotFound(err) => err.to_string(),
            HomeRefError::Upstream(err) => {
                tracing::warn!(error = %err, "upstream registry error");
                format!("upstream registry unavailable: {err}")
            }
            HomeRefError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                "internal server error".to_string()
            }
            HomeRefError::Codec(err) => {
                tracing::error!(error = %err, "codec error");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use homeref_domain::error::{NotFoundError, ValidationError};

    use super::*;

    #[test]
    fn should_map_each_error_kind_to_its_status() {
        let cases = [
            (
                HomeRefError::from(ValidationError::EmptyQuery),
                StatusCode::BAD_REQUEST,
            ),
            (
                HomeRefError::from(NotFoundError {
                    entity: "Entity",
                    id: "fan".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                HomeRefError::Upstream(Box::new(std::io::Error::other("down"))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                HomeRefError::Storage(Box::new(std::io::Error::other("disk"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
