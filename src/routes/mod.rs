/**
 * Routes Module
 * API route handlers and the error shape they share
 */
pub mod admin;
pub mod contact;
pub mod content;
pub mod health;
pub mod logs;
pub mod rss;
pub mod sitemap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repo::RepoError;

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Success response (for delete and verify)
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Handler error rendered as `ErrorResponse` JSON.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    pub fn invalid_slug() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid slug")
            .with_message("Slug must contain only lowercase letters, numbers, and hyphens")
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(),
            RepoError::Conflict(slug) => Self::new(StatusCode::CONFLICT, "Slug already exists")
                .with_message(format!("'{}' is already in use", slug)),
            RepoError::Invalid(e) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation failed").with_message(e.to_string())
            }
            RepoError::Database(e) => {
                tracing::error!("Database error: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            RepoError::Encoding(e) => {
                tracing::error!("Stored document could not be decoded: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Corrupt record")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "Invalid request body").with_message(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), "Invalid path parameter")
            .with_message(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), "Invalid query string").with_message(rejection.body_text())
    }
}

/// `Json` whose rejection is an [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejection is an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error,
                message: self.message,
            }),
        )
            .into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ValidationError;

    #[test]
    fn test_repo_errors_map_to_status_codes() {
        let cases = [
            (RepoError::NotFound, StatusCode::NOT_FOUND),
            (RepoError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                RepoError::Invalid(ValidationError::Required("title")),
                StatusCode::BAD_REQUEST,
            ),
            (
                RepoError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[tokio::test]
    async fn test_extractor_rejections_render_as_error_json() {
        use crate::routes::test_support::send;
        use axum::{body::Body, http::Request, routing::put, Router};
        use uuid::Uuid;

        async fn echo(
            ApiPath(id): ApiPath<Uuid>,
            ApiJson(body): ApiJson<SuccessResponse>,
        ) -> Json<(Uuid, bool)> {
            Json((id, body.success))
        }

        let app = Router::new().route("/items/{id}", put(echo));
        let request = |uri: &str, body: &str| {
            Request::put(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let (status, body) = send(app.clone(), request("/items/not-a-uuid", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Invalid path parameter");
        assert!(error.message.is_some());

        let uri = format!("/items/{}", Uuid::new_v4());
        let (status, body) = send(app.clone(), request(&uri, r#"{"success":"yes"}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Invalid request body");

        let (status, body) = send(app, request(&uri, "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Invalid request body");
    }

    #[test]
    fn test_validation_message_is_exposed() {
        let err = ApiError::from(RepoError::Invalid(ValidationError::Required("title")));
        assert_eq!(err.message.as_deref(), Some("title is required"));
    }
}
