use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::cookies;

/// API-layer errors.
///
/// Every authentication failure collapses to the same fixed JSON body —
/// upstream detail is logged, never returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session on a route that requires one.
    #[error("not authenticated")]
    Unauthenticated,

    /// Provider interaction failed; optionally instruct the client to
    /// drop any existing session cookie.
    #[error("authorization failed")]
    AuthFailure { clear_cookie: bool },

    /// Requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Document store operation failed.
    #[error("store error: {0}")]
    Store(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure (e.g. token encoding).
    #[error("internal error: {0}")]
    Internal(String),
}

fn auth_failure_body() -> Json<serde_json::Value> {
    Json(json!({ "error": "auth_failure" }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, auth_failure_body()).into_response()
            }
            Self::AuthFailure { clear_cookie: false } => {
                (StatusCode::BAD_REQUEST, auth_failure_body()).into_response()
            }
            Self::AuthFailure { clear_cookie: true } => (
                StatusCode::BAD_REQUEST,
                CookieJar::new().add(cookies::clear_session_cookie()),
                auth_failure_body(),
            )
                .into_response(),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not_found" })),
            )
                .into_response(),
            Self::Store(_) | Self::Config(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal_error" })),
                )
                    .into_response()
            }
        }
    }
}
