use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::cookies;
use super::error::ApiError;
use super::state::ApiState;
use crate::token::SessionPayload;

/// Authenticated session extracted from the session cookie.
///
/// Use as an Axum extractor in route handlers. Rejects with the fixed
/// authentication-failure body when the cookie is missing, malformed,
/// signed with the wrong key, or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(session: AuthSession) -> impl IntoResponse {
///     format!("Hello, {}", session.payload.user_details.display_name())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Decoded, signature-verified session payload.
    pub payload: SessionPayload,
}

impl FromRequestParts<ApiState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;

        let raw = jar
            .get(cookies::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthenticated)?;

        let token = cookies::strip_scheme(&raw).ok_or(ApiError::Unauthenticated)?;

        let payload = state
            .codec
            .decode(token)
            .map_err(|_| ApiError::Unauthenticated)?;

        Ok(Self { payload })
    }
}
