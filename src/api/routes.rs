use std::sync::Arc;

use axum::Router;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, header::ORIGIN};
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::config::ApiConfig;
use super::cookies::{self, CookieAttributes};
use super::error::ApiError;
use super::extractor::AuthSession;
use super::forms;
use super::state::ApiState;
use crate::discord::BearerToken;
use crate::store::FormStore;
use crate::token::{SessionCodec, SessionPayload};

/// Create the backend router.
pub fn router(config: ApiConfig, store: Arc<dyn FormStore>) -> Router {
    let state = ApiState {
        discord: Arc::new(config.client),
        codec: SessionCodec::new(config.settings.secret_key.as_bytes()),
        store,
        settings: config.settings,
    };

    Router::new()
        .route("/authorize", post(authorize))
        .route("/refresh", post(refresh))
        .route("/forms", get(forms::list_forms))
        .route("/forms/{form_id}", get(forms::get_form))
        .route("/forms/{form_id}/responses", post(forms::submit_response))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    /// The authorization code received from Discord.
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    /// Discord display name.
    pub username: String,
    /// Timestamp of session expiry.
    pub expiry: DateTime<Utc>,
}

// ── Initial authorization ──────────────────────────────────────────

async fn authorize(
    State(state): State<ApiState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(body): Json<AuthorizeRequest>,
) -> Result<(CookieJar, Json<AuthorizeResponse>), ApiError> {
    let origin = request_origin(&headers);

    // No cookie clear on exchange failure: none may exist yet.
    let bearer = state
        .discord
        .exchange_code(&body.token, origin.as_deref(), false)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "authorization code exchange failed");
            ApiError::AuthFailure { clear_cookie: false }
        })?;

    let (cookie, response) = process_token(&state, bearer, origin.as_deref()).await?;

    tracing::info!(username = %response.username, "session issued");

    Ok((jar.add(cookie), Json(response)))
}

// ── Refresh ────────────────────────────────────────────────────────

async fn refresh(
    State(state): State<ApiState>,
    session: AuthSession,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<AuthorizeResponse>), ApiError> {
    let origin = request_origin(&headers);

    let bearer = state
        .discord
        .exchange_code(&session.payload.refresh, origin.as_deref(), true)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "refresh token exchange failed");
            ApiError::AuthFailure { clear_cookie: false }
        })?;

    let (cookie, response) = process_token(&state, bearer, origin.as_deref()).await?;

    tracing::info!(username = %response.username, "session renewed");

    Ok((jar.add(cookie), Json(response)))
}

// ── Shared flow ────────────────────────────────────────────────────

/// Turn freshly exchanged bearer credentials into a signed session.
///
/// Fetches the user's profile, signs the session payload, and applies the
/// cookie policy. A profile failure instructs the client to drop any
/// existing session cookie — the access token was already consumed, so
/// whatever session the cookie described is gone either way.
async fn process_token(
    state: &ApiState,
    bearer: BearerToken,
    origin: Option<&str>,
) -> Result<(Cookie<'static>, AuthorizeResponse), ApiError> {
    let issued_at = Utc::now();

    let user_details = state
        .discord
        .fetch_user_details(&bearer.access_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "profile fetch failed");
            ApiError::AuthFailure { clear_cookie: true }
        })?;

    // Computed once at issuance; decode checks against this exact value.
    let expiry = issued_at + Duration::seconds(bearer.expires_in as i64);
    let username = user_details.display_name().to_owned();

    let payload = SessionPayload {
        token: bearer.access_token,
        refresh: bearer.refresh_token,
        user_details,
        expiry,
    };
    let token = state
        .codec
        .encode(&payload)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let attrs = CookieAttributes::evaluate(
        origin,
        state.settings.production,
        &state.settings.production_url,
    );
    let cookie = cookies::session_cookie(&token, attrs, bearer.expires_in);

    Ok((cookie, AuthorizeResponse { username, expiry }))
}

fn request_origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
