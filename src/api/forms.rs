use axum::extract::{Json, Path, State};
use chrono::Utc;

use super::error::ApiError;
use super::extractor::AuthSession;
use super::state::ApiState;
use crate::models::{Form, FormResponse};
use crate::types::{FormId, ResponseId};

/// `GET /forms` — every form, for authenticated viewing.
pub(super) async fn list_forms(
    State(state): State<ApiState>,
    _session: AuthSession,
) -> Result<Json<Vec<Form>>, ApiError> {
    let forms = state
        .store
        .list_forms()
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;
    Ok(Json(forms))
}

/// `GET /forms/{form_id}` — a single form.
pub(super) async fn get_form(
    State(state): State<ApiState>,
    _session: AuthSession,
    Path(form_id): Path<FormId>,
) -> Result<Json<Form>, ApiError> {
    let form = state
        .store
        .find_form(&form_id)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(form_id.to_string()))?;
    Ok(Json(form))
}

/// `POST /forms/{form_id}/responses` — store a submission, stamped with
/// the session's user snapshot and the submission time.
pub(super) async fn submit_response(
    State(state): State<ApiState>,
    session: AuthSession,
    Path(form_id): Path<FormId>,
    Json(answers): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<FormResponse>, ApiError> {
    let form = state
        .store
        .find_form(&form_id)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(form_id.to_string()))?;

    let response = FormResponse {
        id: ResponseId::generate(),
        form_id: form.id,
        user: session.payload.user_details,
        timestamp: Utc::now(),
        response: answers,
    };

    state
        .store
        .insert_response(response.clone())
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    tracing::info!(response_id = %response.id, form_id = %response.form_id, "response stored");

    Ok(Json(response))
}
