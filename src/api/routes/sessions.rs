use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::routes::{parse_session_id, with_store};
use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub sessions: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions.len().await,
    })
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub groups: Vec<String>,
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let id = state.sessions.create().await?;
    let groups: Vec<String> = with_store(&state, &id.to_string(), |store| {
        Ok(store.group_names().into_iter().map(String::from).collect())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id.to_string(),
            groups,
        }),
    ))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Restore the default groups.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let groups: Vec<String> = with_store(&state, &id, |store| {
        store.reset_to_default();
        Ok(store.group_names().into_iter().map(String::from).collect())
    })
    .await?;

    Ok(Json(SessionResponse {
        session_id: id,
        groups,
    }))
}
