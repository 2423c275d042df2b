//! REST API endpoints.
//!
//! Axum-based HTTP API exposing group standings, match entry, manual edits,
//! CSV import/export and group management. Every call is scoped to a session
//! that owns its own store.

pub mod routes;
pub mod sessions;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::LeagueError;
use crate::storage::StorageError;
use sessions::SessionError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    League(#[from] LeagueError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Status and stable error code for a league error.
fn league_status(err: &LeagueError) -> (StatusCode, &'static str) {
    match err {
        LeagueError::UnknownGroup(_) => (StatusCode::NOT_FOUND, "UNKNOWN_GROUP"),
        LeagueError::UnknownTeam { .. } => (StatusCode::NOT_FOUND, "UNKNOWN_TEAM"),
        LeagueError::DuplicateGroup(_) => (StatusCode::CONFLICT, "DUPLICATE_GROUP"),
        LeagueError::DuplicateTeam(_) => (StatusCode::CONFLICT, "DUPLICATE_TEAM"),
        LeagueError::NoPendingDelete => (StatusCode::CONFLICT, "NO_PENDING_DELETE"),
        LeagueError::EmptyGroupName => (StatusCode::BAD_REQUEST, "EMPTY_GROUP_NAME"),
        LeagueError::EmptyTeamList => (StatusCode::BAD_REQUEST, "EMPTY_TEAM_LIST"),
        LeagueError::NoOpBatch => (StatusCode::BAD_REQUEST, "NO_OP_BATCH"),
        LeagueError::MissingColumns(_) => (StatusCode::BAD_REQUEST, "MISSING_COLUMNS"),
        LeagueError::MalformedCsv(_) => (StatusCode::BAD_REQUEST, "MALFORMED_CSV"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::League(err) => league_status(err),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SessionError::Full(_) => ApiError::Unavailable(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::League(err) => ApiError::League(err),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    use routes::{csv as csv_routes, groups, sessions as session_routes};

    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(session_routes::health))
        .route("/api/sessions", post(session_routes::create_session))
        .route("/api/sessions/:id", delete(session_routes::close_session))
        .route("/api/sessions/:id/reset", post(session_routes::reset_session))
        .route(
            "/api/sessions/:id/groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route("/api/sessions/:id/groups/:group", get(groups::get_standings))
        .route(
            "/api/sessions/:id/groups/:group/results",
            post(groups::apply_results),
        )
        .route(
            "/api/sessions/:id/groups/:group/teams/:team",
            put(groups::update_team),
        )
        .route(
            "/api/sessions/:id/groups/:group/delete",
            post(groups::request_delete),
        )
        .route("/api/sessions/:id/delete", get(groups::pending_delete))
        .route("/api/sessions/:id/delete/confirm", post(groups::confirm_delete))
        .route("/api/sessions/:id/delete/cancel", post(groups::cancel_delete))
        .route(
            "/api/sessions/:id/groups/:group/csv",
            get(csv_routes::export_csv).put(csv_routes::import_csv),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
