//! Route handlers.

pub mod csv;
pub mod groups;
pub mod sessions;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::error::LeagueError;
use crate::models::SessionId;
use crate::store::Store;

/// Parse a session ID from a path segment.
pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session id: {}", raw)))
}

/// Run an operation against one session's store while holding its lock.
pub(crate) async fn with_store<T>(
    state: &AppState,
    session_id: &str,
    op: impl FnOnce(&mut Store) -> Result<T, LeagueError>,
) -> Result<T, ApiError> {
    let id = parse_session_id(session_id)?;
    let mut session = state.sessions.checkout(id).await?;
    Ok(op(&mut session.store)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;

    pub fn test_app() -> axum::Router {
        build_router(AppState::new(AppConfig::default()))
    }

    pub async fn send(
        app: &axum::Router,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let resp = app
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    pub async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app, "GET", uri, None, Vec::new()).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn send_json(
        app: &axum::Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let (status, body) = send(
            app,
            method,
            uri,
            Some("application/json"),
            body.as_bytes().to_vec(),
        )
        .await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    /// Create a session and return its ID.
    pub async fn new_session(app: &axum::Router) -> String {
        let (status, json) = send_json(app, "POST", "/api/sessions", "").await;
        assert_eq!(status, StatusCode::CREATED);
        json["session_id"].as_str().unwrap().to_string()
    }
}
