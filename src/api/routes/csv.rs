use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::api::routes::with_store;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::storage::{export_file_name, export_teams_csv, import_group_csv};

/// Download a group's table as CSV.
pub async fn export_csv(
    State(state): State<AppState>,
    Path((id, group)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let teams = with_store(&state, &id, |store| {
        Ok(store.require_group(&group)?.teams.clone())
    })
    .await?;
    let bytes = export_teams_csv(&teams)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CONTENT_DISPOSITION, attachment_header(&group))
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// `Content-Disposition` value for a group export. Control characters are
/// dropped and quotes escaped so any group name yields a valid header.
fn attachment_header(group: &str) -> String {
    let mut file_name = String::new();
    for c in export_file_name(group).chars().filter(|c| !c.is_control()) {
        if matches!(c, '"' | '\\') {
            file_name.push('\\');
        }
        file_name.push(c);
    }
    format!("attachment; filename=\"{}\"", file_name)
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub group: String,
    pub imported: usize,
}

/// Replace a group's teams from an uploaded CSV body.
pub async fn import_csv(
    State(state): State<AppState>,
    Path((id, group)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ImportResponse>, ApiError> {
    let imported = with_store(&state, &id, |store| import_group_csv(store, &group, &body)).await?;
    Ok(Json(ImportResponse { group, imported }))
}
