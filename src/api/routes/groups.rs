use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::with_store;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Badge, RankedRow};
use crate::results::{apply_match_result, MatchEntry};
use crate::store::{CounterUpdate, PendingDelete, Store};

#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub team_count: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Serialize)]
pub struct StandingRow {
    #[serde(flatten)]
    pub row: RankedRow,
    pub badge: Option<Badge>,
}

impl From<RankedRow> for StandingRow {
    fn from(row: RankedRow) -> Self {
        let badge = row.badge();
        Self { row, badge }
    }
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub group: String,
    pub standings: Vec<StandingRow>,
}

impl StandingsResponse {
    fn new(group: &str, rows: Vec<RankedRow>) -> Self {
        Self {
            group: group.to_string(),
            standings: rows.into_iter().map(StandingRow::from).collect(),
        }
    }
}

fn standings(store: &Store, group: &str) -> Result<StandingsResponse, crate::error::LeagueError> {
    Ok(StandingsResponse::new(group, store.ranked(group)?))
}

pub async fn list_groups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GroupListResponse>, ApiError> {
    let groups: Vec<GroupSummary> = with_store(&state, &id, |store| {
        Ok(store
            .groups()
            .iter()
            .map(|g| GroupSummary {
                name: g.name.clone(),
                team_count: g.len(),
            })
            .collect())
    })
    .await?;

    Ok(Json(GroupListResponse { groups }))
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

pub async fn create_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<StandingsResponse>), ApiError> {
    let response = with_store(&state, &id, |store| {
        store.create_group(&req.name, &req.teams)?;
        standings(store, req.name.trim())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_standings(
    State(state): State<AppState>,
    Path((id, group)): Path<(String, String)>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let response = with_store(&state, &id, |store| standings(store, &group)).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ApplyResultsRequest {
    pub entries: Vec<MatchEntry>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResultsResponse {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    #[serde(flatten)]
    pub standings: StandingsResponse,
}

/// Record one match for a group.
pub async fn apply_results(
    State(state): State<AppState>,
    Path((id, group)): Path<(String, String)>,
    Json(req): Json<ApplyResultsRequest>,
) -> Result<Json<ApplyResultsResponse>, ApiError> {
    let response = with_store(&state, &id, |store| {
        let batch = apply_match_result(store, &group, req.entries)?;
        Ok(ApplyResultsResponse {
            applied: batch.applied,
            skipped: batch.skipped,
            standings: standings(store, &group)?,
        })
    })
    .await?;

    Ok(Json(response))
}

/// Overwrite one team's counters.
pub async fn update_team(
    State(state): State<AppState>,
    Path((id, group, team)): Path<(String, String, String)>,
    Json(update): Json<CounterUpdate>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let response = with_store(&state, &id, |store| {
        store.update_team_counters(&group, &team, update)?;
        standings(store, &group)
    })
    .await?;

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct PendingDeleteResponse {
    pub pending_delete: PendingDelete,
}

pub async fn request_delete(
    State(state): State<AppState>,
    Path((id, group)): Path<(String, String)>,
) -> Result<Json<PendingDeleteResponse>, ApiError> {
    let pending_delete = with_store(&state, &id, |store| {
        store.request_delete(&group)?;
        Ok(store.pending_delete().clone())
    })
    .await?;

    Ok(Json(PendingDeleteResponse { pending_delete }))
}

pub async fn pending_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PendingDeleteResponse>, ApiError> {
    let pending_delete = with_store(&state, &id, |store| Ok(store.pending_delete().clone())).await?;
    Ok(Json(PendingDeleteResponse { pending_delete }))
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
    pub groups: Vec<String>,
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let response = with_store(&state, &id, |store| {
        let deleted = store.confirm_delete()?;
        Ok(DeletedResponse {
            deleted,
            groups: store.group_names().into_iter().map(String::from).collect(),
        })
    })
    .await?;

    Ok(Json(response))
}

pub async fn cancel_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PendingDeleteResponse>, ApiError> {
    let pending_delete = with_store(&state, &id, |store| {
        store.cancel_delete();
        Ok(store.pending_delete().clone())
    })
    .await?;

    Ok(Json(PendingDeleteResponse { pending_delete }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn uri(id: &str, rest: &str) -> String {
        format!("/api/sessions/{}{}", id, rest)
    }

    #[tokio::test]
    async fn test_list_groups() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = get_json(&app, &uri(&id, "/groups")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["groups"][0]["name"], "Group A");
        assert_eq!(json["groups"][0]["team_count"], 4);
        assert_eq!(json["groups"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_get_standings_with_encoded_name() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = get_json(&app, &uri(&id, "/groups/Group%20B")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["group"], "Group B");
        assert_eq!(json["standings"][0]["team"], "WAR GOD");
        assert_eq!(json["standings"][0]["rank"], 1);
        assert_eq!(json["standings"][0]["badge"], "gold");
        assert!(json["standings"][3]["badge"].is_null());
    }

    #[tokio::test]
    async fn test_get_unknown_group() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = get_json(&app, &uri(&id, "/groups/Group%20Z")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "UNKNOWN_GROUP");
    }

    #[tokio::test]
    async fn test_create_group() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &uri(&id, "/groups"),
            r#"{"name": " Group E ", "teams": ["ALPHA", "", " BRAVO "]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["group"], "Group E");
        assert_eq!(json["standings"][1]["team"], "BRAVO");
    }

    #[tokio::test]
    async fn test_create_duplicate_group() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &uri(&id, "/groups"),
            r#"{"name": "Group A", "teams": ["ALPHA"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "DUPLICATE_GROUP");

        let (_, json) = get_json(&app, &uri(&id, "/groups/Group%20A")).await;
        assert_eq!(json["standings"][0]["team"], "OG HINATA GAMING");
    }

    #[tokio::test]
    async fn test_create_group_without_teams() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) =
            send_json(&app, "POST", &uri(&id, "/groups"), r#"{"name": "Group E"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "EMPTY_TEAM_LIST");
    }

    #[tokio::test]
    async fn test_apply_results() {
        let app = test_app();
        let id = new_session(&app).await;

        let body = json!({
            "entries": [
                {"team": "RVS GAMING", "placement_rank": 1, "rounds_won": 10},
                {"team": "TSS GAMING", "placement_rank": 2, "rounds_won": 5},
                {"team": "GHOST", "placement_rank": 3, "rounds_won": 1},
                {"team": "LRP ESPORTS", "placement_rank": 0, "rounds_won": 0}
            ]
        });
        let (status, json) = send_json(
            &app,
            "POST",
            &uri(&id, "/groups/Group%20A/results"),
            &body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["applied"], json!(["RVS GAMING", "TSS GAMING"]));
        assert_eq!(json["skipped"], json!(["GHOST"]));
        assert_eq!(json["standings"][0]["team"], "RVS GAMING");
        assert_eq!(json["standings"][0]["matches_played"], 1);
        assert_eq!(json["standings"][0]["total"], 22);
        assert_eq!(json["standings"][1]["team"], "TSS GAMING");
        assert_eq!(json["standings"][1]["pd"], -1);
    }

    #[tokio::test]
    async fn test_apply_noop_results() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &uri(&id, "/groups/Group%20A/results"),
            r#"{"entries": [{"team": "RVS GAMING", "placement_rank": 0, "rounds_won": 0}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "NO_OP_BATCH");
    }

    #[tokio::test]
    async fn test_update_team() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = send_json(
            &app,
            "PUT",
            &uri(&id, "/groups/Group%20C/teams/TEAM%20X"),
            r#"{"matches": 3, "wins": 2, "losses": 1, "rounds_won": 45}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["standings"][0]["team"], "TEAM X");
        assert_eq!(json["standings"][0]["total"], 92);
    }

    #[tokio::test]
    async fn test_update_unknown_team() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) = send_json(
            &app,
            "PUT",
            &uri(&id, "/groups/Group%20C/teams/NOBODY"),
            r#"{"matches": 1, "wins": 1, "losses": 0, "rounds_won": 1}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "UNKNOWN_TEAM");
    }

    #[tokio::test]
    async fn test_two_step_delete_confirm() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, json) =
            send_json(&app, "POST", &uri(&id, "/groups/Group%20D/delete"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["pending_delete"],
            json!({"state": "awaiting_confirm", "group": "Group D"})
        );

        // Still present until confirmed.
        let (status, _) = get_json(&app, &uri(&id, "/groups/Group%20D")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send_json(&app, "POST", &uri(&id, "/delete/confirm"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], "Group D");
        assert_eq!(json["groups"], json!(["Group A", "Group B", "Group C"]));

        let (_, json) = get_json(&app, &uri(&id, "/delete")).await;
        assert_eq!(json["pending_delete"], json!({"state": "idle"}));
    }

    #[tokio::test]
    async fn test_two_step_delete_cancel() {
        let app = test_app();
        let id = new_session(&app).await;

        send_json(&app, "POST", &uri(&id, "/groups/Group%20D/delete"), "").await;
        let (status, json) = send_json(&app, "POST", &uri(&id, "/delete/cancel"), "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pending_delete"], json!({"state": "idle"}));

        let (status, json) = send_json(&app, "POST", &uri(&id, "/delete/confirm"), "").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "NO_PENDING_DELETE");

        let (status, _) = get_json(&app, &uri(&id, "/groups/Group%20D")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_groups() {
        let app = test_app();
        let a = new_session(&app).await;
        let b = new_session(&app).await;

        send_json(&app, "POST", &uri(&a, "/groups/Group%20A/delete"), "").await;
        send_json(&app, "POST", &uri(&a, "/delete/confirm"), "").await;

        let (status, _) = get_json(&app, &uri(&a, "/groups/Group%20A")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json(&app, &uri(&b, "/groups/Group%20A")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
