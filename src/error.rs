//! Errors raised by league operations.
//!
//! Every variant is recoverable: a failed operation leaves the store exactly
//! as it was before the call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueError {
    #[error("A group named '{0}' already exists")]
    DuplicateGroup(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Unknown team '{team}' in group '{group}'")]
    UnknownTeam { group: String, team: String },

    #[error("Team '{0}' is listed more than once")]
    DuplicateTeam(String),

    #[error("Group name must not be blank")]
    EmptyGroupName,

    #[error("At least one team name is required")]
    EmptyTeamList,

    #[error("No match data entered, nothing to apply")]
    NoOpBatch,

    #[error("No group deletion is awaiting confirmation")]
    NoPendingDelete,

    #[error("CSV missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to parse CSV: {0}")]
    MalformedCsv(String),
}
