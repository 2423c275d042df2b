//! Match result application.
//!
//! A match is recorded as a batch of per-team entries. Placement 1 counts as a
//! win, any placement above 1 as a loss, and placement 0 (not placed) only
//! contributes matches played and rounds won.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LeagueError;
use crate::store::Store;

/// One team's result within a match batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub team: String,

    /// Finishing position (1 = winner, 0 = not placed)
    #[serde(default)]
    pub placement_rank: u32,

    #[serde(default)]
    pub rounds_won: u32,
}

impl MatchEntry {
    pub fn new(team: impl Into<String>, placement_rank: u32, rounds_won: u32) -> Self {
        Self {
            team: team.into(),
            placement_rank,
            rounds_won,
        }
    }

    /// Entries with neither a placement nor rounds carry no data.
    pub fn is_noop(&self) -> bool {
        self.placement_rank == 0 && self.rounds_won == 0
    }

    pub fn is_win(&self) -> bool {
        self.placement_rank == 1
    }

    pub fn is_loss(&self) -> bool {
        self.placement_rank > 1
    }
}

/// Summary of an applied batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedBatch {
    /// Teams whose counters changed
    pub applied: Vec<String>,

    /// Entries naming teams outside the group
    pub skipped: Vec<String>,
}

/// Drop entries that carry no match data.
pub fn filter_entries(entries: Vec<MatchEntry>) -> Vec<MatchEntry> {
    entries.into_iter().filter(|e| !e.is_noop()).collect()
}

/// Apply one match batch to a group.
///
/// The batch is accumulated on a copy of the group's teams and committed in a
/// single replace, so either every entry lands or none does.
pub fn apply_match_result(
    store: &mut Store,
    group_name: &str,
    entries: Vec<MatchEntry>,
) -> Result<AppliedBatch, LeagueError> {
    let mut teams = store.require_group(group_name)?.teams.clone();

    let entries = filter_entries(entries);
    if entries.is_empty() {
        return Err(LeagueError::NoOpBatch);
    }

    let mut summary = AppliedBatch::default();
    for entry in entries {
        let Some(team) = teams.iter_mut().find(|t| t.name == entry.team) else {
            debug!("Skipping '{}': not in '{}'", entry.team, group_name);
            summary.skipped.push(entry.team);
            continue;
        };

        // Counters may have been set to any value by a manual edit.
        team.matches_played = team.matches_played.saturating_add(1);
        if entry.is_win() {
            team.wins = team.wins.saturating_add(1);
        } else if entry.is_loss() {
            team.losses = team.losses.saturating_add(1);
        }
        team.rounds_won = team.rounds_won.saturating_add(entry.rounds_won);

        summary.applied.push(entry.team);
    }

    store.replace_teams(group_name, teams)?;
    info!(
        "Applied match to '{}': {} teams updated, {} skipped",
        group_name,
        summary.applied.len(),
        summary.skipped.len()
    );

    Ok(summary)
}
