//! In-memory group store.
//!
//! Holds the canonical team counters for one session:
//! - Ordered groups (creation order)
//! - Insertion-ordered teams within each group
//! - The two-step group deletion state
//!
//! Every mutating operation validates first and then commits, so a failed
//! call never leaves a group half-updated.

mod seed;

pub use seed::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculate::derive_ranked;
use crate::error::LeagueError;
use crate::models::{Group, RankedRow, TeamRecord};

/// Group deletion confirmation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "group", rename_all = "snake_case")]
pub enum PendingDelete {
    #[default]
    Idle,
    AwaitingConfirm(String),
}

impl PendingDelete {
    /// Group awaiting confirmation, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            PendingDelete::Idle => None,
            PendingDelete::AwaitingConfirm(group) => Some(group),
        }
    }
}

/// Counter overwrite for a manual team edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterUpdate {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub rounds_won: u32,
}

/// Per-session league state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    groups: Vec<Group>,
    pending_delete: PendingDelete,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a store loaded with the default groups.
    pub fn new() -> Self {
        Self::from_groups(seed_groups())
    }

    /// Create a store with no groups.
    pub fn empty() -> Self {
        Self::from_groups(Vec::new())
    }

    /// Create a store from existing groups.
    pub fn from_groups(groups: Vec<Group>) -> Self {
        Self {
            groups,
            pending_delete: PendingDelete::Idle,
        }
    }

    /// Group names in creation order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Get a group or report it as unknown.
    pub fn require_group(&self, name: &str) -> Result<&Group, LeagueError> {
        self.group(name)
            .ok_or_else(|| LeagueError::UnknownGroup(name.to_string()))
    }

    fn group_mut(&mut self, name: &str) -> Result<&mut Group, LeagueError> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| LeagueError::UnknownGroup(name.to_string()))
    }

    /// Ranked standings of a group, derived fresh.
    pub fn ranked(&self, name: &str) -> Result<Vec<RankedRow>, LeagueError> {
        Ok(derive_ranked(&self.require_group(name)?.teams))
    }

    /// Create a group with zeroed teams.
    ///
    /// The group name and team names are trimmed; blank team names are
    /// skipped.
    pub fn create_group<I, S>(&mut self, name: &str, team_names: I) -> Result<(), LeagueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::EmptyGroupName);
        }
        if self.group(name).is_some() {
            return Err(LeagueError::DuplicateGroup(name.to_string()));
        }

        let team_names: Vec<String> = team_names
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if team_names.is_empty() {
            return Err(LeagueError::EmptyTeamList);
        }
        ensure_unique(team_names.iter().map(String::as_str))?;

        info!("Created group '{}' with {} teams", name, team_names.len());
        self.groups.push(Group::with_team_names(name, team_names));
        Ok(())
    }

    /// Delete a group immediately.
    pub fn delete_group(&mut self, name: &str) -> Result<(), LeagueError> {
        let idx = self
            .groups
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| LeagueError::UnknownGroup(name.to_string()))?;

        self.groups.remove(idx);
        if self.pending_delete.target() == Some(name) {
            self.pending_delete = PendingDelete::Idle;
        }

        info!("Deleted group '{}'", name);
        Ok(())
    }

    pub fn pending_delete(&self) -> &PendingDelete {
        &self.pending_delete
    }

    /// Mark a group for deletion; it is removed on [`Store::confirm_delete`].
    ///
    /// A new request replaces any earlier pending one.
    pub fn request_delete(&mut self, name: &str) -> Result<(), LeagueError> {
        self.require_group(name)?;
        debug!("Awaiting confirmation to delete '{}'", name);
        self.pending_delete = PendingDelete::AwaitingConfirm(name.to_string());
        Ok(())
    }

    /// Delete the group awaiting confirmation and return its name.
    ///
    /// Always returns to idle, including when the target no longer exists.
    pub fn confirm_delete(&mut self) -> Result<String, LeagueError> {
        match std::mem::take(&mut self.pending_delete) {
            PendingDelete::Idle => Err(LeagueError::NoPendingDelete),
            PendingDelete::AwaitingConfirm(name) => {
                self.delete_group(&name)?;
                Ok(name)
            }
        }
    }

    /// Abandon a pending deletion.
    pub fn cancel_delete(&mut self) {
        if let Some(name) = self.pending_delete.target() {
            debug!("Cancelled deletion of '{}'", name);
        }
        self.pending_delete = PendingDelete::Idle;
    }

    /// Replace a group's teams wholesale.
    pub fn replace_teams(
        &mut self,
        group_name: &str,
        teams: Vec<TeamRecord>,
    ) -> Result<(), LeagueError> {
        ensure_unique(teams.iter().map(|t| t.name.as_str()))?;
        let group = self.group_mut(group_name)?;
        debug!(
            "Replacing {} teams in '{}' with {}",
            group.teams.len(),
            group_name,
            teams.len()
        );
        group.teams = teams;
        Ok(())
    }

    /// Overwrite one team's counters.
    pub fn update_team_counters(
        &mut self,
        group_name: &str,
        team_name: &str,
        update: CounterUpdate,
    ) -> Result<(), LeagueError> {
        let group = self.group_mut(group_name)?;
        let team = group
            .team_mut(team_name)
            .ok_or_else(|| LeagueError::UnknownTeam {
                group: group_name.to_string(),
                team: team_name.to_string(),
            })?;

        team.set_counters(update.matches, update.wins, update.losses, update.rounds_won);
        debug!("Updated '{}' in '{}': {:?}", team_name, group_name, update);
        Ok(())
    }

    /// Restore the default groups and clear any pending deletion.
    pub fn reset_to_default(&mut self) {
        *self = Self::new();
        info!("Reset all groups to defaults");
    }
}

fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), LeagueError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(LeagueError::DuplicateTeam(name.to_string()));
        }
    }
    Ok(())
}
