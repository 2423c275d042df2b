//! Named, ordered collection of teams.

use serde::{Deserialize, Serialize};

use super::TeamRecord;

/// A named group of teams in insertion order.
///
/// Team order is the order teams were added or imported, not rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub teams: Vec<TeamRecord>,
}

impl Group {
    pub fn new(name: impl Into<String>, teams: Vec<TeamRecord>) -> Self {
        Self {
            name: name.into(),
            teams,
        }
    }

    /// Create a group with one zeroed team per name.
    pub fn with_team_names<I, S>(name: impl Into<String>, team_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, team_names.into_iter().map(TeamRecord::new).collect())
    }

    /// Get a team by exact name.
    pub fn team(&self, name: &str) -> Option<&TeamRecord> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Get a mutable team by exact name.
    pub fn team_mut(&mut self, name: &str) -> Option<&mut TeamRecord> {
        self.teams.iter_mut().find(|t| t.name == name)
    }

    /// Team names in insertion order.
    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
