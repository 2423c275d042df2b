//! Per-team accumulated statistics.

use serde::{Deserialize, Serialize};

/// One team's accumulated statistics within a group.
///
/// Only raw counters live here. PD, PDT, Total and rank are derived on read
/// by [`crate::calculate::derive_ranked`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team name, unique within its group
    pub name: String,

    /// Matches played
    pub matches_played: u32,

    /// Matches won (placement 1)
    pub wins: u32,

    /// Matches lost (placement > 1)
    pub losses: u32,

    /// Rounds won across all matches
    pub rounds_won: u32,
}

impl TeamRecord {
    /// Create a team with all counters at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matches_played: 0,
            wins: 0,
            losses: 0,
            rounds_won: 0,
        }
    }

    /// Builder method to set all four counters.
    pub fn with_counters(mut self, matches: u32, wins: u32, losses: u32, rounds_won: u32) -> Self {
        self.set_counters(matches, wins, losses, rounds_won);
        self
    }

    /// Overwrite all four counters.
    pub fn set_counters(&mut self, matches: u32, wins: u32, losses: u32, rounds_won: u32) {
        self.matches_played = matches;
        self.wins = wins;
        self.losses = losses;
        self.rounds_won = rounds_won;
    }

    /// Whether the team has any recorded activity.
    pub fn is_blank(&self) -> bool {
        self.matches_played == 0 && self.wins == 0 && self.losses == 0 && self.rounds_won == 0
    }
}
