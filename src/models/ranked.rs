//! Ranked standings rows.

use serde::{Deserialize, Serialize};

/// Podium decoration for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

impl Badge {
    /// Badge for a 1-based rank, if it is on the podium.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Badge::Gold),
            2 => Some(Badge::Silver),
            3 => Some(Badge::Bronze),
            _ => None,
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::Gold => write!(f, "gold"),
            Badge::Silver => write!(f, "silver"),
            Badge::Bronze => write!(f, "bronze"),
        }
    }
}

/// A team's standing with derived columns.
///
/// Produced fresh on every read; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    /// 1-based position in the standings
    pub rank: usize,

    pub team: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub rounds_won: u32,

    /// Point differential: wins - losses
    pub pd: i64,

    /// PD plus rounds won
    pub pdt: i64,

    /// Ranking score: PD + PDT + rounds won
    pub total: i64,
}

impl RankedRow {
    pub fn badge(&self) -> Option<Badge> {
        Badge::for_rank(self.rank)
    }
}
