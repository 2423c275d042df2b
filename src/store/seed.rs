//! Default groups loaded at startup and on reset.

use crate::models::Group;

/// Group names and team names of the default league.
pub const SEED_GROUPS: [(&str, [&str; 4]); 4] = [
    (
        "Group A",
        ["OG HINATA GAMING", "RVS GAMING", "LRP ESPORTS", "TSS GAMING"],
    ),
    ("Group B", ["WAR GOD", "AURA ACES", "RV SQUAD", "NAMMA RIVALS"]),
    ("Group C", ["RK GAM", "V CHAMPS", "TEAM X", "SQUAD LEGENDS"]),
    ("Group D", ["NINJA FORCE", "STEALTH", "PHOENIX", "RISING SUN"]),
];

/// Build the default groups with zeroed counters.
pub fn seed_groups() -> Vec<Group> {
    SEED_GROUPS
        .iter()
        .map(|(name, teams)| Group::with_team_names(*name, teams.iter().copied()))
        .collect()
}
