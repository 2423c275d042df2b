//! Standings calculation engine.
//!
//! Derives ranking metrics from raw team counters:
//! - PD (wins - losses)
//! - PDT (PD + rounds won)
//! - Total (PD + PDT + rounds won)
//! - Rank, from a stable sort on (Total, PD, rounds won), all descending

use crate::models::{RankedRow, TeamRecord};

/// Calculate point differential.
pub fn compute_pd(wins: u32, losses: u32) -> i64 {
    i64::from(wins) - i64::from(losses)
}

/// Calculate PDT from point differential and rounds won.
pub fn compute_pdt(pd: i64, rounds_won: u32) -> i64 {
    pd + i64::from(rounds_won)
}

/// Calculate the ranking score.
///
/// Rounds won is counted twice (once through PDT) and PD twice; this is the
/// league's published formula and is kept as-is.
pub fn compute_total(pd: i64, pdt: i64, rounds_won: u32) -> i64 {
    pd + pdt + i64::from(rounds_won)
}

/// Build the unranked row for a single team.
fn row_for(team: &TeamRecord) -> RankedRow {
    let pd = compute_pd(team.wins, team.losses);
    let pdt = compute_pdt(pd, team.rounds_won);
    let total = compute_total(pd, pdt, team.rounds_won);

    RankedRow {
        rank: 0,
        team: team.name.clone(),
        matches_played: team.matches_played,
        wins: team.wins,
        losses: team.losses,
        rounds_won: team.rounds_won,
        pd,
        pdt,
        total,
    }
}

/// Derive ranked standings from a group's teams.
///
/// Exact ties on (Total, PD, rounds won) keep their input order.
pub fn derive_ranked(teams: &[TeamRecord]) -> Vec<RankedRow> {
    let mut rows: Vec<RankedRow> = teams.iter().map(row_for).collect();

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| b.pd.cmp(&a.pd))
            .then_with(|| b.rounds_won.cmp(&a.rounds_won))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Badge;
    use pretty_assertions::assert_eq;

    fn team(name: &str, matches: u32, wins: u32, losses: u32, rounds: u32) -> TeamRecord {
        TeamRecord::new(name).with_counters(matches, wins, losses, rounds)
    }

    #[test]
    fn test_compute_pd() {
        assert_eq!(compute_pd(3, 1), 2);
        assert_eq!(compute_pd(0, 4), -4);
        assert_eq!(compute_pd(0, 0), 0);
    }

    #[test]
    fn test_compute_pdt() {
        assert_eq!(compute_pdt(2, 45), 47);
        assert_eq!(compute_pdt(-3, 1), -2);
    }

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(1, 46, 45), 92);
        assert_eq!(compute_total(-2, -2, 0), -4);
    }

    #[test]
    fn test_total_closed_form() {
        for wins in 0..6 {
            for losses in 0..6 {
                for rounds in [0, 1, 7, 45, 300] {
                    let pd = compute_pd(wins, losses);
                    let pdt = compute_pdt(pd, rounds);
                    let total = compute_total(pd, pdt, rounds);
                    let expected =
                        2 * (i64::from(wins) - i64::from(losses)) + 2 * i64::from(rounds);
                    assert_eq!(total, expected);
                }
            }
        }
    }

    #[test]
    fn test_derive_ranked_empty() {
        assert!(derive_ranked(&[]).is_empty());
    }

    #[test]
    fn test_derive_ranked_orders_by_total() {
        let teams = vec![
            team("LOW", 2, 0, 2, 5),
            team("HIGH", 3, 2, 1, 45),
            team("MID", 2, 1, 1, 20),
        ];

        let ranked = derive_ranked(&teams);
        let order: Vec<(usize, &str)> = ranked.iter().map(|r| (r.rank, r.team.as_str())).collect();
        assert_eq!(order, vec![(1, "HIGH"), (2, "MID"), (3, "LOW")]);

        let top = &ranked[0];
        assert_eq!(top.pd, 1);
        assert_eq!(top.pdt, 46);
        assert_eq!(top.total, 92);
        assert_eq!(top.badge(), Some(Badge::Gold));
    }

    #[test]
    fn test_derive_ranked_pd_breaks_total_tie() {
        // Both total 20: A = 2*(3-1) + 2*8, B = 2*(0-0) + 2*10
        let teams = vec![team("B", 0, 0, 0, 10), team("A", 4, 3, 1, 8)];

        let ranked = derive_ranked(&teams);
        assert_eq!(ranked[0].total, ranked[1].total);
        assert_eq!(ranked[0].team, "A");
        assert_eq!(ranked[1].team, "B");
    }

    #[test]
    fn test_derive_ranked_matching_keys_keep_input_order() {
        // Equal total and PD imply equal rounds, so matches played is ignored.
        let teams = vec![team("FIRST", 1, 1, 0, 10), team("SECOND", 3, 2, 1, 10)];

        let ranked = derive_ranked(&teams);
        assert_eq!(ranked[0].team, "FIRST");
        assert_eq!(ranked[1].team, "SECOND");
    }

    #[test]
    fn test_derive_ranked_stable_for_exact_ties() {
        let teams = vec![
            team("OG HINATA GAMING", 0, 0, 0, 0),
            team("RVS GAMING", 0, 0, 0, 0),
            team("LRP ESPORTS", 0, 0, 0, 0),
            team("TSS GAMING", 0, 0, 0, 0),
        ];

        let ranked = derive_ranked(&teams);
        let names: Vec<&str> = ranked.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(
            names,
            vec!["OG HINATA GAMING", "RVS GAMING", "LRP ESPORTS", "TSS GAMING"]
        );
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_derive_ranked_idempotent() {
        let teams = vec![
            team("A", 3, 1, 2, 30),
            team("B", 3, 2, 1, 12),
            team("C", 3, 0, 3, 40),
            team("D", 3, 1, 2, 30),
        ];

        assert_eq!(derive_ranked(&teams), derive_ranked(&teams));
    }

    #[test]
    fn test_domination_implies_better_rank() {
        let teams = vec![
            team("A", 5, 1, 4, 12),
            team("B", 5, 4, 1, 3),
            team("C", 5, 2, 3, 20),
            team("D", 2, 2, 0, 0),
            team("E", 5, 0, 5, 50),
        ];

        let ranked = derive_ranked(&teams);
        for a in &ranked {
            for b in &ranked {
                let key_a = (a.total, a.pd, a.rounds_won);
                let key_b = (b.total, b.pd, b.rounds_won);
                if key_a > key_b {
                    assert!(a.rank < b.rank, "{} should outrank {}", a.team, b.team);
                }
            }
        }
    }

    #[test]
    fn test_derive_ranked_does_not_touch_input() {
        let teams = vec![team("Z", 1, 0, 1, 0), team("Y", 1, 1, 0, 3)];
        let before = teams.clone();
        let _ = derive_ranked(&teams);
        assert_eq!(teams, before);
    }
}
