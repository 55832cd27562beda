use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::engine::{score_player, ScoreResult};
use super::error::ScoreError;
use super::rules::RulePack;
use super::week::WeekContext;
use crate::game::{GameState, PlayerPrediction};

/// A player's result together with their place on the board
#[derive(Debug, Clone)]
pub struct PlayerScore<'a> {
    pub rank: usize,
    pub player: &'a PlayerPrediction,
    pub result: ScoreResult,
}

/// A total in tenths of a point, the precision totals are displayed at.
/// Ranking compares these so totals that print the same also tie.
pub fn display_tenths(total: f64) -> i64 {
    (total * 10.0).round() as i64
}

/// Score every player in the snapshot and rank them.
///
/// Sorted by total (at display precision) descending, then player id.
/// Equal totals share a rank (1, 1, 3).
pub fn score_all<'a>(
    state: &'a GameState,
    pack: &RulePack,
) -> Result<Vec<PlayerScore<'a>>, ScoreError> {
    let cast = state
        .cast_status
        .as_ref()
        .ok_or(ScoreError::MissingCastStatus)?;

    let mut seen = HashSet::new();
    if let Some(dup) = state.players.iter().find(|p| !seen.insert(p.id.as_str())) {
        return Err(ScoreError::DuplicatePlayer { id: dup.id.clone() });
    }

    // Shared by every player; each calculation only reads the snapshot
    let week = WeekContext::new(state);
    let results = state.weekly_results.as_ref();

    let mut scored: Vec<PlayerScore<'a>> = state
        .players
        .iter()
        .map(|player| PlayerScore {
            rank: 0,
            player,
            result: score_player(cast, results, &week, pack, player),
        })
        .collect();

    scored.sort_by(|a, b| {
        let total_cmp = display_tenths(b.result.total).cmp(&display_tenths(a.result.total));
        if total_cmp != Ordering::Equal {
            return total_cmp;
        }
        a.player.id.cmp(&b.player.id)
    });

    let mut previous_key = None;
    let mut rank = 0;
    for (idx, entry) in scored.iter_mut().enumerate() {
        let key = display_tenths(entry.result.total);
        if previous_key != Some(key) {
            rank = idx + 1;
            previous_key = Some(key);
        }
        entry.rank = rank;
    }

    tracing::debug!(
        players = scored.len(),
        rule_pack = %pack.id,
        "scored leaderboard"
    );

    Ok(scored)
}

/// `{playerId: total}` map, the form archived between weeks
pub fn totals_by_player(scores: &[PlayerScore<'_>]) -> BTreeMap<String, f64> {
    scores
        .iter()
        .map(|s| (s.player.id.clone(), s.result.total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CastStatus, DraftPick, Role};

    fn state_with(players: &[(&str, Option<&str>)]) -> GameState {
        let mut cast = BTreeMap::new();
        cast.insert(
            "Alan".to_string(),
            CastStatus {
                is_winner: true,
                ..Default::default()
            },
        );
        cast.insert(
            "Bea".to_string(),
            CastStatus {
                is_first_out: true,
                ..Default::default()
            },
        );
        GameState {
            cast_status: Some(cast),
            weekly_results: None,
            active_week_id: None,
            players: players
                .iter()
                .map(|(id, winner)| PlayerPrediction {
                    id: id.to_string(),
                    pred_winner: winner.map(str::to_string),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_sorted_by_total_then_id() {
        let state = state_with(&[("zoe", Some("Alan")), ("bob", None), ("amy", Some("Alan"))]);
        let scores = score_all(&state, &RulePack::classic()).unwrap();
        let ids: Vec<_> = scores.iter().map(|s| s.player.id.as_str()).collect();
        assert_eq!(ids, vec!["amy", "zoe", "bob"]);
    }

    #[test]
    fn test_ties_share_rank() {
        let state = state_with(&[
            ("a", Some("Alan")),
            ("b", Some("Alan")),
            ("c", None),
            ("d", Some("Bea")),
        ]);
        let scores = score_all(&state, &RulePack::classic()).unwrap();
        let ranks: Vec<_> = scores.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
        assert_eq!(scores[3].result.total, -2.0);
    }

    #[test]
    fn test_matches_single_player_calculation() {
        let state = state_with(&[("a", Some("Alan")), ("b", Some("Bea"))]);
        let pack = RulePack::classic();
        let scores = score_all(&state, &pack).unwrap();
        for entry in &scores {
            let single = crate::scoring::calculate_score(&state, &pack, entry.player).unwrap();
            assert_eq!(single, entry.result);
        }
    }

    #[test]
    fn test_missing_cast_status_fails() {
        let mut state = state_with(&[("a", None)]);
        state.cast_status = None;
        let err = score_all(&state, &RulePack::classic()).unwrap_err();
        assert_eq!(err, ScoreError::MissingCastStatus);
    }

    #[test]
    fn test_duplicate_player_fails() {
        let state = state_with(&[("a", None), ("a", Some("Alan"))]);
        let err = score_all(&state, &RulePack::classic()).unwrap_err();
        assert_eq!(err, ScoreError::DuplicatePlayer { id: "a".to_string() });
    }

    #[test]
    fn test_totals_by_player() {
        let state = state_with(&[("a", Some("Alan")), ("b", None)]);
        let scores = score_all(&state, &RulePack::classic()).unwrap();
        let totals = totals_by_player(&scores);
        assert_eq!(totals.get("a"), Some(&10.0));
        assert_eq!(totals.get("b"), Some(&0.0));
    }

    #[test]
    fn test_fractional_totals_that_display_equal_tie() {
        let mut pack = RulePack::classic();
        pack.draft_winner = 0.1;
        pack.traitor_bonus = 0.2;
        pack.pred_first_out = 0.3;

        let mut state = state_with(&[]);
        if let Some(cast) = state.cast_status.as_mut() {
            cast.insert(
                "Cal".to_string(),
                CastStatus {
                    is_traitor: true,
                    ..Default::default()
                },
            );
        }
        state.players = vec![
            PlayerPrediction {
                id: "a".to_string(),
                draft_picks: vec![DraftPick {
                    member: "Alan".to_string(),
                    rank: 1,
                    role: Role::Faithful,
                }],
                pred_traitors: vec!["Cal".to_string()],
                ..Default::default()
            },
            PlayerPrediction {
                id: "b".to_string(),
                pred_first_out: Some("Bea".to_string()),
                ..Default::default()
            },
        ];

        let scores = score_all(&state, &pack).unwrap();
        // 0.1 + 0.2 and 0.3 differ as floats but both show as 0.3
        assert_ne!(scores[0].result.total, scores[1].result.total);
        let ids: Vec<_> = scores.iter().map(|s| s.player.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[1].rank, 1);
    }

    #[test]
    fn test_display_tenths() {
        assert_eq!(display_tenths(0.1 + 0.2), 3);
        assert_eq!(display_tenths(0.3), 3);
        assert_eq!(display_tenths(-0.04), 0);
        assert_eq!(display_tenths(-1.5), -15);
    }

    #[test]
    fn test_empty_population() {
        let state = state_with(&[]);
        assert!(score_all(&state, &RulePack::classic()).unwrap().is_empty());
    }
}
