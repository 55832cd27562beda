use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel a weekly result uses when nobody was murdered that episode.
pub const NO_MURDER: &str = "No Murder";

/// Ground truth for a single cast member, keyed by name in `GameState::cast_status`.
///
/// `is_winner` and `is_first_out` are kept mutually exclusive by whoever edits
/// the state; the scorer only reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastStatus {
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub is_first_out: bool,
    #[serde(default)]
    pub is_traitor: bool,
    #[serde(default)]
    pub is_eliminated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Faithful,
    Traitor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub member: String,
    pub rank: u32,
    pub role: Role,
}

/// Bonus-game guesses, shared by predictions and weekly results.
///
/// `double_or_nothing` only means something on the prediction side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusGames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redemption_roulette: Option<String>,
    #[serde(default)]
    pub double_or_nothing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield_gambit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traitor_trio: Vec<String>,
}

impl BonusGames {
    /// True when any bonus-game field carries a guess
    pub fn has_content(&self) -> bool {
        non_empty(&self.redemption_roulette).is_some()
            || non_empty(&self.shield_gambit).is_some()
            || self.double_or_nothing
            || self.traitor_trio.iter().any(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPredictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_banished: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_murdered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_games: Option<BonusGames>,
}

impl WeeklyPredictions {
    pub fn week_id(&self) -> Option<&str> {
        non_empty(&self.week_id)
    }

    pub fn banished(&self) -> Option<&str> {
        non_empty(&self.next_banished)
    }

    pub fn murdered(&self) -> Option<&str> {
        non_empty(&self.next_murdered)
    }

    /// True when the player actually predicted something for a week
    pub fn has_content(&self) -> bool {
        self.banished().is_some()
            || self.murdered().is_some()
            || self.bonus_games.as_ref().is_some_and(BonusGames::has_content)
    }

    /// Every cast name this prediction commits to, in field order
    pub fn named_picks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        names.extend(self.banished());
        names.extend(self.murdered());
        if let Some(bonus) = &self.bonus_games {
            names.extend(non_empty(&bonus.redemption_roulette));
            names.extend(non_empty(&bonus.shield_gambit));
            names.extend(
                bonus
                    .traitor_trio
                    .iter()
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty()),
            );
        }
        names
    }
}

/// Authoritative outcome of the week currently being scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_banished: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_murdered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_games: Option<BonusGames>,
}

impl WeeklyResults {
    pub fn banished(&self) -> Option<&str> {
        non_empty(&self.next_banished)
    }

    pub fn murdered(&self) -> Option<&str> {
        non_empty(&self.next_murdered)
    }

    /// True when `name` was removed from the game by this week's result
    pub fn removed_this_week(&self, name: &str) -> bool {
        self.banished() == Some(name) || self.murdered() == Some(name)
    }
}

/// One player's draft, prophecies and current weekly guesses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPrediction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub draft_picks: Vec<DraftPick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pred_winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pred_first_out: Option<String>,
    #[serde(default)]
    pub pred_traitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_predictions: Option<WeeklyPredictions>,
}

impl PlayerPrediction {
    /// Name to show on the leaderboard, falling back to the id
    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(&self.id)
    }
}

/// Outcome snapshot for one scoring pass.
///
/// `cast_status` is optional only so a snapshot missing it can be loaded and
/// rejected explicitly by the scorer instead of failing deep inside serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_status: Option<BTreeMap<String, CastStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_results: Option<WeeklyResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_week_id: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerPrediction>,
}

impl GameState {
    pub fn player(&self, id_or_name: &str) -> Option<&PlayerPrediction> {
        let wanted = id_or_name.trim();
        self.players
            .iter()
            .find(|p| p.id == wanted)
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.display_name().eq_ignore_ascii_case(wanted))
            })
    }
}

/// Trimmed contents of an optional name, or None when blank
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_state_camel_case() {
        let json = r#"{
            "castStatus": {
                "Alan": { "isWinner": true, "isTraitor": true },
                "Bea": { "isFirstOut": true, "isEliminated": true, "portraitUrl": "bea.png" }
            },
            "weeklyResults": {
                "weekId": "week-3",
                "nextBanished": "Cal",
                "nextMurdered": "No Murder",
                "bonusGames": { "traitorTrio": ["Alan", "Dee", "Eve"] }
            },
            "activeWeekId": "week-3",
            "players": [{
                "id": "p1",
                "name": "Sam",
                "draftPicks": [{ "member": "Alan", "rank": 1, "role": "Traitor" }],
                "predWinner": "Alan",
                "predTraitors": ["Alan"],
                "weeklyPredictions": {
                    "weekId": "week-3",
                    "nextBanished": "Cal",
                    "bonusGames": { "doubleOrNothing": true }
                }
            }]
        }"#;

        let state: GameState = serde_json::from_str(json).unwrap();
        let cast = state.cast_status.as_ref().unwrap();
        assert!(cast["Alan"].is_winner);
        assert!(cast["Bea"].is_eliminated);
        assert_eq!(cast["Bea"].portrait_url.as_deref(), Some("bea.png"));

        let results = state.weekly_results.as_ref().unwrap();
        assert_eq!(results.murdered(), Some(NO_MURDER));
        assert_eq!(results.bonus_games.as_ref().unwrap().traitor_trio.len(), 3);

        let player = &state.players[0];
        assert_eq!(player.draft_picks[0].role, Role::Traitor);
        let weekly = player.weekly_predictions.as_ref().unwrap();
        assert_eq!(weekly.week_id(), Some("week-3"));
        assert!(weekly.bonus_games.as_ref().unwrap().double_or_nothing);
    }

    #[test]
    fn test_missing_cast_status_parses_as_none() {
        let state: GameState = serde_json::from_str(r#"{ "players": [] }"#).unwrap();
        assert!(state.cast_status.is_none());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = r#"{ "member": "Alan", "rank": 1, "role": "Seer" }"#;
        assert!(serde_json::from_str::<DraftPick>(json).is_err());
    }

    #[test]
    fn test_blank_fields_are_not_content() {
        let weekly = WeeklyPredictions {
            week_id: Some("  ".to_string()),
            next_banished: Some("".to_string()),
            next_murdered: None,
            bonus_games: Some(BonusGames {
                traitor_trio: vec![" ".to_string()],
                ..Default::default()
            }),
        };
        assert!(weekly.week_id().is_none());
        assert!(!weekly.has_content());
        assert!(weekly.named_picks().is_empty());
    }

    #[test]
    fn test_named_picks_collects_every_field() {
        let weekly = WeeklyPredictions {
            week_id: None,
            next_banished: Some("Cal".to_string()),
            next_murdered: Some(" Dee ".to_string()),
            bonus_games: Some(BonusGames {
                redemption_roulette: Some("Eve".to_string()),
                double_or_nothing: false,
                shield_gambit: Some("Fay".to_string()),
                traitor_trio: vec!["Alan".to_string(), "Bea".to_string()],
            }),
        };
        assert_eq!(
            weekly.named_picks(),
            vec!["Cal", "Dee", "Eve", "Fay", "Alan", "Bea"]
        );
    }

    #[test]
    fn test_player_lookup_by_id_then_name() {
        let state = GameState {
            players: vec![
                PlayerPrediction {
                    id: "p1".to_string(),
                    name: Some("Sam".to_string()),
                    ..Default::default()
                },
                PlayerPrediction {
                    id: "p2".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(state.player("p2").unwrap().id, "p2");
        assert_eq!(state.player("sam").unwrap().id, "p1");
        assert!(state.player("nobody").is_none());
        assert_eq!(state.players[1].display_name(), "p2");
    }
}
