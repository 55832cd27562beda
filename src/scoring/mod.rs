pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod rules;
pub mod validation;
pub mod week;

pub use engine::{
    calculate_score, Achievement, AchievementKind, RuleContribution, ScoreBreakdown, ScoreResult,
    ScoringRule,
};
pub use error::ScoreError;
pub use leaderboard::{display_tenths, score_all, totals_by_player, PlayerScore};
pub use rules::{get_rule_pack, RulePack, RuleRegistry, DEFAULT_RULE_PACK_ID};
pub use validation::{validate_game_state, validate_rule_pack, validate_rule_packs};
pub use week::{effective_week_id, population_uses_week_ids, WeekContext, WeekParticipation};
