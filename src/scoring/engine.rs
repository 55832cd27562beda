use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::error::ScoreError;
use super::rules::RulePack;
use super::week::{WeekContext, WeekParticipation};
use crate::game::{
    non_empty, CastStatus, GameState, PlayerPrediction, WeeklyPredictions, WeeklyResults,
    NO_MURDER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    DraftWinner,
    PredWinner,
    PredFirstOut,
    TraitorIdentified,
    ProphecyReversed,
    WeeklyBanished,
    WeeklyMurdered,
    RedemptionRoulette,
    ShieldGambit,
    TraitorTrio,
}

impl ScoringRule {
    pub fn label(self) -> &'static str {
        match self {
            Self::DraftWinner => "Draft",
            Self::PredWinner => "Winner Prophecy",
            Self::PredFirstOut => "First Out Prophecy",
            Self::TraitorIdentified => "Traitor Hunt",
            Self::ProphecyReversed => "Reversed Prophecy",
            Self::WeeklyBanished => "Council: Banished",
            Self::WeeklyMurdered => "Council: Murdered",
            Self::RedemptionRoulette => "Redemption Roulette",
            Self::ShieldGambit => "Shield Gambit",
            Self::TraitorTrio => "Traitor Trio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleContribution {
    pub rule: ScoringRule,
    pub detail: String, // e.g. "predicted Cal, banished Cal (x2)"
    pub points: f64,
    pub before: f64, // Running total before this rule fired
    pub after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub rule_pack: String,
    pub weekly_status: WeekParticipation,
    pub weekly_multiplier: f64,
    pub contributions: Vec<RuleContribution>,
}

impl ScoreBreakdown {
    pub fn fired(&self, rule: ScoringRule) -> bool {
        self.contributions.iter().any(|c| c.rule == rule)
    }

    /// Sum of points contributed by one rule
    pub fn points_for(&self, rule: ScoringRule) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.rule == rule)
            .map(|c| c.points)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    DraftWinner,
    ProphecyWinner,
    ProphecyFirstOut,
    TraitorFound,
    BanishmentCalled,
    MurderCalled,
    RedemptionRoulette,
    ShieldGambit,
    TraitorTrio,
}

impl AchievementKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::DraftWinner => "🏆",
            Self::ProphecyWinner => "👑",
            Self::ProphecyFirstOut => "🚪",
            Self::TraitorFound => "🗡️",
            Self::BanishmentCalled => "⚖️",
            Self::MurderCalled => "🔪",
            Self::RedemptionRoulette => "🎰",
            Self::ShieldGambit => "🛡️",
            Self::TraitorTrio => "🎭",
        }
    }
}

/// Display record for one positive scoring event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub member: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    pub points: f64,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    pub achievements: Vec<Achievement>,
}

/// Score one player against an outcome snapshot.
///
/// Fails only when the snapshot itself is unusable; a player whose
/// predictions match nothing gets a zero total.
pub fn calculate_score(
    state: &GameState,
    pack: &RulePack,
    player: &PlayerPrediction,
) -> Result<ScoreResult, ScoreError> {
    let cast = state
        .cast_status
        .as_ref()
        .ok_or(ScoreError::MissingCastStatus)?;
    let week = WeekContext::new(state);
    Ok(score_player(
        cast,
        state.weekly_results.as_ref(),
        &week,
        pack,
        player,
    ))
}

/// Running total plus everything recorded on the way.
struct Tally {
    total: f64,
    contributions: Vec<RuleContribution>,
    achievements: Vec<Achievement>,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: 0.0,
            contributions: Vec::new(),
            achievements: Vec::new(),
        }
    }

    fn add(&mut self, rule: ScoringRule, points: f64, detail: String) {
        let before = self.total;
        self.total += points;
        self.contributions.push(RuleContribution {
            rule,
            detail,
            points,
            before,
            after: self.total,
        });
    }

    fn achieve(&mut self, member: &str, kind: AchievementKind, points: f64) {
        self.achievements.push(Achievement {
            member: member.to_string(),
            kind,
            points,
            icon: kind.icon(),
        });
    }
}

/// Rule pipeline for one player. Rule order matters: the negative-tier
/// bonus payouts read the running total left by the earlier rules.
pub(crate) fn score_player(
    cast: &BTreeMap<String, CastStatus>,
    results: Option<&WeeklyResults>,
    week: &WeekContext<'_>,
    pack: &RulePack,
    player: &PlayerPrediction,
) -> ScoreResult {
    let status = |name: &str| cast.get(name);
    let mut tally = Tally::new();

    // 1. Draft picks that turned out to be the winner
    for pick in &player.draft_picks {
        let member = pick.member.trim();
        if status(member).is_some_and(|s| s.is_winner) {
            tally.add(
                ScoringRule::DraftWinner,
                pack.draft_winner,
                format!("drafted {} (rank {})", member, pick.rank),
            );
            tally.achieve(member, AchievementKind::DraftWinner, pack.draft_winner);
        }
    }

    let pred_winner = non_empty(&player.pred_winner);

    // 2. Winner prophecy
    if let Some(name) = pred_winner {
        if status(name).is_some_and(|s| s.is_winner) {
            tally.add(
                ScoringRule::PredWinner,
                pack.pred_winner,
                format!("called {} as winner", name),
            );
            tally.achieve(name, AchievementKind::ProphecyWinner, pack.pred_winner);
        }
    }

    // 3. First-out prophecy
    if let Some(name) = non_empty(&player.pred_first_out) {
        if status(name).is_some_and(|s| s.is_first_out) {
            tally.add(
                ScoringRule::PredFirstOut,
                pack.pred_first_out,
                format!("called {} as first out", name),
            );
            tally.achieve(name, AchievementKind::ProphecyFirstOut, pack.pred_first_out);
        }
    }

    // 4. Traitor hunt, once per distinct name
    for name in distinct_names(&player.pred_traitors) {
        if status(name).is_some_and(|s| s.is_traitor) {
            tally.add(
                ScoringRule::TraitorIdentified,
                pack.traitor_bonus,
                format!("identified {} as a traitor", name),
            );
            tally.achieve(name, AchievementKind::TraitorFound, pack.traitor_bonus);
        }
    }

    // 5. Winner pick went out first
    if let Some(name) = pred_winner {
        if status(name).is_some_and(|s| s.is_first_out) {
            tally.add(
                ScoringRule::ProphecyReversed,
                pack.prophecy_reversed_penalty,
                format!("winner pick {} was first out", name),
            );
        }
    }

    let weekly = player.weekly_predictions.as_ref();
    let weekly_status = week.resolve(weekly, results, cast);
    let double_or_nothing = weekly
        .and_then(|w| w.bonus_games.as_ref())
        .is_some_and(|b| b.double_or_nothing);
    let multiplier = pack.weekly_multiplier(double_or_nothing);

    match (weekly, results) {
        (Some(prediction), Some(results)) if weekly_status.participates() => {
            score_weekly(&mut tally, pack, prediction, results, multiplier);
            score_bonus_games(&mut tally, pack, prediction, results);
        }
        _ => {
            tracing::debug!(
                player = %player.id,
                status = ?weekly_status,
                "weekly council skipped"
            );
        }
    }

    ScoreResult {
        total: tally.total,
        breakdown: ScoreBreakdown {
            rule_pack: pack.id.clone(),
            weekly_status,
            weekly_multiplier: multiplier,
            contributions: tally.contributions,
        },
        achievements: tally.achievements,
    }
}

// 6. Weekly council
fn score_weekly(
    tally: &mut Tally,
    pack: &RulePack,
    prediction: &WeeklyPredictions,
    results: &WeeklyResults,
    multiplier: f64,
) {
    if let (Some(predicted), Some(actual)) = (prediction.banished(), results.banished()) {
        score_council_call(
            tally,
            pack,
            ScoringRule::WeeklyBanished,
            AchievementKind::BanishmentCalled,
            predicted,
            actual,
            multiplier,
        );
    }

    if let (Some(predicted), Some(actual)) = (prediction.murdered(), results.murdered()) {
        if actual != NO_MURDER {
            score_council_call(
                tally,
                pack,
                ScoringRule::WeeklyMurdered,
                AchievementKind::MurderCalled,
                predicted,
                actual,
                multiplier,
            );
        }
    }
}

fn score_council_call(
    tally: &mut Tally,
    pack: &RulePack,
    rule: ScoringRule,
    kind: AchievementKind,
    predicted: &str,
    actual: &str,
    multiplier: f64,
) {
    let suffix = if multiplier != pack.normal_multiplier {
        format!(" (x{})", multiplier)
    } else {
        String::new()
    };

    if predicted == actual {
        let points = pack.weekly_correct_base * multiplier;
        tally.add(rule, points, format!("called {}{}", actual, suffix));
        tally.achieve(actual, kind, points);
    } else {
        tally.add(
            rule,
            -(pack.weekly_incorrect_base * multiplier),
            format!("predicted {}, was {}{}", predicted, actual, suffix),
        );
    }
}

// 7-9. Bonus games
fn score_bonus_games(
    tally: &mut Tally,
    pack: &RulePack,
    prediction: &WeeklyPredictions,
    results: &WeeklyResults,
) {
    let (Some(guess), Some(actual)) = (
        prediction.bonus_games.as_ref(),
        results.bonus_games.as_ref(),
    ) else {
        return;
    };

    if let (Some(predicted), Some(answer)) = (
        non_empty(&guess.redemption_roulette),
        non_empty(&actual.redemption_roulette),
    ) {
        if predicted == answer {
            let (points, tier) = negative_tier(
                tally.total,
                pack.redemption_roulette_correct,
                pack.redemption_roulette_correct_negative,
            );
            tally.add(
                ScoringRule::RedemptionRoulette,
                points,
                format!("called {}{}", answer, tier),
            );
            tally.achieve(answer, AchievementKind::RedemptionRoulette, points);
        } else {
            tally.add(
                ScoringRule::RedemptionRoulette,
                pack.redemption_roulette_incorrect,
                format!("predicted {}, was {}", predicted, answer),
            );
        }
    }

    if let (Some(predicted), Some(answer)) = (
        non_empty(&guess.shield_gambit),
        non_empty(&actual.shield_gambit),
    ) {
        if predicted == answer {
            let (points, tier) = negative_tier(
                tally.total,
                pack.shield_gambit_correct,
                pack.shield_gambit_correct_negative,
            );
            tally.add(
                ScoringRule::ShieldGambit,
                points,
                format!("called {}{}", answer, tier),
            );
            tally.achieve(answer, AchievementKind::ShieldGambit, points);
        } else {
            tally.add(
                ScoringRule::ShieldGambit,
                0.0,
                format!("predicted {}, was {}", predicted, answer),
            );
        }
    }

    let predicted: Vec<&str> = distinct_names(&guess.traitor_trio).into_iter().take(3).collect();
    let answer = distinct_names(&actual.traitor_trio);
    if predicted.is_empty() || answer.is_empty() {
        return;
    }

    let matched: Vec<&str> = predicted
        .iter()
        .copied()
        .filter(|name| answer.contains(name))
        .collect();

    match matched.len() {
        0 => tally.add(ScoringRule::TraitorTrio, 0.0, "no traitors matched".to_string()),
        3 => {
            tally.add(
                ScoringRule::TraitorTrio,
                pack.traitor_trio_perfect,
                format!("perfect trio: {}", matched.join(", ")),
            );
            for name in matched {
                tally.achieve(
                    name,
                    AchievementKind::TraitorTrio,
                    pack.traitor_trio_perfect_per_member,
                );
            }
        }
        n => {
            tally.add(
                ScoringRule::TraitorTrio,
                n as f64 * pack.traitor_trio_partial,
                format!("{} of 3 matched: {}", n, matched.join(", ")),
            );
            for name in matched {
                tally.achieve(name, AchievementKind::TraitorTrio, pack.traitor_trio_partial);
            }
        }
    }
}

/// Pick the payout tier based on the running total at this point of the pass
fn negative_tier(running_total: f64, normal: f64, negative: f64) -> (f64, &'static str) {
    if running_total < 0.0 {
        (negative, " (comeback payout)")
    } else {
        (normal, "")
    }
}

/// Trimmed, non-empty names in first-seen order, without repeats
fn distinct_names(names: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty() && seen.insert(*n))
        .collect()
}
