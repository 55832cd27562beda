use std::collections::HashSet;

use super::rules::RulePack;
use crate::game::GameState;

/// Validate a rule pack from config at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rule_pack(pack: &RulePack) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let prefix = format!("rule_packs[{}]", pack.id);

    if pack.id.trim().is_empty() {
        errors.push("rule_packs: id must not be empty".to_string());
    }

    let rewards = [
        ("draft_winner", pack.draft_winner),
        ("pred_winner", pack.pred_winner),
        ("pred_first_out", pack.pred_first_out),
        ("traitor_bonus", pack.traitor_bonus),
        ("weekly_correct_base", pack.weekly_correct_base),
        ("weekly_incorrect_base", pack.weekly_incorrect_base),
        ("redemption_roulette_correct", pack.redemption_roulette_correct),
        (
            "redemption_roulette_correct_negative",
            pack.redemption_roulette_correct_negative,
        ),
        ("shield_gambit_correct", pack.shield_gambit_correct),
        (
            "shield_gambit_correct_negative",
            pack.shield_gambit_correct_negative,
        ),
        ("traitor_trio_partial", pack.traitor_trio_partial),
        ("traitor_trio_perfect", pack.traitor_trio_perfect),
        (
            "traitor_trio_perfect_per_member",
            pack.traitor_trio_perfect_per_member,
        ),
    ];
    for (field, value) in rewards {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{}.{}: must be non-negative", prefix, field));
        }
    }

    let penalties = [
        ("prophecy_reversed_penalty", pack.prophecy_reversed_penalty),
        (
            "redemption_roulette_incorrect",
            pack.redemption_roulette_incorrect,
        ),
    ];
    for (field, value) in penalties {
        if !value.is_finite() || value > 0.0 {
            errors.push(format!("{}.{}: must be zero or negative", prefix, field));
        }
    }

    let multipliers = [
        ("double_or_nothing", pack.double_or_nothing),
        ("normal_multiplier", pack.normal_multiplier),
    ];
    for (field, value) in multipliers {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{}.{}: must be positive", prefix, field));
        }
    }

    // The per-member figures are only shown as achievements; the lump sum is
    // what gets added, so the two must agree or the display lies
    if pack.traitor_trio_perfect_per_member * 3.0 != pack.traitor_trio_perfect {
        errors.push(format!(
            "{}.traitor_trio_perfect: must equal 3 x per_member ({} != 3 x {})",
            prefix, pack.traitor_trio_perfect, pack.traitor_trio_perfect_per_member
        ));
    }

    // Trailing players are paid at least the normal tier
    let catch_up = [
        (
            "redemption_roulette_correct_negative",
            pack.redemption_roulette_correct_negative,
            "redemption_roulette_correct",
            pack.redemption_roulette_correct,
        ),
        (
            "shield_gambit_correct_negative",
            pack.shield_gambit_correct_negative,
            "shield_gambit_correct",
            pack.shield_gambit_correct,
        ),
    ];
    for (field, negative, normal_field, normal) in catch_up {
        if negative < normal {
            errors.push(format!(
                "{}.{}: must be at least {} ({} < {})",
                prefix, field, normal_field, negative, normal
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate every custom pack, including duplicate ids across the list
pub fn validate_rule_packs(packs: &[RulePack]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for pack in packs {
        if !seen.insert(pack.id.as_str()) {
            errors.push(format!("rule_packs: duplicate id '{}'", pack.id));
        }
        if let Err(pack_errors) = validate_rule_pack(pack) {
            errors.extend(pack_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a game state for problems the scorer would otherwise paper over.
///
/// A missing cast mapping makes scoring fail outright; the other findings
/// (winner also flagged first out, duplicate player ids, predictions naming
/// people not in the cast) are reported so an admin can fix the data.
pub fn validate_game_state(state: &GameState) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let Some(cast) = state.cast_status.as_ref() else {
        return Err(vec!["castStatus: missing".to_string()]);
    };

    for (name, status) in cast {
        if status.is_winner && status.is_first_out {
            errors.push(format!(
                "castStatus.{}: cannot be both winner and first out",
                name
            ));
        }
    }

    let mut seen = HashSet::new();
    for (i, player) in state.players.iter().enumerate() {
        if player.id.trim().is_empty() {
            errors.push(format!("players[{}].id: must not be empty", i));
        } else if !seen.insert(player.id.as_str()) {
            errors.push(format!("players[{}].id: duplicate id '{}'", i, player.id));
        }

        let mut named: Vec<&str> = Vec::new();
        named.extend(player.draft_picks.iter().map(|p| p.member.trim()));
        named.extend(player.pred_winner.as_deref().map(str::trim));
        named.extend(player.pred_first_out.as_deref().map(str::trim));
        named.extend(player.pred_traitors.iter().map(|n| n.trim()));
        if let Some(weekly) = &player.weekly_predictions {
            named.extend(weekly.named_picks());
        }

        for name in named {
            if !name.is_empty() && name != crate::game::NO_MURDER && !cast.contains_key(name) {
                errors.push(format!(
                    "players[{}] ({}): unknown cast member '{}'",
                    i, player.id, name
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
