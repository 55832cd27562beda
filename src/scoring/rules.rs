use serde::{Deserialize, Serialize};

/// Id of the pack used when no pack is configured or an unknown id is asked for.
pub const DEFAULT_RULE_PACK_ID: &str = "classic";

/// Point table for every scoring event.
///
/// Penalties that are added as-is (`prophecy_reversed_penalty`,
/// `redemption_roulette_incorrect`) carry their negative sign.
/// `weekly_incorrect_base` is a positive amount that gets subtracted.
///
/// Example YAML:
/// ```yaml
/// rule_packs:
///   - id: house-rules
///     name: House Rules
///     draft_winner: 12
///     pred_winner: 10
///     # ...every other field
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulePack {
    pub id: String,
    pub name: String,

    pub draft_winner: f64,
    pub pred_winner: f64,
    pub pred_first_out: f64,
    pub traitor_bonus: f64,
    pub prophecy_reversed_penalty: f64,

    pub weekly_correct_base: f64,
    pub weekly_incorrect_base: f64,

    pub redemption_roulette_correct: f64,
    /// Paid instead of the normal tier when the running total is below zero
    pub redemption_roulette_correct_negative: f64,
    pub redemption_roulette_incorrect: f64,

    pub shield_gambit_correct: f64,
    pub shield_gambit_correct_negative: f64,

    pub traitor_trio_partial: f64,
    pub traitor_trio_perfect: f64,
    /// Display value for each member of a perfect trio; the lump sum is what counts
    pub traitor_trio_perfect_per_member: f64,

    pub double_or_nothing: f64,
    pub normal_multiplier: f64,
}

impl Default for RulePack {
    fn default() -> Self {
        Self::classic()
    }
}

impl RulePack {
    pub fn classic() -> Self {
        Self {
            id: DEFAULT_RULE_PACK_ID.to_string(),
            name: "Classic".to_string(),
            draft_winner: 10.0,
            pred_winner: 10.0,
            pred_first_out: 5.0,
            traitor_bonus: 3.0,
            prophecy_reversed_penalty: -2.0,
            weekly_correct_base: 1.0,
            weekly_incorrect_base: 0.5,
            redemption_roulette_correct: 8.0,
            redemption_roulette_correct_negative: 12.0,
            redemption_roulette_incorrect: -1.0,
            shield_gambit_correct: 5.0,
            shield_gambit_correct_negative: 8.0,
            traitor_trio_partial: 2.0,
            traitor_trio_perfect: 15.0,
            traitor_trio_perfect_per_member: 5.0,
            double_or_nothing: 2.0,
            normal_multiplier: 1.0,
        }
    }

    /// Bigger swings on the weekly games, smaller draft payouts
    pub fn high_stakes() -> Self {
        Self {
            id: "high-stakes".to_string(),
            name: "High Stakes".to_string(),
            draft_winner: 8.0,
            pred_winner: 8.0,
            pred_first_out: 4.0,
            traitor_bonus: 2.0,
            prophecy_reversed_penalty: -5.0,
            weekly_correct_base: 2.0,
            weekly_incorrect_base: 1.0,
            redemption_roulette_correct: 10.0,
            redemption_roulette_correct_negative: 16.0,
            redemption_roulette_incorrect: -2.0,
            shield_gambit_correct: 6.0,
            shield_gambit_correct_negative: 10.0,
            traitor_trio_partial: 3.0,
            traitor_trio_perfect: 21.0,
            traitor_trio_perfect_per_member: 7.0,
            double_or_nothing: 2.0,
            normal_multiplier: 1.0,
        }
    }

    pub fn builtins() -> Vec<RulePack> {
        vec![Self::classic(), Self::high_stakes()]
    }

    /// Multiplier for the weekly council given the player's double-or-nothing choice
    pub fn weekly_multiplier(&self, double_or_nothing: bool) -> f64 {
        if double_or_nothing {
            self.double_or_nothing
        } else {
            self.normal_multiplier
        }
    }
}

/// All rule packs known to a run: the built-ins plus any from config.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    packs: Vec<RulePack>,
    default_id: String,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl RuleRegistry {
    /// Build a registry. Custom packs sharing an id with a built-in replace it.
    /// An unknown `default_id` falls back to the classic pack.
    pub fn new(custom: Vec<RulePack>, default_id: Option<&str>) -> Self {
        let mut packs = RulePack::builtins();
        for pack in custom {
            match packs.iter_mut().find(|p| p.id == pack.id) {
                Some(existing) => *existing = pack,
                None => packs.push(pack),
            }
        }

        let default_id = match default_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if packs.iter().any(|p| p.id == id) => id.to_string(),
            Some(id) => {
                tracing::warn!(
                    rule_pack = id,
                    fallback = DEFAULT_RULE_PACK_ID,
                    "configured rule pack not found"
                );
                DEFAULT_RULE_PACK_ID.to_string()
            }
            None => DEFAULT_RULE_PACK_ID.to_string(),
        };

        Self { packs, default_id }
    }

    /// Look up a pack by id. Missing or unknown ids resolve to the default pack.
    pub fn get(&self, id: Option<&str>) -> &RulePack {
        let wanted = id.map(str::trim).filter(|id| !id.is_empty());
        if let Some(wanted) = wanted {
            if let Some(pack) = self.packs.iter().find(|p| p.id == wanted) {
                return pack;
            }
            tracing::warn!(
                rule_pack = wanted,
                fallback = %self.default_id,
                "unknown rule pack, using default"
            );
        }
        self.default_pack()
    }

    pub fn default_pack(&self) -> &RulePack {
        // default_id is always registered; packs is never empty
        self.packs
            .iter()
            .find(|p| p.id == self.default_id)
            .unwrap_or(&self.packs[0])
    }

    pub fn packs(&self) -> &[RulePack] {
        &self.packs
    }
}

/// Shorthand for a one-off lookup against the built-in packs
pub fn get_rule_pack(id: Option<&str>) -> RulePack {
    RuleRegistry::default().get(id).clone()
}
