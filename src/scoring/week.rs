//! Decides whether a player's weekly prediction belongs to the week being scored.
//!
//! Predictions that carry a `weekId` are matched on it. Older predictions
//! that predate week ids are accepted for the current week only while nobody
//! has started labelling weeks, and only if none of their picks were already
//! eliminated in an earlier week.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::game::{
    non_empty, CastStatus, GameState, PlayerPrediction, WeeklyPredictions, WeeklyResults,
};

/// Outcome of week resolution for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekParticipation {
    /// Explicit week id matching the active week
    Current,
    /// No week id, accepted through the legacy rule
    LegacyCurrent,
    /// Nothing predicted for the week
    NoPrediction,
    /// No weekly result has been published
    NoResults,
    /// Explicit week id for some other week
    WeekMismatch,
    /// No week id, but other players have moved to explicit ids
    Unlabelled,
    /// No week id and at least one pick was eliminated in a previous week
    Stale,
}

impl WeekParticipation {
    pub fn participates(self) -> bool {
        matches!(self, Self::Current | Self::LegacyCurrent)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Current => "scored for the active week",
            Self::LegacyCurrent => "unlabelled prediction, scored for the active week",
            Self::NoPrediction => "no weekly prediction",
            Self::NoResults => "no weekly results yet",
            Self::WeekMismatch => "prediction is for a different week",
            Self::Unlabelled => "prediction has no week id",
            Self::Stale => "prediction names a contestant eliminated in an earlier week",
        }
    }
}

/// Active week id: the result's own id, else the separately tracked active week
pub fn effective_week_id<'a>(
    results: Option<&'a WeeklyResults>,
    active_week_id: Option<&'a str>,
) -> Option<&'a str> {
    results
        .and_then(|r| non_empty(&r.week_id))
        .or_else(|| active_week_id.map(str::trim).filter(|id| !id.is_empty()))
}

/// True once any player has saved a weekly prediction with an explicit week id
pub fn population_uses_week_ids(players: &[PlayerPrediction]) -> bool {
    players.iter().any(|p| {
        p.weekly_predictions
            .as_ref()
            .and_then(WeeklyPredictions::week_id)
            .is_some()
    })
}

/// Per-pass facts the resolver needs that don't depend on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekContext<'a> {
    pub week_id: Option<&'a str>,
    pub population_scoped: bool,
}

impl<'a> WeekContext<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            week_id: effective_week_id(
                state.weekly_results.as_ref(),
                state.active_week_id.as_deref(),
            ),
            population_scoped: population_uses_week_ids(&state.players),
        }
    }

    pub fn resolve(
        &self,
        prediction: Option<&WeeklyPredictions>,
        results: Option<&WeeklyResults>,
        cast: &BTreeMap<String, CastStatus>,
    ) -> WeekParticipation {
        let Some(prediction) = prediction.filter(|p| p.has_content()) else {
            return WeekParticipation::NoPrediction;
        };
        let Some(results) = results else {
            return WeekParticipation::NoResults;
        };

        if let Some(week_id) = prediction.week_id() {
            return if Some(week_id) == self.week_id {
                WeekParticipation::Current
            } else {
                WeekParticipation::WeekMismatch
            };
        }

        if self.population_scoped {
            return WeekParticipation::Unlabelled;
        }

        let stale = prediction
            .named_picks()
            .into_iter()
            .any(|name| eliminated_before_this_week(name, results, cast));
        if stale {
            WeekParticipation::Stale
        } else {
            WeekParticipation::LegacyCurrent
        }
    }
}

fn eliminated_before_this_week(
    name: &str,
    results: &WeeklyResults,
    cast: &BTreeMap<String, CastStatus>,
) -> bool {
    cast.get(name).is_some_and(|s| s.is_eliminated) && !results.removed_this_week(name)
}
