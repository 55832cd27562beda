use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Archived leaderboard totals, one entry per archive run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub snapshots: Vec<ArchivedSnapshot>,
}

/// Totals only; breakdowns are recomputed from the game state, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivedSnapshot {
    pub label: String,
    pub taken_at: DateTime<Utc>,
    pub totals: BTreeMap<String, f64>,
}

impl ArchivedSnapshot {
    pub fn new(label: impl Into<String>, totals: BTreeMap<String, f64>) -> Self {
        Self {
            label: label.into(),
            taken_at: Utc::now(),
            totals,
        }
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    /// Create a new empty history with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            snapshots: Vec::new(),
        }
    }

    pub fn archive(&mut self, snapshot: ArchivedSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Most recently taken snapshot, regardless of insertion order
    pub fn latest(&self) -> Option<&ArchivedSnapshot> {
        self.snapshots.iter().max_by_key(|s| s.taken_at)
    }

    /// Change since the latest snapshot for each current total.
    /// Players missing from the snapshot get `None`.
    pub fn movement(&self, current: &BTreeMap<String, f64>) -> BTreeMap<String, Option<f64>> {
        let previous = self.latest().map(|s| &s.totals);
        current
            .iter()
            .map(|(id, total)| {
                let delta = previous
                    .and_then(|totals| totals.get(id))
                    .map(|before| total - before);
                (id.clone(), delta)
            })
            .collect()
    }
}
