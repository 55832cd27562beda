use super::types::GameState;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Get the default game state file path (~/.config/traitors-score/state.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("state.json")
}

/// Load an outcome snapshot from a JSON file
///
/// Unlike the archive history, a missing state file is an error: there is
/// nothing meaningful to score without one.
pub fn load_game_state(path: &Path) -> Result<GameState> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open game state file at {}", path.display()))?;

    let state: GameState = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse game state in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        players = state.players.len(),
        "loaded game state"
    );

    Ok(state)
}
