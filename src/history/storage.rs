use super::types::HistoryState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default history file path (~/.config/traitors-score/history.json)
pub fn get_history_path() -> PathBuf {
    crate::config::get_config_dir().join("history.json")
}

/// Load archive history from a JSON file
///
/// If the file doesn't exist, returns a new empty history.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    if !path.exists() {
        return Ok(HistoryState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open history file at {}", path.display()))?;

    let history: HistoryState =
        serde_json::from_reader(file).context("Failed to load archive history")?;

    if history.version != 1 {
        anyhow::bail!("Unsupported history version: {}", history.version);
    }

    Ok(history)
}

/// Save archive history to a JSON file atomically
///
/// Uses atomic-write-file to ensure the file is never left in a corrupted state.
/// Creates the parent directory if it doesn't exist.
pub fn save_history(path: &Path, history: &HistoryState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, history)
        .context("Failed to serialize archive history")?;

    file.commit().context("Failed to save archive history")?;

    Ok(())
}
