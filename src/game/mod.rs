pub mod storage;
pub mod types;

pub use storage::{get_state_path, load_game_state};
pub use types::{
    non_empty, BonusGames, CastStatus, DraftPick, GameState, PlayerPrediction, Role,
    WeeklyPredictions, WeeklyResults, NO_MURDER,
};
