use thiserror::Error;

/// Structural problems with an outcome snapshot.
///
/// A player who simply matched nothing scores zero; these are the cases where
/// a zero would be a lie, so the caller has to decide what to show instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("game state has no cast status mapping")]
    MissingCastStatus,

    #[error("player id `{id}` appears more than once in the game state")]
    DuplicatePlayer { id: String },
}
