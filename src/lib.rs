//! Scoring engine for a fantasy league played alongside The Traitors.
//!
//! Players draft cast members, call the winner and first out, hunt for
//! traitors and predict each week's round table. [`scoring::calculate_score`]
//! turns one player's picks plus the current [`game::GameState`] into a
//! total, an itemized breakdown and a list of achievements.

pub mod config;
pub mod game;
pub mod history;
pub mod output;
pub mod scoring;
