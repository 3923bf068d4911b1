//! Error taxonomy
//!
//! Invalid player input is ignored silently and never becomes an error.
//! Boundary validation failures surface as [`ScoreError`]; anything that
//! leaves a match with partial state is a [`MatchError`] and aborts it.

use thiserror::Error;

/// Rejections produced by the score service boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("unknown game id `{0}` (expected one of pacman, runner, wallbreaker, pong-duel)")]
    UnknownGame(String),
    #[error("score {0} is outside the accepted range 0..=999999")]
    ScoreOutOfRange(i64),
    #[error("no scores recorded for `{0}`")]
    NotFound(String),
    #[error("score service unavailable: {0}")]
    Unavailable(String),
}

/// Failures fatal to the current match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid maze layout: {0}")]
    InvalidLayout(String),
    #[error("timer scheduling failed: {0}")]
    Timer(String),
    #[error("asset failed to load: {0}")]
    Asset(String),
}
