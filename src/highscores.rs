//! High score service contract and local leaderboard
//!
//! Mirrors the cabinet's REST scores API: submissions are validated at the
//! boundary, records are kept per game, and a match reports its final score
//! at most once. Persisted to LocalStorage on the web.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Default page size for top-score queries
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Highest score the service accepts
pub const MAX_SCORE: i64 = 999_999;

/// Name stored when a submission carries none
pub const ANONYMOUS: &str = "Anonymous";

/// Games known to the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    Pacman,
    Runner,
    Wallbreaker,
    PongDuel,
}

impl GameId {
    pub const ALL: [GameId; 4] = [
        GameId::Pacman,
        GameId::Runner,
        GameId::Wallbreaker,
        GameId::PongDuel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Pacman => "pacman",
            GameId::Runner => "runner",
            GameId::Wallbreaker => "wallbreaker",
            GameId::PongDuel => "pong-duel",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ScoreError::UnknownGame(s.to_string()))
    }
}

/// Raw submission as it arrives at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub game_id: String,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidScore {
    pub game_id: GameId,
    pub score: u32,
    pub player_name: String,
}

impl ScoreSubmission {
    pub fn new(game_id: GameId, score: u64, player_name: Option<String>) -> Self {
        Self {
            game_id: game_id.as_str().to_string(),
            score: i64::try_from(score).unwrap_or(i64::MAX),
            player_name,
        }
    }

    /// Check game id and score range
    pub fn validate(&self) -> Result<ValidScore, ScoreError> {
        let game_id = self.game_id.parse::<GameId>()?;
        if !(0..=MAX_SCORE).contains(&self.score) {
            return Err(ScoreError::ScoreOutOfRange(self.score));
        }
        let player_name = self
            .player_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();
        Ok(ValidScore {
            game_id,
            score: self.score as u32,
            player_name,
        })
    }
}

/// A stored score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: u64,
    pub game_id: GameId,
    pub player_name: String,
    pub score: u32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Aggregates for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_plays: u32,
    pub best_score: u32,
    pub avg_score: f64,
    pub worst_score: u32,
}

/// Operations of the remote scores API
pub trait ScoreService {
    /// Validate and store one score
    fn add_score(&mut self, submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError>;

    /// Best scores for one game, highest first
    fn top_scores(&self, game: GameId, limit: Option<usize>) -> Vec<ScoreRecord>;

    /// Best scores over every game, highest first
    fn top_across_games(&self, limit: Option<usize>) -> Vec<ScoreRecord>;

    fn stats(&self, game: GameId) -> Result<GameStats, ScoreError>;

    /// Delete one game's scores, or all of them. Returns the number removed.
    fn reset(&mut self, game: Option<GameId>) -> usize;
}

/// In-memory implementation of [`ScoreService`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalScoreBoard {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

/// Highest score first; older records win ties
fn rank(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.timestamp.total_cmp(&b.timestamp))
            .then(a.id.cmp(&b.id))
    });
}

impl LocalScoreBoard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arcade_cabinet_scores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Store a validated score with an explicit timestamp
    pub fn insert(&mut self, score: ValidScore, timestamp: f64) -> ScoreRecord {
        self.next_id += 1;
        let record = ScoreRecord {
            id: self.next_id,
            game_id: score.game_id,
            player_name: score.player_name,
            score: score.score,
            timestamp,
        };
        self.records.push(record.clone());
        record
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<LocalScoreBoard>(&json) {
                    log::info!("Loaded {} scores", board.records.len());
                    return board;
                }
            }
        }

        log::info!("No scores found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scores saved ({} records)", self.records.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl ScoreService for LocalScoreBoard {
    fn add_score(&mut self, submission: &ScoreSubmission) -> Result<ScoreRecord, ScoreError> {
        let score = submission.validate().inspect_err(|err| {
            log::warn!("Rejected score submission: {err}");
        })?;
        let record = self.insert(score, now_ms());
        log::info!(
            "Recorded {} for {} ({})",
            record.score,
            record.game_id,
            record.player_name
        );
        Ok(record)
    }

    fn top_scores(&self, game: GameId, limit: Option<usize>) -> Vec<ScoreRecord> {
        let mut records: Vec<ScoreRecord> = self
            .records
            .iter()
            .filter(|r| r.game_id == game)
            .cloned()
            .collect();
        rank(&mut records);
        records.truncate(limit.unwrap_or(DEFAULT_TOP_LIMIT));
        records
    }

    fn top_across_games(&self, limit: Option<usize>) -> Vec<ScoreRecord> {
        let mut records = self.records.clone();
        rank(&mut records);
        records.truncate(limit.unwrap_or(DEFAULT_TOP_LIMIT));
        records
    }

    fn stats(&self, game: GameId) -> Result<GameStats, ScoreError> {
        let scores: Vec<u32> = self
            .records
            .iter()
            .filter(|r| r.game_id == game)
            .map(|r| r.score)
            .collect();
        let (Some(&best), Some(&worst)) = (scores.iter().max(), scores.iter().min()) else {
            return Err(ScoreError::NotFound(game.to_string()));
        };
        let total: u64 = scores.iter().map(|&s| s as u64).sum();
        Ok(GameStats {
            total_plays: scores.len() as u32,
            best_score: best,
            avg_score: total as f64 / scores.len() as f64,
            worst_score: worst,
        })
    }

    fn reset(&mut self, game: Option<GameId>) -> usize {
        let before = self.records.len();
        match game {
            Some(game) => self.records.retain(|r| r.game_id != game),
            None => self.records.clear(),
        }
        let removed = before - self.records.len();
        log::info!(
            "Reset {} scores ({removed} removed)",
            game.map_or("all", |g| g.as_str())
        );
        removed
    }
}

/// Submits a match's final score exactly once, and only when positive
#[derive(Debug, Clone)]
pub struct ScoreReporter {
    game: GameId,
    player_name: Option<String>,
    submitted: bool,
}

impl ScoreReporter {
    pub fn new(game: GameId, player_name: Option<String>) -> Self {
        Self {
            game,
            player_name,
            submitted: false,
        }
    }

    pub fn has_submitted(&self) -> bool {
        self.submitted
    }

    /// The submission to send for this final score, at most once per match
    pub fn submission(&mut self, final_score: u64) -> Option<ScoreSubmission> {
        if self.submitted || final_score == 0 {
            return None;
        }
        self.submitted = true;
        Some(ScoreSubmission::new(
            self.game,
            final_score,
            self.player_name.clone(),
        ))
    }

    /// Submit to a service; `None` when nothing was due
    pub fn report(
        &mut self,
        service: &mut impl ScoreService,
        final_score: u64,
    ) -> Option<Result<ScoreRecord, ScoreError>> {
        let submission = self.submission(final_score)?;
        Some(service.add_score(&submission))
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
