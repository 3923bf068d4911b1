//! Match-wide game state
//!
//! One instance lives for the whole match. Score and lives persist across
//! levels; everything else is reset by [`GameState::start_level`].

use serde::{Deserialize, Serialize};

use super::ghost::GhostId;
use super::schedule::{Difficulty, ModeScheduler};
use crate::consts::FLANKER_DOTS_EATEN_THRESHOLD;
use crate::error::MatchError;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Death animation running; ghosts frozen
    Dying,
    /// Level cleared, waiting to start the next one
    LevelTransition,
    /// Out of lives
    GameOver,
    /// Stopped by a fatal error; nothing more happens
    Aborted,
}

impl GamePhase {
    /// Whether the match has ended for good
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Aborted)
    }
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    LevelChanged(u32),
    /// The given level was cleared
    LevelComplete(u32),
    PlayerDied { caught_by: GhostId },
    GhostEaten(GhostId),
    Message(String),
    GameOver { score: u64 },
    Aborted(MatchError),
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    pub dots_remaining: u32,
    /// Collectibles placed at level start
    pub total_dots: u32,
    /// Collectibles eaten this level
    pub dots_eaten: u32,
    /// Scatter/chase cycle with frightened pause
    pub schedule: ModeScheduler,
    /// Exit flags for the gated ghosts
    pub flanker_released: bool,
    pub opportunist_released: bool,
    pub phase: GamePhase,
    pub level_complete: bool,
    pub game_over: bool,
    /// Exit-confirmation modal is showing
    pub modal_open: bool,
    /// Transient on-screen message
    pub message: Option<String>,
}

impl GameState {
    pub fn new(lives: u8, total_dots: u32, now_ms: u64) -> Self {
        Self {
            score: 0,
            lives,
            level: 1,
            dots_remaining: total_dots,
            total_dots,
            dots_eaten: 0,
            schedule: ModeScheduler::new(1, now_ms),
            flanker_released: false,
            opportunist_released: false,
            phase: GamePhase::Playing,
            level_complete: false,
            game_over: false,
            modal_open: false,
            message: None,
        }
    }

    /// Reset level-scoped fields; score and lives carry over
    pub fn start_level(&mut self, level: u32, total_dots: u32, now_ms: u64) {
        self.level = level;
        self.total_dots = total_dots;
        self.dots_remaining = total_dots;
        self.dots_eaten = 0;
        self.schedule = ModeScheduler::new(level, now_ms);
        self.reset_releases();
        self.phase = GamePhase::Playing;
        self.level_complete = false;
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.level)
    }

    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Count one consumed collectible
    pub fn collect(&mut self) {
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
        self.dots_eaten += 1;
    }

    /// Take a life away; returns the lives left
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn reset_releases(&mut self) {
        self.flanker_released = false;
        self.opportunist_released = false;
    }

    /// Flanker leaves once more than the threshold has been eaten
    pub fn flanker_due(&self) -> bool {
        !self.flanker_released && self.dots_eaten > FLANKER_DOTS_EATEN_THRESHOLD
    }

    /// Opportunist leaves once fewer than a third of the dots remain
    pub fn opportunist_due(&self) -> bool {
        !self.opportunist_released && self.dots_remaining * 3 < self.total_dots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_award() {
        let mut state = GameState::new(3, 5, 0);
        state.collect();
        state.award(10);
        assert_eq!(state.dots_remaining, 4);
        assert_eq!(state.dots_eaten, 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_release_thresholds() {
        let mut state = GameState::new(3, 90, 0);
        for _ in 0..30 {
            state.collect();
        }
        assert!(!state.flanker_due());
        state.collect();
        assert!(state.flanker_due());
        state.flanker_released = true;
        assert!(!state.flanker_due());

        // 59 left of 90 is not below a third
        assert!(!state.opportunist_due());
        while state.dots_remaining >= 30 {
            state.collect();
        }
        assert!(state.opportunist_due());
    }

    #[test]
    fn test_start_level_keeps_score_and_lives() {
        let mut state = GameState::new(3, 10, 0);
        state.award(500);
        state.lose_life();
        state.flanker_released = true;
        state.collect();
        state.level_complete = true;

        state.start_level(2, 12, 5000);
        assert_eq!(state.score, 500);
        assert_eq!(state.lives, 2);
        assert_eq!(state.level, 2);
        assert_eq!(state.dots_remaining, 12);
        assert_eq!(state.dots_eaten, 0);
        assert!(!state.flanker_released);
        assert!(!state.level_complete);
        assert_eq!(state.schedule.deadline_ms(), Some(5000 + 6500));
    }

    #[test]
    fn test_lives_do_not_underflow() {
        let mut state = GameState::new(1, 0, 0);
        assert_eq!(state.lose_life(), 0);
        assert_eq!(state.lose_life(), 0);
    }
}
