//! Arcade Cabinet - browser arcade games around a deterministic Pac-Man core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, motion, ghost AI, scheduling, orchestration)
//! - `highscores`: Score service contract and local leaderboard
//! - `settings`: Player preferences and match configuration
//! - `autopilot`: Scripted directional input source
//! - `error`: Error taxonomy shared by the match and the score boundary

pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{MatchError, ScoreError};
pub use highscores::{GameId, LocalScoreBoard, ScoreRecord, ScoreReporter, ScoreService};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const SIM_DT_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Edge length of one maze tile in pixels
    pub const TILE_SIZE: f32 = 16.0;
    /// Distance from a tile center within which a queued turn executes
    pub const TURN_TOLERANCE: f32 = 4.0;
    /// Largest per-tick step; keeps every tile center inside the turn window
    pub const MAX_STEP: f32 = 2.0 * TURN_TOLERANCE - 0.5;

    /// Player speed (pixels/tick)
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Ghost speed tiers (pixels/tick, before the level multiplier)
    pub const GHOST_NORMAL_SPEED: f32 = 1.9;
    pub const GHOST_SCATTER_SPEED: f32 = 1.7;
    pub const GHOST_FRIGHTENED_SPEED: f32 = 1.0;
    pub const GHOST_RETURNING_SPEED: f32 = 4.0;
    /// Minimum time between two direction decisions of one ghost
    pub const GHOST_TURN_COOLDOWN_MS: u64 = 50;

    /// Half extents of the overlap bodies
    pub const PLAYER_HALF_EXTENT: f32 = 6.0;
    pub const GHOST_HALF_EXTENT: f32 = 6.0;
    pub const DOT_HALF_EXTENT: f32 = 2.0;
    pub const PILL_HALF_EXTENT: f32 = 4.0;

    /// Scoring
    pub const DOT_POINTS: u64 = 10;
    pub const PILL_POINTS: u64 = 50;
    pub const GHOST_POINTS: u64 = 200;

    pub const STARTING_LIVES: u8 = 3;

    /// Ghost release rules
    pub const FLANKER_DOTS_EATEN_THRESHOLD: u32 = 30;
    pub const ELROY_DOTS_REMAINING: u32 = 20;
    pub const AMBUSH_LEAD_TILES: f32 = 4.0;
    pub const OPPORTUNIST_RADIUS_TILES: f32 = 8.0;
    pub const GHOST_EXIT_DELAY_MIN_MS: u64 = 1000;
    pub const GHOST_EXIT_DELAY_MAX_MS: u64 = 4000;

    /// Deferred transitions
    pub const DEATH_ANIMATION_MS: u64 = 1500;
    pub const LEVEL_TRANSITION_MS: u64 = 2000;
    pub const MESSAGE_MS: u64 = 1500;
}

/// Tile index containing a pixel coordinate (floor division)
#[inline]
pub fn tile_of(px: f32) -> i32 {
    (px / consts::TILE_SIZE).floor() as i32
}

/// Pixel coordinate of a tile's center along one axis
#[inline]
pub fn tile_center(tile: i32) -> f32 {
    (tile as f32 + 0.5) * consts::TILE_SIZE
}

/// Speed multiplier for a level: `1 + 0.08 * (level - 1)`
#[inline]
pub fn level_speed_multiplier(level: u32) -> f32 {
    1.0 + 0.08 * level.saturating_sub(1) as f32
}
