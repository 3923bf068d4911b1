//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ghosts by identity, collectibles by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod ghost;
pub mod maze;
pub mod motion;
pub mod player;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Body, BodyId, Contact, Outcome, OverlapBindings, dispatch};
pub use ghost::{Ghost, GhostContext, GhostId, GhostMode, chase_target};
pub use maze::{Collectible, CollectibleKind, Maze, STANDARD_LAYOUT, TileKind};
pub use motion::{Direction, Motion};
pub use player::Player;
pub use schedule::{Difficulty, GlobalMode, ModeScheduler, mode_steps};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Game, Hud, TickInput};
pub use timers::{Task, TimerId, Timers};
