//! Ghost agents
//!
//! One state machine shared by all four ghosts, parameterized by a
//! per-identity config and targeting strategy.
//!
//! ```text
//! AtHome -> ExitingHome -> Scatter <-> Chase
//!                 |           \       /
//!                 +--------> Frightened -> Returning -> AtHome
//! any (except Returning) -> Stopped -> exit_home / global orders
//! ```
//!
//! A ghost frightened on its way out keeps following the exit path and
//! only starts wandering once it reaches the doorway.

use glam::{IVec2, Vec2};
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::BodyId;
use super::maze::Maze;
use super::motion::{Direction, Motion};
use super::schedule::GlobalMode;
use crate::consts::*;
use crate::{level_speed_multiplier, tile_of};

/// The four ghost identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostId {
    /// Leader: targets the player's tile
    Blinky,
    /// Ambusher: targets four tiles ahead of the player
    Pinky,
    /// Flanker: mirrors the leader around the player
    Inky,
    /// Opportunist: chases from afar, retreats up close
    Clyde,
}

/// Scatter corner, expressed relative to the maze edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Fixed per-identity data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostConfig {
    pub corner: Corner,
    /// Start tile offset from the home center
    pub start_offset: IVec2,
    /// Starts on the doorway already scattering
    pub starts_outside: bool,
    /// Speeds up late in the level
    pub cruise_elroy: bool,
}

impl GhostId {
    pub const ALL: [GhostId; 4] = [GhostId::Blinky, GhostId::Pinky, GhostId::Inky, GhostId::Clyde];

    pub fn index(self) -> usize {
        match self {
            GhostId::Blinky => 0,
            GhostId::Pinky => 1,
            GhostId::Inky => 2,
            GhostId::Clyde => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GhostId::Blinky => "blinky",
            GhostId::Pinky => "pinky",
            GhostId::Inky => "inky",
            GhostId::Clyde => "clyde",
        }
    }

    pub fn config(self) -> GhostConfig {
        match self {
            GhostId::Blinky => GhostConfig {
                corner: Corner::TopRight,
                start_offset: IVec2::ZERO,
                starts_outside: true,
                cruise_elroy: true,
            },
            GhostId::Pinky => GhostConfig {
                corner: Corner::TopLeft,
                start_offset: IVec2::ZERO,
                starts_outside: false,
                cruise_elroy: false,
            },
            GhostId::Inky => GhostConfig {
                corner: Corner::BottomRight,
                start_offset: IVec2::new(-2, 0),
                starts_outside: false,
                cruise_elroy: false,
            },
            GhostId::Clyde => GhostConfig {
                corner: Corner::BottomLeft,
                start_offset: IVec2::new(2, 0),
                starts_outside: false,
                cruise_elroy: false,
            },
        }
    }

    /// Scatter target tile; lies outside the maze so the ghost circles the corner block
    pub fn scatter_tile(self, maze: &Maze) -> IVec2 {
        let (w, h, _, _) = maze.dimensions();
        match self.config().corner {
            Corner::TopLeft => IVec2::new(2, -3),
            Corner::TopRight => IVec2::new(w - 3, -3),
            Corner::BottomLeft => IVec2::new(0, h),
            Corner::BottomRight => IVec2::new(w - 1, h),
        }
    }

    pub fn start_tile(self, maze: &Maze) -> IVec2 {
        let config = self.config();
        if config.starts_outside {
            maze.doorway
        } else {
            maze.home_center + config.start_offset
        }
    }
}

/// Per-ghost behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    AtHome,
    ExitingHome,
    Scatter,
    Chase,
    Frightened,
    Returning,
    Stopped,
}

/// Legs of the fixed path an eaten ghost follows home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnStage {
    ToDoorColumn,
    ToDoorway,
    IntoHome,
}

/// Reported back to the orchestrator after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostSignal {
    None,
    /// Arrived home after being eaten; its exit must be rescheduled
    ReachedHome,
}

/// Read-only view of the match a ghost needs for one update
#[derive(Debug, Clone, Copy)]
pub struct GhostContext<'a> {
    pub maze: &'a Maze,
    pub player_pos: Vec2,
    pub player_facing: Direction,
    /// Current position of the leader, if it is on the board
    pub leader_pos: Option<Vec2>,
    pub global: GlobalMode,
    pub frightened: bool,
    pub dots_remaining: u32,
    pub level: u32,
    pub now_ms: u64,
}

/// Chase destination for an identity
pub fn chase_target(id: GhostId, own_pos: Vec2, ctx: &GhostContext) -> Vec2 {
    let maze = ctx.maze;
    let bounds = maze.pixel_size();
    let player = ctx.player_pos;
    match id {
        GhostId::Blinky => maze.center_of(IVec2::new(tile_of(player.x), tile_of(player.y))),
        GhostId::Pinky => {
            let lead = ctx.player_facing.vector() * AMBUSH_LEAD_TILES * TILE_SIZE;
            (player + lead).clamp(Vec2::ZERO, bounds)
        }
        GhostId::Inky => match ctx.leader_pos {
            Some(leader) => (player + 2.0 * (player - leader)).clamp(Vec2::ZERO, bounds),
            None => player,
        },
        GhostId::Clyde => {
            if own_pos.distance(player) > OPPORTUNIST_RADIUS_TILES * TILE_SIZE {
                player
            } else {
                maze.center_of(id.scatter_tile(maze))
            }
        }
    }
}

/// A ghost agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub id: GhostId,
    pub body: BodyId,
    pub motion: Motion,
    pub mode: GhostMode,
    /// Pixel point steered toward in scatter/chase
    pub destination: Vec2,
    /// Earliest time a repeat decision on the same tile may be taken
    pub next_turn_at_ms: u64,
    /// Last global order was chase
    pub attacking: bool,
    return_stage: ReturnStage,
    last_decision_tile: Option<IVec2>,
    /// A chase reversal allows one more decision on the current tile
    may_redecide: bool,
    /// Still gliding out of the house
    leaving_home: bool,
    /// Mode interrupted by `stop`
    held: GhostMode,
}

impl Ghost {
    pub fn new(id: GhostId, body: BodyId, maze: &Maze) -> Self {
        let mut ghost = Self {
            id,
            body,
            motion: Motion::new(Vec2::ZERO),
            mode: GhostMode::AtHome,
            destination: Vec2::ZERO,
            next_turn_at_ms: 0,
            attacking: false,
            return_stage: ReturnStage::ToDoorColumn,
            last_decision_tile: None,
            may_redecide: false,
            leaving_home: false,
            held: GhostMode::AtHome,
        };
        ghost.reset(maze);
        ghost
    }

    /// Back to the start-of-round placement
    pub fn reset(&mut self, maze: &Maze) {
        self.motion = Motion::new(maze.center_of(self.id.start_tile(maze)));
        self.destination = maze.center_of(self.id.scatter_tile(maze));
        self.next_turn_at_ms = 0;
        self.attacking = false;
        self.return_stage = ReturnStage::ToDoorColumn;
        self.last_decision_tile = None;
        self.may_redecide = false;
        self.leaving_home = false;
        if self.id.config().starts_outside {
            self.mode = GhostMode::Scatter;
            self.motion.direction = Direction::Left;
        } else {
            self.mode = GhostMode::AtHome;
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    pub fn tile(&self) -> IVec2 {
        self.motion.tile()
    }

    /// Whether the leader is on the board for the flanker's targeting
    pub fn is_roaming(&self) -> bool {
        matches!(
            self.mode,
            GhostMode::Scatter | GhostMode::Chase | GhostMode::Frightened
        )
    }

    fn elroy_active(&self, ctx: &GhostContext) -> bool {
        self.id.config().cruise_elroy && ctx.dots_remaining < ELROY_DOTS_REMAINING
    }

    /// Effective speed this tick (pixels/tick)
    pub fn speed(&self, ctx: &GhostContext) -> f32 {
        let base = match self.mode {
            GhostMode::Frightened => GHOST_FRIGHTENED_SPEED,
            GhostMode::Returning => GHOST_RETURNING_SPEED,
            GhostMode::AtHome | GhostMode::Stopped => 0.0,
            _ if self.elroy_active(ctx) => GHOST_RETURNING_SPEED,
            GhostMode::ExitingHome => GHOST_NORMAL_SPEED,
            _ => match ctx.global {
                GlobalMode::Scatter => GHOST_SCATTER_SPEED,
                GlobalMode::Chase => GHOST_NORMAL_SPEED,
            },
        };
        (base * level_speed_multiplier(ctx.level)).min(MAX_STEP)
    }

    /// One tick of ghost behaviour
    pub fn update(&mut self, ctx: &GhostContext, rng: &mut Pcg32) -> GhostSignal {
        self.motion.speed = self.speed(ctx);
        match self.mode {
            GhostMode::AtHome | GhostMode::Stopped => GhostSignal::None,
            GhostMode::ExitingHome => {
                self.exit_step(ctx);
                GhostSignal::None
            }
            GhostMode::Frightened if self.leaving_home => {
                self.exit_step(ctx);
                GhostSignal::None
            }
            GhostMode::Returning => self.return_step(ctx.maze),
            GhostMode::Scatter | GhostMode::Chase | GhostMode::Frightened => {
                self.roam(ctx, rng);
                GhostSignal::None
            }
        }
    }

    fn exit_step(&mut self, ctx: &GhostContext) {
        let maze = ctx.maze;
        let home_x = maze.center_of(maze.home_center).x;
        if self.motion.pos.x != home_x {
            self.motion.glide_toward(Vec2::new(home_x, self.motion.pos.y));
            return;
        }
        if self.motion.glide_toward(maze.center_of(maze.doorway)) {
            self.mode = if ctx.frightened || self.mode == GhostMode::Frightened {
                GhostMode::Frightened
            } else {
                match ctx.global {
                    GlobalMode::Scatter => GhostMode::Scatter,
                    GlobalMode::Chase => GhostMode::Chase,
                }
            };
            self.attacking = ctx.global == GlobalMode::Chase;
            self.motion.direction = Direction::Left;
            self.last_decision_tile = None;
            self.leaving_home = false;
            log::debug!("{} left home in {:?}", self.id.name(), self.mode);
        }
    }

    fn return_step(&mut self, maze: &Maze) -> GhostSignal {
        let doorway = maze.center_of(maze.doorway);
        match self.return_stage {
            ReturnStage::ToDoorColumn => {
                if self.motion.glide_toward(Vec2::new(doorway.x, self.motion.pos.y)) {
                    self.return_stage = ReturnStage::ToDoorway;
                }
            }
            ReturnStage::ToDoorway => {
                if self.motion.glide_toward(doorway) {
                    self.return_stage = ReturnStage::IntoHome;
                }
            }
            ReturnStage::IntoHome => {
                if self.motion.glide_toward(maze.center_of(maze.home_center)) {
                    self.mode = GhostMode::AtHome;
                    self.motion.direction = Direction::None;
                    self.return_stage = ReturnStage::ToDoorColumn;
                    log::debug!("{} is home", self.id.name());
                    return GhostSignal::ReachedHome;
                }
            }
        }
        GhostSignal::None
    }

    fn roam(&mut self, ctx: &GhostContext, rng: &mut Pcg32) {
        let maze = ctx.maze;
        match self.mode {
            GhostMode::Chase => self.destination = chase_target(self.id, self.motion.pos, ctx),
            GhostMode::Scatter => self.destination = maze.center_of(self.id.scatter_tile(maze)),
            _ => {}
        }

        // Every new tile gets a decision; the cooldown only limits a repeat on the same tile
        let tile = self.motion.tile();
        let fresh = self.last_decision_tile != Some(tile);
        let repeat = self.may_redecide && ctx.now_ms >= self.next_turn_at_ms;
        if self.motion.distance_to_center() <= TURN_TOLERANCE && (fresh || repeat) {
            self.motion.pos = self.motion.tile_center();
            let dir = self.decide(maze, rng);
            log::trace!("{} at {:?} turns {:?}", self.id.name(), tile, dir);
            self.motion.direction = dir;
            self.last_decision_tile = Some(tile);
            self.may_redecide = false;
            self.next_turn_at_ms = ctx.now_ms + GHOST_TURN_COOLDOWN_MS;
        }

        self.motion.advance(maze, |t| maze.is_walkable(t));
    }

    /// Direction decision at a tile center
    pub fn decide(&self, maze: &Maze, rng: &mut Pcg32) -> Direction {
        let current = self.motion.direction;
        let tile = self.motion.tile();
        let open = |d: Direction| maze.is_walkable(maze.neighbor(tile, d));

        let mut options: Vec<Direction> = Direction::CARDINALS
            .into_iter()
            .filter(|&d| !d.is_reverse_of(current) && open(d))
            .collect();
        if options.is_empty() {
            return current.opposite();
        }

        if self.mode == GhostMode::Frightened {
            return options.choose(rng).copied().unwrap_or(current.opposite());
        }

        if maze.is_no_up(tile) {
            options.retain(|&d| d != Direction::Up);
            if options.is_empty() {
                // Dead end under the no-up rule: reverse rather than stall
                return if current != Direction::None && open(current) {
                    current
                } else {
                    current.opposite()
                };
            }
        }

        let dest = self.destination;
        let cost = |d: Direction| maze.center_of(maze.neighbor(tile, d)).distance_squared(dest);
        options
            .into_iter()
            .min_by(|&a, &b| cost(a).total_cmp(&cost(b)))
            .unwrap_or(current)
    }

    /// Global chase order
    pub fn order_attack(&mut self) {
        if self.mode == GhostMode::Frightened {
            return;
        }
        self.attacking = true;
        if matches!(self.mode, GhostMode::Scatter | GhostMode::Chase) {
            self.mode = GhostMode::Chase;
            self.motion.reverse();
            self.may_redecide = true;
        } else if self.resumes_roaming() {
            self.mode = GhostMode::Chase;
        }
    }

    /// Global scatter order
    pub fn order_scatter(&mut self) {
        if self.mode == GhostMode::Frightened {
            return;
        }
        self.attacking = false;
        if self.mode == GhostMode::Chase || self.resumes_roaming() {
            self.mode = GhostMode::Scatter;
        }
    }

    fn resumes_roaming(&self) -> bool {
        self.mode == GhostMode::Stopped
            && matches!(
                self.held,
                GhostMode::Scatter | GhostMode::Chase | GhostMode::Frightened
            )
    }

    /// Pill eaten. Exiting ghosts keep heading for the doorway, frightened.
    pub fn frighten(&mut self) {
        match self.mode {
            GhostMode::Scatter | GhostMode::Chase => self.mode = GhostMode::Frightened,
            GhostMode::ExitingHome => {
                self.mode = GhostMode::Frightened;
                self.leaving_home = true;
            }
            _ => {}
        }
    }

    /// Frightened override expired
    pub fn calm(&mut self) {
        if self.mode != GhostMode::Frightened {
            return;
        }
        self.mode = if self.leaving_home {
            self.leaving_home = false;
            GhostMode::ExitingHome
        } else if self.attacking {
            GhostMode::Chase
        } else {
            GhostMode::Scatter
        };
    }

    /// Eaten by the player
    pub fn eaten(&mut self) {
        if self.is_roaming() {
            self.mode = GhostMode::Returning;
            self.return_stage = ReturnStage::ToDoorColumn;
            self.last_decision_tile = None;
            self.leaving_home = false;
        }
    }

    /// Leave the house. Returns false when the ghost is not waiting at home.
    /// A ghost stopped inside the house resumes its exit.
    pub fn exit_home(&mut self) -> bool {
        let waiting = match self.mode {
            GhostMode::AtHome => true,
            GhostMode::Stopped => matches!(self.held, GhostMode::AtHome | GhostMode::ExitingHome),
            _ => false,
        };
        if waiting {
            self.mode = GhostMode::ExitingHome;
        }
        waiting
    }

    /// Freeze in place (player death, level clear)
    pub fn stop(&mut self) {
        if matches!(self.mode, GhostMode::Returning | GhostMode::Stopped) {
            return;
        }
        self.held = if self.leaving_home {
            GhostMode::ExitingHome
        } else {
            self.mode
        };
        self.leaving_home = false;
        self.mode = GhostMode::Stopped;
        self.motion.speed = 0.0;
    }
}
