//! Player motion controller
//!
//! Turns are buffered: a reversal executes at once, any other turn is
//! recorded with the tile center where it becomes legal and executes when the
//! player passes within [`TURN_TOLERANCE`] of that point.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::BodyId;
use super::maze::Maze;
use super::motion::{Direction, Motion};
use crate::consts::{DEATH_ANIMATION_MS, PLAYER_SPEED, TURN_TOLERANCE};

/// A turn waiting for the player to reach its turn point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub direction: Direction,
    pub at: Vec2,
}

/// Player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: BodyId,
    pub motion: Motion,
    /// Last non-`None` heading
    pub facing: Direction,
    pub pending: Option<PendingTurn>,
    pub alive: bool,
    /// Milliseconds of death animation played so far
    death_elapsed_ms: Option<u64>,
}

impl Player {
    /// Spawn at the maze's player start
    pub fn spawn(body: BodyId, maze: &Maze) -> Self {
        let mut motion = Motion::new(maze.center_of(maze.player_start));
        motion.speed = PLAYER_SPEED;
        Self {
            body,
            motion,
            facing: Direction::Left,
            pending: None,
            alive: true,
            death_elapsed_ms: None,
        }
    }

    pub fn tile(&self) -> IVec2 {
        self.motion.tile()
    }

    pub fn pos(&self) -> Vec2 {
        self.motion.pos
    }

    /// Feed one requested direction. Turns into walls are dropped.
    pub fn request(&mut self, dir: Direction, maze: &Maze) {
        let current = self.motion.direction;
        if dir == Direction::None || dir == current {
            return;
        }
        if dir.is_reverse_of(current) {
            self.motion.direction = dir;
            self.facing = dir;
            self.pending = None;
            return;
        }
        let tile = self.tile();
        if maze.is_walkable(maze.neighbor(tile, dir)) {
            self.pending = Some(PendingTurn {
                direction: dir,
                at: maze.center_of(tile),
            });
        }
    }

    /// One tick of player movement
    pub fn update(&mut self, input: Direction, maze: &Maze) {
        if !self.alive {
            return;
        }
        self.request(input, maze);

        if let Some(turn) = self.pending {
            if self.motion.pos.distance(turn.at) <= TURN_TOLERANCE {
                self.motion.pos = turn.at;
                self.motion.direction = turn.direction;
                self.facing = turn.direction;
                self.pending = None;
            }
        }

        self.motion.advance(maze, |t| maze.is_walkable(t));
    }

    /// Stop dead and start the death animation
    pub fn kill(&mut self) {
        self.alive = false;
        self.motion.direction = Direction::None;
        self.motion.speed = 0.0;
        self.pending = None;
        self.death_elapsed_ms = Some(0);
    }

    /// Advance the death animation
    pub fn update_death(&mut self, dt_ms: u64) {
        if let Some(elapsed) = self.death_elapsed_ms.as_mut() {
            *elapsed = (*elapsed + dt_ms).min(DEATH_ANIMATION_MS);
        }
    }

    /// Whether the death animation has played to the end
    pub fn death_finished(&self) -> bool {
        self.death_elapsed_ms
            .is_some_and(|elapsed| elapsed >= DEATH_ANIMATION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Maze, Player) {
        let maze = Maze::standard().unwrap();
        let player = Player::spawn(BodyId(1), &maze);
        (maze, player)
    }

    #[test]
    fn test_turn_into_wall_ignored() {
        let (maze, mut player) = setup();
        // Start tile (13, 23) has a wall below
        player.update(Direction::Down, &maze);
        assert!(player.pending.is_none());
        assert_eq!(player.motion.direction, Direction::None);
    }

    #[test]
    fn test_start_moving_from_rest() {
        let (maze, mut player) = setup();
        let start = player.pos();
        player.update(Direction::Left, &maze);
        assert_eq!(player.motion.direction, Direction::Left);
        assert!(player.pos().x < start.x);
    }

    #[test]
    fn test_reversal_is_immediate() {
        let (maze, mut player) = setup();
        player.update(Direction::Left, &maze);
        player.update(Direction::None, &maze);
        let before = player.pos();
        assert!(player.motion.distance_to_center() > TURN_TOLERANCE - 1.0);
        player.update(Direction::Right, &maze);
        assert_eq!(player.motion.direction, Direction::Right);
        assert!(player.pos().x > before.x);
    }

    #[test]
    fn test_turn_waits_for_turn_point() {
        let (maze, mut player) = setup();
        player.update(Direction::Left, &maze);
        // Up is a wall from tile 13
        player.update(Direction::Up, &maze);
        assert!(player.pending.is_none());

        // Keep requesting up until the turn executes
        let mut turned_at = None;
        for _ in 0..40 {
            player.update(Direction::Up, &maze);
            if player.motion.direction == Direction::Up {
                turned_at = Some(player.tile());
                break;
            }
        }
        assert_eq!(turned_at, Some(IVec2::new(12, 23)));
        // Snapped onto the column center before moving up
        assert_eq!(player.pos().x, maze.center_of(IVec2::new(12, 23)).x);
    }

    #[test]
    fn test_pending_turn_recorded_with_center() {
        let (maze, mut player) = setup();
        player.update(Direction::Left, &maze);
        // Walk until inside tile 12
        while player.tile() != IVec2::new(12, 23) {
            player.update(Direction::None, &maze);
        }
        player.request(Direction::Up, &maze);
        let pending = player.pending.unwrap();
        assert_eq!(pending.direction, Direction::Up);
        assert_eq!(pending.at, maze.center_of(IVec2::new(12, 23)));
    }

    #[test]
    fn test_death_animation_completes() {
        let (_maze, mut player) = setup();
        player.kill();
        assert_eq!(player.motion.velocity(), Vec2::ZERO);
        assert!(!player.death_finished());
        player.update_death(DEATH_ANIMATION_MS / 2);
        assert!(!player.death_finished());
        player.update_death(DEATH_ANIMATION_MS);
        assert!(player.death_finished());
    }
}
