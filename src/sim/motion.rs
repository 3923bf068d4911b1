//! Grid-aligned entity motion shared by the player and the ghosts

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::maze::Maze;
use crate::consts::MAX_STEP;
use crate::{tile_center, tile_of};

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cardinal directions in ghost tie-break order
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Tile offset (screen space, y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    pub fn vector(self) -> Vec2 {
        self.delta().as_vec2()
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// True when both are real directions pointing opposite ways
    pub fn is_reverse_of(self, other: Direction) -> bool {
        self != Direction::None && self == other.opposite()
    }
}

/// Continuous position plus heading and speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motion {
    pub pos: Vec2,
    pub direction: Direction,
    /// Pixels per tick
    pub speed: f32,
}

impl Motion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            direction: Direction::None,
            speed: 0.0,
        }
    }

    /// Grid cell containing the position
    pub fn tile(&self) -> IVec2 {
        IVec2::new(tile_of(self.pos.x), tile_of(self.pos.y))
    }

    pub fn tile_center(&self) -> Vec2 {
        let tile = self.tile();
        Vec2::new(tile_center(tile.x), tile_center(tile.y))
    }

    pub fn distance_to_center(&self) -> f32 {
        self.pos.distance(self.tile_center())
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.opposite();
    }

    /// Velocity this tick
    pub fn velocity(&self) -> Vec2 {
        self.direction.vector() * self.speed
    }

    /// Move one tick along the current direction.
    ///
    /// Stops on the tile center when the next tile is not passable (solid
    /// resolution against the maze) and wraps through the horizontal tunnel.
    pub fn advance(&mut self, maze: &Maze, passable: impl Fn(IVec2) -> bool) {
        if self.direction == Direction::None || self.speed <= 0.0 {
            return;
        }
        let step = self.speed.min(MAX_STEP);
        let heading = self.direction.vector();
        let center = self.tile_center();
        let ahead = maze.neighbor(self.tile(), self.direction);

        let mut next = self.pos + heading * step;
        if !passable(ahead) && (next - center).dot(heading) > 0.0 {
            // Clamp on the movement axis only
            if heading.x != 0.0 {
                next.x = center.x;
            } else {
                next.y = center.y;
            }
        }
        next.x = maze.wrap_x(next.x);
        self.pos = next;
    }

    /// Move straight toward `target`, ignoring walls. Returns true on arrival.
    pub fn glide_toward(&mut self, target: Vec2) -> bool {
        let offset = target - self.pos;
        let step = self.speed.min(MAX_STEP);
        if offset.length() <= step {
            self.pos = target;
            return true;
        }
        self.direction = if offset.x.abs() >= offset.y.abs() {
            if offset.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if offset.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.pos += offset.normalize() * step;
        false
    }
}
