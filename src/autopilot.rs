//! Directional input sources that do not need a keyboard
//!
//! Used by the native demo and by tests. `ScriptedInput` replays a fixed
//! command string; `Wanderer` walks toward the nearest remaining collectible.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;

use crate::sim::{Direction, Game, GhostMode};

/// Produces one requested direction per tick
pub trait InputSource {
    fn next_direction(&mut self, game: &Game) -> Direction;
}

/// Replays `w`/`a`/`s`/`d` commands, each held for a number of ticks
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    commands: Vec<Direction>,
    hold_ticks: u32,
    index: usize,
    held: u32,
}

impl ScriptedInput {
    /// Parse a script. `.` waits, `#` starts a comment line.
    pub fn parse(script: &str, hold_ticks: u32) -> Self {
        let mut commands = Vec::new();
        for line in script.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for c in line.chars() {
                match char_to_direction(c) {
                    Some(dir) => commands.push(dir),
                    None if c.is_whitespace() => {}
                    None => log::warn!("Unknown command in script: {c:?}"),
                }
            }
        }
        Self {
            commands,
            hold_ticks: hold_ticks.max(1),
            index: 0,
            held: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.commands.len()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn advance(&mut self) -> Direction {
        let Some(&dir) = self.commands.get(self.index) else {
            return Direction::None;
        };
        self.held += 1;
        if self.held >= self.hold_ticks {
            self.held = 0;
            self.index += 1;
        }
        dir
    }
}

impl InputSource for ScriptedInput {
    fn next_direction(&mut self, _game: &Game) -> Direction {
        self.advance()
    }
}

fn char_to_direction(c: char) -> Option<Direction> {
    match c {
        'w' | 'W' => Some(Direction::Up),
        'a' | 'A' => Some(Direction::Left),
        's' | 'S' => Some(Direction::Down),
        'd' | 'D' => Some(Direction::Right),
        '.' => Some(Direction::None),
        _ => None,
    }
}

/// Heads for the closest collectible, steering around dangerous ghosts
#[derive(Debug, Clone, Default)]
pub struct Wanderer;

impl Wanderer {
    /// First step of a shortest walkable path to any live collectible
    pub fn route(game: &Game) -> Option<Direction> {
        let maze = &game.maze;
        let start = game.player.tile();
        let targets: HashSet<IVec2> = game
            .collectibles
            .iter()
            .filter(|c| c.alive)
            .map(|c| IVec2::new(crate::tile_of(c.pos.x), crate::tile_of(c.pos.y)))
            .collect();
        if targets.is_empty() {
            return None;
        }
        let danger: HashSet<IVec2> = game
            .ghosts
            .iter()
            .filter(|g| matches!(g.mode, GhostMode::Scatter | GhostMode::Chase))
            .map(|g| g.tile())
            .collect();

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::new();
        for dir in Direction::CARDINALS {
            let next = maze.neighbor(start, dir);
            if maze.is_walkable(next) && !danger.contains(&next) && seen.insert(next) {
                queue.push_back((next, dir));
            }
        }
        while let Some((tile, first)) = queue.pop_front() {
            if targets.contains(&tile) {
                return Some(first);
            }
            for dir in Direction::CARDINALS {
                let next = maze.neighbor(tile, dir);
                if maze.is_walkable(next) && !danger.contains(&next) && seen.insert(next) {
                    queue.push_back((next, first));
                }
            }
        }
        None
    }
}

impl InputSource for Wanderer {
    fn next_direction(&mut self, game: &Game) -> Direction {
        Self::route(game).unwrap_or(Direction::None)
    }
}
