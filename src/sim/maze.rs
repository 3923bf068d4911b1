//! Maze geometry and collectibles
//!
//! The maze is an immutable tile grid parsed from an ASCII template. Pixel
//! space is `tile * TILE_SIZE`; the only horizontal tunnel wraps entities
//! to the opposite edge.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::motion::Direction;
use crate::consts::TILE_SIZE;
use crate::error::MatchError;
use crate::tile_center;

/// Classic 28x31 layout.
///
/// `#` wall, `.` dot, `o` pill, ` ` open floor, `-` ghost-house door,
/// `P` player start, `H` center of the ghost house.
pub const STANDARD_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###--### ##.######",
    "######.## #      # ##.######",
    "      .   #  H   #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Tiles on which ghosts may not choose to turn upward (outside frightened mode)
pub const STANDARD_NO_UP_TILES: [IVec2; 4] = [
    IVec2::new(12, 11),
    IVec2::new(15, 11),
    IVec2::new(12, 23),
    IVec2::new(15, 23),
];

/// Tile classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Walkable,
    Wall,
    /// Ghost-house door: solid for the player and for roaming ghosts
    Door,
}

/// One maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub pos: IVec2,
    pub kind: TileKind,
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Dot,
    Pill,
}

/// A dot or pill placed at a tile center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub alive: bool,
}

impl Collectible {
    /// Mark as consumed. Returns false when it was already gone.
    pub fn consume(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}

/// Static maze geometry
#[derive(Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
    placements: Vec<(IVec2, CollectibleKind)>,
    no_up: Vec<IVec2>,
    pub player_start: IVec2,
    pub home_center: IVec2,
    /// Door tile in the home's column
    pub door: IVec2,
    /// Open tile directly above the door; ghosts leave the house here
    pub doorway: IVec2,
}

impl Maze {
    /// The standard arcade maze
    pub fn standard() -> Result<Self, MatchError> {
        Self::parse(&STANDARD_LAYOUT, &STANDARD_NO_UP_TILES)
    }

    /// Parse an ASCII layout (see [`STANDARD_LAYOUT`] for the legend)
    pub fn parse(rows: &[&str], no_up: &[IVec2]) -> Result<Self, MatchError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(MatchError::InvalidLayout("layout is empty".into()));
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut placements = Vec::new();
        let mut player_start = None;
        let mut home_center = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MatchError::InvalidLayout(format!(
                    "row {y} has {} columns, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                let kind = match c {
                    '#' => TileKind::Wall,
                    '-' => TileKind::Door,
                    '.' => {
                        placements.push((pos, CollectibleKind::Dot));
                        TileKind::Walkable
                    }
                    'o' => {
                        placements.push((pos, CollectibleKind::Pill));
                        TileKind::Walkable
                    }
                    'P' => {
                        if player_start.replace(pos).is_some() {
                            return Err(MatchError::InvalidLayout("more than one player start".into()));
                        }
                        TileKind::Walkable
                    }
                    'H' => {
                        if home_center.replace(pos).is_some() {
                            return Err(MatchError::InvalidLayout("more than one ghost home".into()));
                        }
                        TileKind::Walkable
                    }
                    ' ' => TileKind::Walkable,
                    other => {
                        return Err(MatchError::InvalidLayout(format!(
                            "unknown tile '{other}' at ({x}, {y})"
                        )));
                    }
                };
                tiles.push(kind);
            }
        }

        let player_start =
            player_start.ok_or_else(|| MatchError::InvalidLayout("missing player start".into()))?;
        let home_center =
            home_center.ok_or_else(|| MatchError::InvalidLayout("missing ghost home".into()))?;

        let mut maze = Self {
            width: width as i32,
            height: height as i32,
            tiles,
            placements,
            no_up: no_up.to_vec(),
            player_start,
            home_center,
            door: IVec2::ZERO,
            doorway: IVec2::ZERO,
        };

        // Door sits straight above the home, with open floor above it
        let door = (0..home_center.y)
            .rev()
            .map(|y| IVec2::new(home_center.x, y))
            .find(|&p| maze.classify(p.x, p.y) == TileKind::Door)
            .ok_or_else(|| MatchError::InvalidLayout("no door above the ghost home".into()))?;
        let doorway = door - IVec2::Y;
        if maze.classify(doorway.x, doorway.y) != TileKind::Walkable {
            return Err(MatchError::InvalidLayout("door does not open onto the maze".into()));
        }
        maze.door = door;
        maze.doorway = doorway;

        let stranded = maze.unreachable_walkable();
        if !stranded.is_empty() {
            return Err(MatchError::InvalidLayout(format!(
                "{} walkable tiles unreachable from the player start, first at {:?}",
                stranded.len(),
                stranded[0]
            )));
        }

        Ok(maze)
    }

    /// (tile width, tile height, pixel width, pixel height)
    pub fn dimensions(&self) -> (i32, i32, f32, f32) {
        (
            self.width,
            self.height,
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    /// Classification of a tile; anything outside the grid is a wall
    pub fn classify(&self, x: i32, y: i32) -> TileKind {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return TileKind::Wall;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    pub fn tile(&self, pos: IVec2) -> Tile {
        Tile {
            pos,
            kind: self.classify(pos.x, pos.y),
        }
    }

    /// Player and roaming ghosts may only enter plain floor
    pub fn is_walkable(&self, pos: IVec2) -> bool {
        self.classify(pos.x, pos.y) == TileKind::Walkable
    }

    /// Wrap a horizontal pixel position back into `[0, pixel_width)`
    pub fn wrap_x(&self, px: f32) -> f32 {
        let w = self.width as f32 * TILE_SIZE;
        if px < 0.0 {
            px + w
        } else if px >= w {
            px - w
        } else {
            px
        }
    }

    /// Neighbouring tile, wrapping horizontally through the tunnel
    pub fn neighbor(&self, pos: IVec2, dir: Direction) -> IVec2 {
        let n = pos + dir.delta();
        IVec2::new(n.x.rem_euclid(self.width), n.y)
    }

    pub fn is_no_up(&self, pos: IVec2) -> bool {
        self.no_up.contains(&pos)
    }

    /// Pixel center of a tile
    pub fn center_of(&self, pos: IVec2) -> Vec2 {
        Vec2::new(tile_center(pos.x), tile_center(pos.y))
    }

    /// Fresh collectible set for the start of a level
    pub fn spawn_collectibles(&self) -> Vec<Collectible> {
        self.placements
            .iter()
            .enumerate()
            .map(|(i, &(pos, kind))| Collectible {
                id: i as u32,
                kind,
                pos: self.center_of(pos),
                alive: true,
            })
            .collect()
    }

    /// Number of dots plus pills placed at level start
    pub fn collectible_count(&self) -> u32 {
        self.placements.len() as u32
    }

    /// Walkable tiles (door and house included) that cannot be reached from
    /// the player start
    pub fn unreachable_walkable(&self) -> Vec<IVec2> {
        let mut seen = vec![false; self.tiles.len()];
        let index = |p: IVec2| (p.y * self.width + p.x) as usize;
        let passable = |p: IVec2| self.classify(p.x, p.y) != TileKind::Wall;

        let mut queue = VecDeque::from([self.player_start]);
        seen[index(self.player_start)] = true;
        while let Some(p) = queue.pop_front() {
            for dir in Direction::CARDINALS {
                let n = self.neighbor(p, dir);
                if n.y < 0 || n.y >= self.height || !passable(n) || seen[index(n)] {
                    continue;
                }
                seen[index(n)] = true;
                queue.push_back(n);
            }
        }

        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| IVec2::new(x, y)))
            .filter(|&p| passable(p) && !seen[index(p)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_dimensions() {
        let maze = Maze::standard().unwrap();
        assert_eq!(maze.dimensions(), (28, 31, 448.0, 496.0));
        assert_eq!(maze.doorway, IVec2::new(13, 11));
        assert_eq!(maze.door, IVec2::new(13, 12));
        assert_eq!(maze.home_center, IVec2::new(13, 14));
    }

    #[test]
    fn test_classify() {
        let maze = Maze::standard().unwrap();
        assert_eq!(maze.classify(0, 0), TileKind::Wall);
        assert_eq!(maze.classify(1, 1), TileKind::Walkable);
        assert_eq!(maze.classify(13, 12), TileKind::Door);
        assert_eq!(maze.classify(-1, 14), TileKind::Wall);
        assert_eq!(maze.classify(5, 99), TileKind::Wall);
    }

    #[test]
    fn test_wrap_x() {
        let maze = Maze::standard().unwrap();
        let (_, _, w, _) = maze.dimensions();
        assert_eq!(maze.wrap_x(-2.0), w - 2.0);
        assert_eq!(maze.wrap_x(w + 1.0), 1.0);
        assert_eq!(maze.wrap_x(w), 0.0);
        assert_eq!(maze.wrap_x(100.0), 100.0);
    }

    #[test]
    fn test_tunnel_neighbor_wraps() {
        let maze = Maze::standard().unwrap();
        assert_eq!(maze.neighbor(IVec2::new(0, 14), Direction::Left), IVec2::new(27, 14));
        assert_eq!(maze.neighbor(IVec2::new(27, 14), Direction::Right), IVec2::new(0, 14));
    }

    #[test]
    fn test_standard_is_connected() {
        let maze = Maze::standard().unwrap();
        assert!(maze.unreachable_walkable().is_empty());
    }

    #[test]
    fn test_collectibles() {
        let maze = Maze::standard().unwrap();
        let items = maze.spawn_collectibles();
        let pills = items.iter().filter(|c| c.kind == CollectibleKind::Pill).count();
        assert_eq!(pills, 4);
        assert_eq!(items.len() as u32, maze.collectible_count());
        assert!(items.iter().all(|c| c.alive));
    }

    #[test]
    fn test_consume_once() {
        let maze = Maze::standard().unwrap();
        let mut items = maze.spawn_collectibles();
        assert!(items[0].consume());
        assert!(!items[0].consume());
    }

    #[test]
    fn test_rejects_disconnected_layout() {
        let rows = ["#########", "#P.#  ###", "####-####", "### H ###", "#########"];
        assert!(matches!(
            Maze::parse(&rows, &[]),
            Err(MatchError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let rows = ["####", "#P", "####"];
        assert!(Maze::parse(&rows, &[]).is_err());
    }
}
