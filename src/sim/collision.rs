//! Overlap detection and contact dispatch
//!
//! Bodies are axis-aligned rectangles centered on their entity. Overlap
//! bindings are keyed on the player's body id, so a recreated player must be
//! bound again before any contact is reported.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ghost::{Ghost, GhostId, GhostMode};
use super::maze::{Collectible, CollectibleKind};
use super::player::Player;
use super::state::GameState;
use crate::consts::*;

/// Engine-side identity of a moving body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub center: Vec2,
    pub half: Vec2,
}

impl Body {
    pub fn square(id: BodyId, center: Vec2, half_extent: f32) -> Self {
        Self {
            id,
            center,
            half: Vec2::splat(half_extent),
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Body) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half + other.half;
        gap.x < reach.x && gap.y < reach.y
    }
}

/// An overlap reported for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Index into the level's collectible list
    Collectible(usize),
    Ghost(GhostId),
}

/// Result of dispatching a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stale or harmless contact
    Ignored,
    DotEaten,
    /// Frightened mode must start
    PillEaten,
    GhostEaten(GhostId),
    /// Player death must start
    PlayerCaught(GhostId),
}

/// Overlap listeners registered for the current player body
#[derive(Debug, Clone, Default)]
pub struct OverlapBindings {
    player: Option<BodyId>,
}

impl OverlapBindings {
    pub fn bind(&mut self, player: BodyId) {
        self.player = Some(player);
    }

    pub fn unbind(&mut self) {
        self.player = None;
    }

    pub fn bound(&self) -> Option<BodyId> {
        self.player
    }

    /// Contacts for this frame, collectibles first
    pub fn detect(&self, player: &Player, collectibles: &[Collectible], ghosts: &[Ghost]) -> Vec<Contact> {
        if self.player != Some(player.body) || !player.alive {
            return Vec::new();
        }
        let me = Body::square(player.body, player.pos(), PLAYER_HALF_EXTENT);

        let mut contacts: Vec<Contact> = collectibles
            .iter()
            .enumerate()
            .filter(|(_, c)| c.alive)
            .filter(|(i, c)| {
                let half = match c.kind {
                    CollectibleKind::Dot => DOT_HALF_EXTENT,
                    CollectibleKind::Pill => PILL_HALF_EXTENT,
                };
                me.overlaps(&Body::square(BodyId(u32::MAX - *i as u32), c.pos, half))
            })
            .map(|(i, _)| Contact::Collectible(i))
            .collect();

        contacts.extend(
            ghosts
                .iter()
                .filter(|g| me.overlaps(&Body::square(g.body, g.pos(), GHOST_HALF_EXTENT)))
                .map(|g| Contact::Ghost(g.id)),
        );
        contacts
    }
}

/// Apply one contact to the match state
pub fn dispatch(
    contact: Contact,
    state: &mut GameState,
    collectibles: &mut [Collectible],
    ghosts: &mut [Ghost],
) -> Outcome {
    match contact {
        Contact::Collectible(index) => {
            let Some(item) = collectibles.get_mut(index) else {
                return Outcome::Ignored;
            };
            if !item.consume() {
                return Outcome::Ignored;
            }
            state.collect();
            match item.kind {
                CollectibleKind::Dot => {
                    state.award(DOT_POINTS);
                    Outcome::DotEaten
                }
                CollectibleKind::Pill => {
                    state.award(PILL_POINTS);
                    Outcome::PillEaten
                }
            }
        }
        Contact::Ghost(id) => {
            let Some(ghost) = ghosts.iter_mut().find(|g| g.id == id) else {
                return Outcome::Ignored;
            };
            match ghost.mode {
                GhostMode::Frightened => {
                    state.award(GHOST_POINTS);
                    ghost.eaten();
                    Outcome::GhostEaten(id)
                }
                GhostMode::Returning => Outcome::Ignored,
                _ => Outcome::PlayerCaught(id),
            }
        }
    }
}
