//! Lane/depth collision detection
//!
//! The player sits at a fixed depth. Each tick, the oldest entity inside the
//! collision band and in the player's lane is judged and removed on the spot,
//! so no entity is ever judged twice and at most one collision happens per
//! tick. Entities in the band but in other lanes are re-tested next tick.

use super::lane::Lane;
use super::state::Entity;
use crate::tuning::Tuning;

/// Whether a depth falls inside the collision band around the player
#[inline]
pub fn in_collision_band(depth: f32, tuning: &Tuning) -> bool {
    (depth - tuning.player_depth).abs() <= tuning.collision_half_band
}

/// Judge at most one entity against the player's lane, removing it if hit
pub fn detect(entities: &mut Vec<Entity>, player_lane: Lane, tuning: &Tuning) -> Option<Entity> {
    // Entities are kept in ascending id order, so the first match is the oldest
    let index = entities
        .iter()
        .position(|e| e.lane == player_lane && in_collision_band(e.depth, tuning))?;
    Some(entities.remove(index))
}
