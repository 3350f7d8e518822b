//! Longitudinal motion of live entities
//!
//! Every entity takes `crossing_secs` of simulated time to travel from depth 0
//! to depth 1 whenever the round is moving. Speed controls spawn frequency
//! and score accrual, not travel velocity.

use super::state::Entity;
use crate::tuning::Tuning;

/// Depth gained per tick while moving
#[inline]
pub fn depth_step(dt: f32, tuning: &Tuning) -> f32 {
    dt / tuning.crossing_secs
}

/// Advance all entities by one tick and discard those past the far edge
///
/// Returns how many entities were discarded. Discarding has no gameplay effect.
pub fn advance(entities: &mut Vec<Entity>, dt: f32, speed: f32, tuning: &Tuning) -> usize {
    if speed <= 0.0 {
        for entity in entities.iter_mut() {
            entity.prev_depth = entity.depth;
        }
        return 0;
    }

    let step = depth_step(dt, tuning);
    for entity in entities.iter_mut() {
        entity.prev_depth = entity.depth;
        entity.depth += step;
    }

    let before = entities.len();
    entities.retain(|e| e.depth <= tuning.far_edge);
    before - entities.len()
}
