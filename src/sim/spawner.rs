//! Weighted entity spawner
//!
//! One entity per spawn interval, never more than one per tick. The interval
//! shrinks as speed grows. The category comes from a single uniform draw
//! partitioned into cumulative bands, rarest category first.

use rand::Rng;

use super::lane::Lane;
use super::state::EntityKind;
use crate::consts::LANE_COUNT;
use crate::tuning::{SpawnWeights, Tuning};

/// A spawn decided for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder {
    pub kind: EntityKind,
    pub lane: Lane,
}

/// Spawn cadence state
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    accumulator: f32,
}

impl Spawner {
    /// Seconds between spawns at the given speed
    pub fn interval(tuning: &Tuning, speed: f32) -> Option<f32> {
        (speed > 0.0).then(|| tuning.spawn_interval_secs / speed)
    }

    /// Advance the cadence by one tick, returning at most one spawn
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speed: f32,
        tuning: &Tuning,
        exam_enabled: bool,
        rng: &mut R,
    ) -> Option<SpawnOrder> {
        let interval = Self::interval(tuning, speed)?;

        self.accumulator += dt;
        if self.accumulator < interval {
            return None;
        }
        self.accumulator -= interval;
        // Spawns are never merged; a backlog past one interval is dropped
        if self.accumulator >= interval {
            self.accumulator %= interval;
        }

        let lane = Lane::new(rng.random_range(0..LANE_COUNT));
        let draw: f32 = rng.random();
        let kind = kind_for_draw(draw, &tuning.spawn_weights, exam_enabled);
        Some(SpawnOrder { kind, lane })
    }
}

/// Map a uniform draw in [0, 1) onto the cumulative category bands
///
/// With `exam_enabled` false the gate band is removed and the remaining bands
/// are rescaled to cover the whole range.
pub fn kind_for_draw(draw: f32, weights: &SpawnWeights, exam_enabled: bool) -> EntityKind {
    let bands = [
        (EntityKind::GateExam, if exam_enabled { weights.gate_exam } else { 0.0 }),
        (EntityKind::Blessing, weights.blessing),
        (EntityKind::Fuel, weights.fuel),
        (EntityKind::Nur, weights.nur),
        (EntityKind::Hazard, weights.hazard),
        (EntityKind::Temptation, weights.temptation),
    ];
    let total: f32 = bands.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return EntityKind::Temptation;
    }

    let target = draw.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_nonzero = EntityKind::Temptation;
    for (kind, weight) in bands {
        let weight = weight.max(0.0);
        if weight == 0.0 {
            continue;
        }
        cumulative += weight;
        last_nonzero = kind;
        if target < cumulative {
            return kind;
        }
    }
    // draw == 1.0 or float slack at the top edge
    last_nonzero
}
