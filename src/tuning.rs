//! Data-driven game balance
//!
//! Loaded from JSON by the host; every field falls back to its default when
//! absent. Resource deltas applied on collisions are fixed rules and live in
//! `sim::resources`, not here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TICK_HZ;
use crate::error::{Error, Result};

/// Relative widths of the spawn category bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub gate_exam: f32,
    pub blessing: f32,
    pub fuel: f32,
    pub nur: f32,
    pub hazard: f32,
    pub temptation: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        // Ordered rarest first
        Self {
            gate_exam: 3.0,
            blessing: 5.0,
            fuel: 12.0,
            nur: 15.0,
            hazard: 30.0,
            temptation: 35.0,
        }
    }
}

impl SpawnWeights {
    pub fn total(&self) -> f32 {
        self.gate_exam + self.blessing + self.fuel + self.nur + self.hazard + self.temptation
    }

    fn as_array(&self) -> [f32; 6] {
        [
            self.gate_exam,
            self.blessing,
            self.fuel,
            self.nur,
            self.hazard,
            self.temptation,
        ]
    }
}

/// Game balance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    /// Simulation ticks per second
    pub tick_hz: f32,

    // === Motion ===
    /// Speed while running (0 while idle, paused or suspended)
    pub run_speed: f32,
    /// Seconds between spawns at speed 1.0
    pub spawn_interval_secs: f32,
    /// Seconds an entity takes to travel from depth 0 to depth 1
    pub crossing_secs: f32,

    // === Collision ===
    pub player_depth: f32,
    pub collision_half_band: f32,
    /// Entities deeper than this are discarded
    pub far_edge: f32,

    // === Resources ===
    pub fuel_decay_per_tick: f32,
    pub spawn_weights: SpawnWeights,

    // === Interrupts ===
    /// Chance that an exam gate turns into the mini-collection game
    pub mini_collection_chance: f32,
    pub mini_collection_secs: f32,
    pub mini_item_interval_secs: f32,
    pub mini_item_ttl_secs: f32,
    /// Chance a mini-game item is collectible rather than a trap
    pub mini_good_chance: f32,
    pub mini_good_points: u32,
    pub mini_trap_penalty: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,

            run_speed: 1.0,
            spawn_interval_secs: 0.9,
            crossing_secs: 3.0,

            player_depth: 0.85,
            collision_half_band: 0.05,
            far_edge: 1.0,

            fuel_decay_per_tick: 0.06,
            spawn_weights: SpawnWeights::default(),

            mini_collection_chance: 0.30,
            mini_collection_secs: 10.0,
            mini_item_interval_secs: 0.6,
            mini_item_ttl_secs: 1.5,
            mini_good_chance: 0.7,
            mini_good_points: 10,
            mini_trap_penalty: 15,
        }
    }
}

impl Tuning {
    /// Fixed simulation timestep in seconds
    #[inline]
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Convert a duration in seconds to whole ticks (at least one)
    pub fn secs_to_ticks(&self, secs: f32) -> u32 {
        ((secs * self.tick_hz).round() as u32).max(1)
    }

    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("tick_hz", self.tick_hz),
            ("run_speed", self.run_speed),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("crossing_secs", self.crossing_secs),
            ("far_edge", self.far_edge),
            ("mini_collection_secs", self.mini_collection_secs),
            ("mini_item_interval_secs", self.mini_item_interval_secs),
            ("mini_item_ttl_secs", self.mini_item_ttl_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning(format!("{name} must be positive, got {value}")));
            }
        }

        let chances = [
            ("mini_collection_chance", self.mini_collection_chance),
            ("mini_good_chance", self.mini_good_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidTuning(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        if self.fuel_decay_per_tick < 0.0 {
            return Err(Error::InvalidTuning("fuel_decay_per_tick must not be negative".into()));
        }

        let weights = self.spawn_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidTuning("spawn weights must not be negative".into()));
        }
        if self.spawn_weights.total() <= 0.0 {
            return Err(Error::InvalidTuning("spawn weights must not all be zero".into()));
        }

        let band_start = self.player_depth - self.collision_half_band;
        let band_end = self.player_depth + self.collision_half_band;
        if self.collision_half_band <= 0.0 || band_start <= 0.0 || band_end >= self.far_edge {
            return Err(Error::InvalidTuning(format!(
                "collision band [{band_start}, {band_end}] must lie inside (0, {})",
                self.far_edge
            )));
        }

        // Entities must land inside the band on at least one tick
        let step = self.sim_dt() / self.crossing_secs;
        if step > 2.0 * self.collision_half_band {
            return Err(Error::InvalidTuning(format!(
                "depth step {step} per tick is wider than the collision band {}",
                2.0 * self.collision_half_band
            )));
        }

        Ok(())
    }
}
