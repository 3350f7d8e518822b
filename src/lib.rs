//! İstikamet - A lane-based endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, round state)
//! - `snapshot`: Read-only per-tick view for the presentation layer
//! - `quiz`: Pluggable question bank for exam and recovery gates
//! - `highscores`: Leaderboard the host may persist
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod highscores;
pub mod quiz;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use error::Error;
pub use highscores::{HighScores, RoundRecord};
pub use quiz::{Question, QuestionBank};
pub use snapshot::Snapshot;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Number of parallel lanes
    pub const LANE_COUNT: u8 = 3;
    /// Lane the player starts each round in (center)
    pub const START_LANE: u8 = 1;

    /// Default simulation cadence (20 Hz)
    pub const DEFAULT_TICK_HZ: f32 = 20.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will accept before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Resource bounds
    pub const MAX_FUEL: f32 = 100.0;
    pub const MAX_NUR: f32 = 100.0;
    pub const MAX_HP: u8 = 3;

    /// Round defaults
    pub const START_FUEL: f32 = 100.0;
    pub const START_NUR: f32 = 50.0;
    pub const START_HP: u8 = 3;

    /// Resources restored by a passed recovery gate
    pub const RECOVERY_HP: u8 = 2;
    pub const RECOVERY_FUEL: f32 = 60.0;
}

/// Horizontal center of a lane in normalized screen space [-1, 1]
#[inline]
pub fn lane_center_x(lane: u8) -> f32 {
    let last = (consts::LANE_COUNT - 1).max(1) as f32;
    (lane as f32 / last) * 2.0 - 1.0
}
