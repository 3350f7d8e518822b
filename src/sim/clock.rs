//! Fixed-step tick source
//!
//! Converts variable wall-clock frame times into a whole number of fixed
//! simulation ticks. Collision truth is computed per tick, never per frame, so
//! outcomes do not depend on display frame rate.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

#[derive(Debug, Clone)]
pub struct FixedClock {
    /// Fixed simulation timestep (seconds)
    dt: f32,
    accumulator: f32,
    /// Ticks emitted since creation
    ticks: u64,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Feed elapsed frame time, returning how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        // Drop any backlog the substep cap could not drain
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.dt {
            self.accumulator %= self.dt;
        }

        self.ticks += u64::from(substeps);
        substeps
    }

    /// Fraction of a tick elapsed since the last one, for visual interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    /// Forget partial progress (e.g. after the host resumes from background)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
