//! Discrete lanes shared by the player and entities

use serde::{Deserialize, Serialize};

use crate::consts::{LANE_COUNT, START_LANE};

/// One of `LANE_COUNT` parallel tracks, always in bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const CENTER: Lane = Lane(START_LANE);
    pub const RIGHT: Lane = Lane(LANE_COUNT - 1);

    /// Build a lane, clamping out-of-range indices to the nearest edge
    pub fn new(index: u8) -> Self {
        Lane(index.min(LANE_COUNT - 1))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// All lanes, left to right
    pub fn all() -> impl Iterator<Item = Lane> {
        (0..LANE_COUNT).map(Lane)
    }

    /// One lane to the left, or unchanged at the edge
    pub fn shifted_left(self) -> Self {
        Lane(self.0.saturating_sub(1))
    }

    /// One lane to the right, or unchanged at the edge
    pub fn shifted_right(self) -> Self {
        Lane::new(self.0.saturating_add(1))
    }
}

impl Default for Lane {
    fn default() -> Self {
        Lane::CENTER
    }
}

/// Lateral command from the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneShift {
    Left,
    Right,
}

impl LaneShift {
    pub fn apply(self, lane: Lane) -> Lane {
        match self {
            LaneShift::Left => lane.shifted_left(),
            LaneShift::Right => lane.shifted_right(),
        }
    }
}
