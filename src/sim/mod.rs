//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod interrupt;
pub mod lane;
pub mod motion;
pub mod resources;
pub mod round;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::FixedClock;
pub use collision::{detect, in_collision_band};
pub use interrupt::{ExamGate, Interrupt, InterruptKind, MiniCollection, MiniItem, Outcome};
pub use lane::{Lane, LaneShift};
pub use resources::{RoundEvent, Transition};
pub use round::{answer, force_resolve, pause, quit_to_menu, resume, shift_lane, start_round, tap};
pub use spawner::{Spawner, kind_for_draw};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, RoundStats};
pub use tick::{TickInput, tick};
