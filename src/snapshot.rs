//! Read-only view of the simulation for the presentation layer
//!
//! Captured once per tick (or per frame with a fresh `alpha`). Visual
//! positions are interpolated between the previous and current tick and are
//! never fed back into the simulation; collision truth is `depth`.

use glam::Vec2;
use serde::Serialize;

use crate::lane_center_x;
use crate::sim::interrupt::{Interrupt, InterruptKind, MiniItem};
use crate::sim::state::{EntityKind, GamePhase, GameState, RoundStats};

/// An entity as the renderer should place it
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: u8,
    /// Simulation depth (authoritative)
    pub depth: f32,
    /// x: lane center in [-1, 1], y: interpolated depth
    pub visual: Vec2,
}

/// What the host needs to draw the open interrupt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InterruptView {
    Exam {
        last_chance: bool,
        text: Option<String>,
        options: Vec<String>,
    },
    MiniCollection {
        remaining_secs: f32,
        score: u32,
        items: Vec<MiniItem>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub stats: RoundStats,
    pub player_lane: u8,
    pub high_score: u64,
    pub entities: Vec<EntityView>,
    pub interrupt: Option<InterruptView>,
}

impl Snapshot {
    /// Capture the current state; `alpha` is the fraction of a tick since the last one
    pub fn capture(state: &GameState, alpha: f32) -> Self {
        // Nothing moves between ticks unless the round is running
        let alpha = if state.is_running() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };

        let entities = state
            .entities
            .iter()
            .map(|e| {
                let y = e.prev_depth + (e.depth - e.prev_depth) * alpha;
                EntityView {
                    id: e.id,
                    kind: e.kind,
                    lane: e.lane.index(),
                    depth: e.depth,
                    visual: Vec2::new(lane_center_x(e.lane.index()), y),
                }
            })
            .collect();

        let interrupt = state.interrupt.as_ref().map(|interrupt| match interrupt {
            Interrupt::Exam(gate) => {
                let question = gate.question.and_then(|q| state.questions.get(q));
                InterruptView::Exam {
                    last_chance: interrupt.kind() == InterruptKind::Recovery,
                    text: question.map(|q| q.text.clone()),
                    options: question.map(|q| q.options.clone()).unwrap_or_default(),
                }
            }
            Interrupt::MiniCollection(game) => InterruptView::MiniCollection {
                remaining_secs: game.remaining_ticks as f32 * state.tuning.sim_dt(),
                score: game.score,
                items: game.items.clone(),
            },
        });

        Self {
            phase: state.phase,
            stats: state.stats,
            player_lane: state.player_lane.index(),
            high_score: state.high_score,
            entities,
            interrupt,
        }
    }

    /// Serialize for a host that consumes JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
