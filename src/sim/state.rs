//! Game state and core simulation types
//!
//! `GameState` is the single writer of round stats and the live-entity set.
//! It is mutated only from `tick` and from the round controller functions the
//! host calls between ticks.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::interrupt::{Interrupt, InterruptKind, Outcome};
use super::lane::Lane;
use super::spawner::Spawner;
use crate::consts::*;
use crate::quiz::QuestionBank;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round in progress (initial, and after a round ends)
    Idle,
    /// Active gameplay
    Running,
    /// Paused by the player
    Paused,
    /// Frozen while an interrupt (exam, mini-game or recovery gate) is open
    Suspended,
}

/// Entity categories, rarest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Opens an exam or mini-collection interrupt
    GateExam,
    /// Heals, refuels and scores
    Blessing,
    Fuel,
    Nur,
    /// Costs a hit point
    Hazard,
    /// Costs a hit point and nur
    Temptation,
}

impl EntityKind {
    /// All categories in spawn band order (rarest first)
    pub const BY_RARITY: [EntityKind; 6] = [
        EntityKind::GateExam,
        EntityKind::Blessing,
        EntityKind::Fuel,
        EntityKind::Nur,
        EntityKind::Hazard,
        EntityKind::Temptation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::GateExam => "gate-exam",
            EntityKind::Blessing => "resource-blessing",
            EntityKind::Fuel => "resource-fuel",
            EntityKind::Nur => "resource-nur",
            EntityKind::Hazard => "threat-hazard",
            EntityKind::Temptation => "threat-temptation",
        }
    }

    /// Hazards and temptations: hitting one costs a hit point
    pub fn is_threat(&self) -> bool {
        matches!(self, EntityKind::Hazard | EntityKind::Temptation)
    }
}

/// An obstacle, collectible or gate travelling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: Lane,
    /// Distance travelled from spawn (0) toward the far edge
    pub depth: f32,
    /// Depth at the previous tick, for visual interpolation only
    pub prev_depth: f32,
    /// Simulation tick the entity was spawned on
    pub spawned_at: u64,
}

/// Resources and score for the current (or last) round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub score: u64,
    pub combo: u32,
    /// 0..=100
    pub fuel: f32,
    /// 0..=100
    pub nur: f32,
    /// 0..=3
    pub hp: u8,
    /// 0 unless running
    pub speed: f32,
}

impl Default for RoundStats {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 0,
            fuel: START_FUEL,
            nur: START_NUR,
            hp: START_HP,
            speed: 0.0,
        }
    }
}

/// Lifecycle and gameplay events for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Collided { id: u32, kind: EntityKind },
    InterruptOpened(InterruptKind),
    InterruptResolved { kind: InterruptKind, outcome: Outcome },
    Ended { final_score: u64, is_new_high_score: bool },
}

/// Complete simulation state for one player session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub questions: QuestionBank,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub stats: RoundStats,
    pub player_lane: Lane,
    /// Live entities (ascending id, so oldest first)
    pub entities: Vec<Entity>,
    pub interrupt: Option<Interrupt>,
    /// Best final score this session; seeded by the host
    pub high_score: u64,
    /// Simulation ticks run while `Running`, across all rounds
    pub time_ticks: u64,
    /// Running ticks in the current round
    pub round_ticks: u64,
    pub(crate) spawner: Spawner,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given seed, balance and question bank
    pub fn new(seed: u64, tuning: Tuning, questions: QuestionBank) -> Self {
        if questions.is_empty() {
            log::warn!("Question bank is empty; exam gates are disabled");
        }
        Self {
            seed,
            tuning,
            questions,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            stats: RoundStats::default(),
            player_lane: Lane::default(),
            entities: Vec::new(),
            interrupt: None,
            high_score: 0,
            time_ticks: 0,
            round_ticks: 0,
            spawner: Spawner::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Default balance with the built-in question bank
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), QuestionBank::builtin())
    }

    /// Restore a high score persisted by the host
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a new entity at the given depth
    pub fn spawn_entity(&mut self, kind: EntityKind, lane: Lane, depth: f32) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            kind,
            lane,
            depth,
            prev_depth: depth,
            spawned_at: self.time_ticks,
        });
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Kind of the open interrupt, if any
    pub fn interrupt_kind(&self) -> Option<InterruptKind> {
        self.interrupt.as_ref().map(Interrupt::kind)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset per-round state to round-start defaults (keeps high score and RNG)
    pub(crate) fn reset_round(&mut self) {
        self.stats = RoundStats::default();
        self.player_lane = Lane::default();
        self.entities.clear();
        self.interrupt = None;
        self.round_ticks = 0;
        self.spawner = Spawner::default();
    }
}
