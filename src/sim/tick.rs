//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Per tick, in
//! order: host commands, then either the open interrupt's timer or the main
//! pipeline (spawn, motion, collision, resources).

use super::collision;
use super::lane::LaneShift;
use super::motion;
use super::resources::{self, RoundEvent, Transition};
use super::round;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a round (from idle)
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    /// End the round and return to the menu
    pub quit: bool,
    pub lane_shift: Option<LaneShift>,
    /// Selected option for an open exam or recovery gate
    pub answer: Option<usize>,
    /// Mini-collection items tapped this tick
    pub taps: Vec<u32>,
    /// Resolve a stuck interrupt
    pub force_resolve: bool,
}

impl TickInput {
    /// Clear one-shot inputs after they have been processed
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    apply_commands(state, input);

    match state.phase {
        GamePhase::Running => run_pipeline(state),
        GamePhase::Suspended => round::step_interrupt(state),
        GamePhase::Idle | GamePhase::Paused => {}
    }
}

fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.quit {
        round::quit_to_menu(state);
    }
    if input.start {
        round::start_round(state);
    }
    if input.pause {
        round::pause(state);
    }
    if input.resume {
        round::resume(state);
    }
    if let Some(shift) = input.lane_shift {
        round::shift_lane(state, shift);
    }

    if state.phase == GamePhase::Suspended {
        for &item_id in &input.taps {
            round::tap(state, item_id);
        }
        if let Some(choice) = input.answer {
            round::answer(state, choice);
        }
        if input.force_resolve {
            round::force_resolve(state);
        }
    }
}

/// Spawn, move, judge and account for one running tick
fn run_pipeline(state: &mut GameState) {
    let dt = state.tuning.sim_dt();
    state.time_ticks += 1;
    state.round_ticks += 1;

    let exam_enabled = !state.questions.is_empty();
    if let Some(order) = state.spawner.step(
        dt,
        state.stats.speed,
        &state.tuning,
        exam_enabled,
        &mut state.rng,
    ) {
        let id = state.spawn_entity(order.kind, order.lane, 0.0);
        log::debug!("Spawned {} #{id} in lane {}", order.kind.as_str(), order.lane.index());
    }

    let discarded = motion::advance(&mut state.entities, dt, state.stats.speed, &state.tuning);
    if discarded > 0 {
        log::trace!("Discarded {discarded} entities past the far edge");
    }

    if let Some(hit) = collision::detect(&mut state.entities, state.player_lane, &state.tuning) {
        log::debug!("Collided with {} #{}", hit.kind.as_str(), hit.id);
        state.emit(GameEvent::Collided {
            id: hit.id,
            kind: hit.kind,
        });
        let (stats, transition) = resources::apply(state.stats, RoundEvent::Collision(hit.kind));
        state.stats = stats;
        if hit.kind.is_threat() {
            log::info!("Hit by {}: hp {}, nur {:.0}", hit.kind.as_str(), stats.hp, stats.nur);
        }
        if transition != Transition::Continue {
            // Gate or failure: the round is suspended, no accrual this tick
            round::handle_transition(state, transition);
            return;
        }
    }

    let fuel_decay = state.tuning.fuel_decay_per_tick;
    let (stats, transition) = resources::apply(state.stats, RoundEvent::Tick { fuel_decay });
    state.stats = stats;
    round::handle_transition(state, transition);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::quiz::QuestionBank;
    use crate::sim::interrupt::{Interrupt, InterruptKind};
    use crate::sim::lane::Lane;
    use crate::sim::state::EntityKind;
    use crate::tuning::Tuning;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// A running state that never spawns on its own
    fn quiet_state(tuning: Tuning) -> GameState {
        let mut tuning = tuning;
        tuning.spawn_interval_secs = 1.0e6;
        let mut state = GameState::new(12345, tuning, QuestionBank::builtin());
        tick(&mut state, &start());
        state.drain_events();
        state
    }

    #[test]
    fn test_tick_idle_to_running() {
        let mut state = GameState::with_defaults(12345);
        assert_eq!(state.phase, GamePhase::Idle);

        // Tick without start - should stay idle
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &start());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.stats.score, 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = quiet_state(Tuning::default());
        state.spawn_entity(EntityKind::Hazard, Lane::LEFT, 0.3);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.stats.speed, 0.0);

        // Nothing moves or decays while paused
        let snapshot = (state.stats, state.entities.clone());
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(snapshot, (state.stats, state.entities.clone()));

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut state, &resume);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.entities[0].depth > 0.3);
    }

    #[test]
    fn test_fuel_pickup_example() {
        let mut state = quiet_state(Tuning::default());
        state.player_lane = Lane::LEFT;
        state.stats.fuel = 80.0;
        let score_before = state.stats.score;
        state.spawn_entity(EntityKind::Fuel, Lane::LEFT, 0.84);

        tick(&mut state, &TickInput::default());
        assert!(state.entities.is_empty());
        // Clamped to 100, then one tick of decay
        assert!((state.stats.fuel - (MAX_FUEL - state.tuning.fuel_decay_per_tick)).abs() < 1e-4);
        assert_eq!(state.stats.combo, 1);
        // +50 for the pickup, +1 for the tick
        assert_eq!(state.stats.score, score_before + 51);
    }

    #[test]
    fn test_hazard_resets_combo() {
        let mut state = quiet_state(Tuning::default());
        state.stats.combo = 12;
        state.spawn_entity(EntityKind::Hazard, state.player_lane, 0.85);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.stats.hp, 2);
        assert_eq!(state.stats.combo, 0);
        assert_eq!(
            state.drain_events()[0],
            GameEvent::Collided {
                id: 1,
                kind: EntityKind::Hazard
            }
        );
    }

    #[test]
    fn test_three_hits_open_one_recovery_gate() {
        let mut state = quiet_state(Tuning::default());
        let lane = state.player_lane;
        state.spawn_entity(EntityKind::Hazard, lane, 0.60);
        state.spawn_entity(EntityKind::Temptation, lane, 0.50);
        state.spawn_entity(EntityKind::Hazard, lane, 0.40);
        state.spawn_entity(EntityKind::Hazard, lane, 0.30);

        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }

        assert_eq!(state.stats.hp, 0);
        assert_eq!(state.phase, GamePhase::Suspended);
        assert_eq!(state.interrupt_kind(), Some(InterruptKind::Recovery));
        let openings = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::InterruptOpened(InterruptKind::Recovery)))
            .count();
        assert_eq!(openings, 1);
        // The fourth hazard is frozen in place
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_fuel_exhaustion_opens_recovery() {
        let mut state = quiet_state(Tuning::default());
        state.stats.fuel = 0.1;
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.interrupt_kind(), Some(InterruptKind::Recovery));
        assert_eq!(state.stats.speed, 0.0);
    }

    #[test]
    fn test_gate_exam_answered_correctly() {
        let mut tuning = Tuning::default();
        tuning.mini_collection_chance = 0.0;
        let mut state = quiet_state(tuning);
        state.stats.nur = 90.0;
        state.stats.fuel = 50.0;
        state.stats.combo = 1;
        state.spawn_entity(EntityKind::GateExam, state.player_lane, 0.85);
        state.spawn_entity(EntityKind::Hazard, Lane::RIGHT, 0.2);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Suspended);
        let score = state.stats.score;
        let fuel = state.stats.fuel;

        // Frozen: no motion, no decay, no spawns
        let depth = state.entities[0].depth;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.entities[0].depth, depth);
        assert_eq!(state.stats.fuel, fuel);

        let correct = match &state.interrupt {
            Some(Interrupt::Exam(gate)) => gate
                .question
                .and_then(|q| state.questions.get(q))
                .map(|q| q.correct_index)
                .expect("question"),
            other => panic!("expected exam, got {other:?}"),
        };
        let input = TickInput {
            answer: Some(correct),
            ..Default::default()
        };
        tick(&mut state, &input);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stats.nur, 100.0);
        // +20 fuel, then one resumed tick of decay
        assert!((state.stats.fuel - (fuel + 20.0 - state.tuning.fuel_decay_per_tick)).abs() < 1e-4);
        // +500 for the exam, +1 for the resumed tick (combo 4 -> no bonus)
        assert_eq!(state.stats.score, score + 501);
        assert_eq!(state.stats.combo, 4);
        assert!(state.entities[0].depth > depth, "simulation resumed ticking");
    }

    #[test]
    fn test_force_resolve_unfreezes() {
        let mut tuning = Tuning::default();
        tuning.mini_collection_chance = 0.0;
        let mut state = quiet_state(tuning);
        state.spawn_entity(EntityKind::GateExam, state.player_lane, 0.85);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Suspended);

        let input = TickInput {
            force_resolve: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_quit_commits_high_score() {
        let mut state = quiet_state(Tuning::default());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let score = state.stats.score;
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.high_score, score);

        tick(&mut state, &start());
        assert_eq!(state.high_score, score);
        assert_eq!(state.stats.score, 1);
    }

    #[test]
    fn test_lane_input() {
        let mut state = quiet_state(Tuning::default());
        let left = TickInput {
            lane_shift: Some(LaneShift::Left),
            ..Default::default()
        };
        tick(&mut state, &left);
        tick(&mut state, &left);
        assert_eq!(state.player_lane, Lane::LEFT);
    }

    #[test]
    fn test_entity_in_player_lane_is_judged() {
        let mut state = quiet_state(Tuning::default());
        let id = state.spawn_entity(EntityKind::Hazard, state.player_lane, 0.0);

        // 3 s crossing at 20 Hz: well past the band after 80 ticks
        let mut hits = 0;
        for _ in 0..80 {
            tick(&mut state, &TickInput::default());
            for event in state.drain_events() {
                if matches!(event, GameEvent::Collided { id: hit, .. } if hit == id) {
                    hits += 1;
                }
            }
        }
        assert_eq!(hits, 1);
        assert_eq!(state.stats.hp, MAX_HP - 1);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_empty_bank_never_spawns_gates() {
        let mut state = GameState::new(2024, Tuning::default(), QuestionBank::default());
        tick(&mut state, &start());

        let mut spawned = 0;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..4000 {
            // Keep the round alive so spawning never stops
            state.stats.hp = MAX_HP;
            state.stats.fuel = MAX_FUEL;
            tick(&mut state, &TickInput::default());

            assert_eq!(state.phase, GamePhase::Running);
            for entity in &state.entities {
                assert_ne!(entity.kind, EntityKind::GateExam);
                if seen.insert(entity.id) {
                    spawned += 1;
                }
            }
            for event in state.drain_events() {
                assert!(
                    !matches!(event, GameEvent::Collided { kind: EntityKind::GateExam, .. }),
                    "gate hit with an empty bank"
                );
                assert!(!matches!(event, GameEvent::InterruptOpened(_)));
            }
        }
        // 200 s of play at roughly one spawn per 0.9 s
        assert!(spawned > 150, "only {spawned} spawns");
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::with_defaults(99999);
        let mut state2 = GameState::with_defaults(99999);

        let mut inputs = vec![start()];
        for i in 0..600 {
            let shift = match i % 40 {
                0 => Some(LaneShift::Left),
                20 => Some(LaneShift::Right),
                _ => None,
            };
            inputs.push(TickInput {
                lane_shift: shift,
                force_resolve: i % 7 == 0,
                ..Default::default()
            });
        }

        for input in &inputs {
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.stats, state2.stats);
        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }

    proptest! {
        #[test]
        fn resources_stay_in_bounds_under_play(seed in any::<u64>(), moves in prop::collection::vec(0u8..4, 1..400)) {
            let mut state = GameState::with_defaults(seed);
            tick(&mut state, &start());
            for m in moves {
                let input = TickInput {
                    lane_shift: match m {
                        0 => Some(LaneShift::Left),
                        1 => Some(LaneShift::Right),
                        _ => None,
                    },
                    answer: (m == 3).then_some(0),
                    force_resolve: m == 2,
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert!((0.0..=MAX_FUEL).contains(&state.stats.fuel));
                prop_assert!((0.0..=MAX_NUR).contains(&state.stats.nur));
                prop_assert!(state.stats.hp <= MAX_HP);
                prop_assert!(state.player_lane.index() < LANE_COUNT);
                prop_assert!(state.entities.windows(2).all(|w| w[0].id < w[1].id));
            }
        }

        #[test]
        fn entities_judged_at_most_once(seed in any::<u64>(), lane in 0u8..3) {
            let mut state = GameState::with_defaults(seed);
            tick(&mut state, &start());
            state.player_lane = Lane::new(lane);
            let mut judged = std::collections::HashSet::new();
            for _ in 0..600 {
                tick(&mut state, &TickInput { force_resolve: true, ..Default::default() });
                for event in state.drain_events() {
                    if let GameEvent::Collided { id, .. } = event {
                        prop_assert!(judged.insert(id), "entity {} judged twice", id);
                    }
                }
                if state.phase == GamePhase::Idle {
                    break;
                }
            }
        }
    }
}
