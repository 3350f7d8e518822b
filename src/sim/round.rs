//! Round lifecycle and interrupt resolution
//!
//! Phases: `Idle -> Running <-> Paused`, with `Running -> Suspended` while an
//! interrupt is open. A resolved interrupt returns to `Running`, except a
//! failed recovery gate, which ends the round and returns to `Idle`.
//!
//! Every function here is a no-op when called in a phase it does not apply to;
//! none of them panic or return errors.

use rand::Rng;

use super::interrupt::{ExamGate, Interrupt, InterruptKind, MiniCollection, Outcome};
use super::lane::LaneShift;
use super::resources::{self, RoundEvent, Transition};
use super::state::{GameEvent, GamePhase, GameState};

/// Start a fresh round from `Idle`
pub fn start_round(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Idle {
        return false;
    }
    state.reset_round();
    state.phase = GamePhase::Running;
    state.stats.speed = state.tuning.run_speed;
    log::info!("Round started (high score {})", state.high_score);
    state.emit(GameEvent::Started);
    true
}

pub fn pause(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    state.phase = GamePhase::Paused;
    state.stats.speed = 0.0;
    state.emit(GameEvent::Paused);
    true
}

pub fn resume(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Paused {
        return false;
    }
    state.phase = GamePhase::Running;
    state.stats.speed = state.tuning.run_speed;
    state.emit(GameEvent::Resumed);
    true
}

/// Abandon the round; scores count exactly as if the round had failed
pub fn quit_to_menu(state: &mut GameState) -> bool {
    if state.phase == GamePhase::Idle {
        return false;
    }
    end_round(state);
    true
}

/// Move the player one lane, only while running
pub fn shift_lane(state: &mut GameState, shift: LaneShift) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    let lane = shift.apply(state.player_lane);
    let moved = lane != state.player_lane;
    state.player_lane = lane;
    moved
}

/// Answer the open exam or recovery gate with an option index
pub fn answer(state: &mut GameState, choice: usize) -> bool {
    let question = match &state.interrupt {
        Some(Interrupt::Exam(gate)) => gate.question,
        _ => return false,
    };
    let passed = question.is_some_and(|q| state.questions.check(q, choice));
    resolve(state, if passed { Outcome::Passed } else { Outcome::Failed });
    true
}

/// Tap a mini-collection item
pub fn tap(state: &mut GameState, item_id: u32) -> bool {
    match &mut state.interrupt {
        Some(Interrupt::MiniCollection(game)) => game.tap(item_id, &state.tuning),
        _ => false,
    }
}

/// Resolve the open interrupt without an answer
///
/// Gates resolve as failed; the mini-collection game keeps what was collected.
pub fn force_resolve(state: &mut GameState) -> bool {
    let outcome = match &state.interrupt {
        Some(Interrupt::Exam(_)) => Outcome::Failed,
        Some(Interrupt::MiniCollection(game)) => Outcome::Collected { score: game.score },
        None => return false,
    };
    log::warn!("Interrupt force-resolved as {outcome:?}");
    resolve(state, outcome);
    true
}

/// Advance the open interrupt's own timer by one tick
pub(crate) fn step_interrupt(state: &mut GameState) {
    let finished = match &mut state.interrupt {
        Some(Interrupt::MiniCollection(game)) => game
            .step(&state.tuning, &mut state.rng)
            .then_some(game.score),
        _ => None,
    };
    if let Some(score) = finished {
        resolve(state, Outcome::Collected { score });
    }
}

/// Act on a transition returned by the resource state machine
pub(crate) fn handle_transition(state: &mut GameState, transition: Transition) {
    match transition {
        Transition::Continue => {}
        Transition::OpenGate => open_gate(state),
        Transition::Failed => fail_round(state),
    }
}

/// A gate was hit: weighted coin flip between the mini-game and an exam
fn open_gate(state: &mut GameState) {
    let draw: f32 = state.rng.random();
    if draw < state.tuning.mini_collection_chance {
        open_mini_collection(state);
    } else {
        open_exam(state, false);
    }
}

pub(crate) fn open_exam(state: &mut GameState, last_chance: bool) {
    let question = state.questions.pick(&mut state.rng);
    suspend(state, Interrupt::Exam(ExamGate { question, last_chance }));
}

pub(crate) fn open_mini_collection(state: &mut GameState) {
    let game = MiniCollection::new(&state.tuning);
    suspend(state, Interrupt::MiniCollection(game));
}

/// HP or fuel ran out: offer the recovery gate
fn fail_round(state: &mut GameState) {
    log::info!(
        "Round failed (hp {}, fuel {:.1}); opening recovery gate",
        state.stats.hp,
        state.stats.fuel
    );
    open_exam(state, true);
    if matches!(&state.interrupt, Some(Interrupt::Exam(gate)) if gate.question.is_none()) {
        log::warn!("No question available for recovery gate; ending round");
        resolve(state, Outcome::Failed);
    }
}

fn suspend(state: &mut GameState, interrupt: Interrupt) {
    let kind = interrupt.kind();
    state.interrupt = Some(interrupt);
    state.phase = GamePhase::Suspended;
    state.stats.speed = 0.0;
    log::info!("Interrupt opened: {kind:?}");
    state.emit(GameEvent::InterruptOpened(kind));
}

/// Close the open interrupt and apply its reward or penalty
fn resolve(state: &mut GameState, outcome: Outcome) {
    let Some(interrupt) = state.interrupt.take() else {
        return;
    };
    let kind = interrupt.kind();
    log::info!("Interrupt resolved: {kind:?} -> {outcome:?}");
    state.emit(GameEvent::InterruptResolved { kind, outcome });

    let event = match (kind, outcome) {
        (InterruptKind::Recovery, Outcome::Passed) => RoundEvent::Recovered,
        (InterruptKind::Recovery, _) => {
            end_round(state);
            return;
        }
        (_, Outcome::Passed) => RoundEvent::ExamPassed,
        (_, Outcome::Failed) => RoundEvent::ExamFailed,
        (_, Outcome::Collected { score }) => RoundEvent::MiniCollected(score),
    };

    state.phase = GamePhase::Running;
    state.stats.speed = state.tuning.run_speed;
    let (stats, _) = resources::apply(state.stats, event);
    state.stats = stats;
}

/// Commit the high score and return to `Idle`; stats stay readable
fn end_round(state: &mut GameState) {
    let final_score = state.stats.score;
    let is_new_high_score = final_score > state.high_score;
    state.high_score = state.high_score.max(final_score);

    state.interrupt = None;
    state.phase = GamePhase::Idle;
    state.stats.speed = 0.0;
    log::info!("Round ended with score {final_score} (new high score: {is_new_high_score})");
    state.emit(GameEvent::Ended {
        final_score,
        is_new_high_score,
    });
}
