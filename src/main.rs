//! İstikamet headless runner
//!
//! Plays one seeded round with a simple autopilot at a fixed frame rate and
//! reports lifecycle events and the final score. Useful for balance checks.
//!
//! Example:
//!   cargo run -- 42 --tuning balance.json --scores scores.json

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use istikamet::sim::{
    EntityKind, FixedClock, GameEvent, GamePhase, GameState, Interrupt, Lane, LaneShift, TickInput, tick,
};
use istikamet::snapshot::InterruptView;
use istikamet::{HighScores, QuestionBank, RoundRecord, Snapshot, Tuning};

/// Presentation frame rate the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Chance the autopilot knows the answer to a question
const AUTOPILOT_ACCURACY: f32 = 0.8;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a seeded İstikamet round on autopilot", long_about = None)]
struct Args {
    /// Session seed
    #[arg(default_value_t = 0x1571_4a3e7)]
    seed: u64,
    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Question bank (JSON); the built-in bank otherwise
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Quit the round after this many simulation ticks
    #[arg(long, default_value_t = 20 * 60 * 5)]
    max_ticks: u64,
    /// Leaderboard file, created if missing
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// Pick a lane shift: dodge threats, chase anything else
fn steer(snapshot: &Snapshot, player_depth: f32) -> Option<LaneShift> {
    let lane_score = |lane: u8| -> i32 {
        snapshot
            .entities
            .iter()
            .filter(|e| e.lane == lane)
            .filter(|e| e.depth > player_depth - 0.35 && e.depth < player_depth + 0.05)
            .map(|e| match e.kind {
                kind if kind.is_threat() => -10,
                EntityKind::GateExam => 2,
                _ => 3,
            })
            .sum()
    };

    let current = snapshot.player_lane;
    let best = Lane::all()
        .map(Lane::index)
        .max_by_key(|&lane| (lane_score(lane), -(i32::from(lane) - i32::from(current)).abs()))?;

    match best.cmp(&current) {
        std::cmp::Ordering::Less => Some(LaneShift::Left),
        std::cmp::Ordering::Greater => Some(LaneShift::Right),
        std::cmp::Ordering::Equal => None,
    }
}

/// Decide how to answer the open interrupt
fn resolve_interrupt(state: &GameState, snapshot: &Snapshot, rng: &mut Pcg32, input: &mut TickInput) {
    match &snapshot.interrupt {
        Some(InterruptView::Exam { options, .. }) => {
            let correct = state
                .interrupt
                .as_ref()
                .and_then(|i| match i {
                    Interrupt::Exam(gate) => gate.question,
                    _ => None,
                })
                .and_then(|q| state.questions.get(q))
                .map(|q| q.correct_index);
            input.answer = match correct {
                Some(c) if rng.random::<f32>() < AUTOPILOT_ACCURACY => Some(c),
                _ if !options.is_empty() => Some(rng.random_range(0..options.len())),
                _ => None,
            };
            if input.answer.is_none() {
                input.force_resolve = true;
            }
        }
        Some(InterruptView::MiniCollection { items, .. }) => {
            input.taps = items.iter().filter(|i| i.good).map(|i| i.id).collect();
        }
        None => {}
    }
}

/// Print one tick's events; returns the final score once the round has ended
fn report_events(state: &mut GameState, board: &mut HighScores) -> Option<u64> {
    let mut ended = None;
    for event in state.drain_events() {
        match event {
            e @ GameEvent::Collided { .. } => log::debug!("{e:?}"),
            GameEvent::Ended {
                final_score,
                is_new_high_score,
            } => {
                println!("Round ended: score {final_score} (new high score: {is_new_high_score})");
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as f64)
                    .unwrap_or(0.0);
                match board.record(RoundRecord::from_ended(state, final_score, timestamp)) {
                    Some(rank) => println!("Leaderboard: placed #{rank}"),
                    None => println!("Leaderboard: did not place"),
                }
                ended = Some(final_score);
            }
            other => println!("[tick {}] {other:?}", state.time_ticks),
        }
    }
    ended
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let questions = match &args.questions {
        Some(path) => QuestionBank::load(path)?,
        None => QuestionBank::builtin(),
    };
    let mut board = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::default(),
    };
    log::info!("İstikamet runner starting (seed {})", args.seed);

    let mut clock = FixedClock::new(tuning.sim_dt());
    let mut state =
        GameState::new(args.seed, tuning, questions).with_high_score(board.top_score().unwrap_or(0));
    let mut autopilot_rng = Pcg32::seed_from_u64(args.seed ^ 0x5eed);
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    let mut finished = None;
    while finished.is_none() && clock.ticks() < args.max_ticks {
        for _ in 0..clock.advance(FRAME_DT) {
            tick(&mut state, &input);
            input.clear();
            finished = finished.or(report_events(&mut state, &mut board));

            let snapshot = Snapshot::capture(&state, clock.alpha());
            match state.phase {
                GamePhase::Running => {
                    input.lane_shift = steer(&snapshot, state.tuning.player_depth);
                }
                GamePhase::Suspended => {
                    resolve_interrupt(&state, &snapshot, &mut autopilot_rng, &mut input)
                }
                GamePhase::Idle | GamePhase::Paused => {}
            }
        }
    }

    if finished.is_none() {
        println!("Tick limit reached");
        input.quit = true;
        tick(&mut state, &input);
        report_events(&mut state, &mut board);
    }

    let stats = state.stats;
    println!(
        "Final: score {} | nur {:.0} | fuel {:.0} | hp {} | ticks {} | high score {}",
        stats.score, stats.nur, stats.fuel, stats.hp, state.round_ticks, state.high_score
    );
    match &args.scores {
        Some(path) => {
            board.save(path)?;
            log::info!("Saved leaderboard to {}", path.display());
        }
        None => println!("{}", board.to_json()?),
    }
    Ok(())
}
