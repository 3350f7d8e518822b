//! Interrupts that suspend the main simulation
//!
//! An exam gate waits for an answer (or a forced resolution) with no timeout.
//! The recovery gate is an exam gate flagged as last chance. The
//! mini-collection game runs on its own fixed timer and resolves with whatever
//! sub-score was collected when it runs out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lane::Lane;
use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;

/// Which interrupt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptKind {
    Exam,
    MiniCollection,
    Recovery,
}

/// How an interrupt resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Passed,
    Failed,
    Collected { score: u32 },
}

/// A multiple-choice gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamGate {
    /// Index into the question bank; None if the bank had nothing to offer
    pub question: Option<usize>,
    /// Recovery gate: passing resumes the round, failing ends it
    pub last_chance: bool,
}

/// Something to tap (or leave alone) in the mini-collection game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniItem {
    pub id: u32,
    /// Collectible if true, a trap otherwise
    pub good: bool,
    pub lane: Lane,
    pub ttl_ticks: u32,
}

/// Timed tap-to-collect game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniCollection {
    pub remaining_ticks: u32,
    pub score: u32,
    pub items: Vec<MiniItem>,
    spawn_timer: u32,
    next_id: u32,
}

impl MiniCollection {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            remaining_ticks: tuning.secs_to_ticks(tuning.mini_collection_secs),
            score: 0,
            items: Vec::new(),
            spawn_timer: 0,
            next_id: 1,
        }
    }

    /// Advance one tick; returns true once the game's time is up
    pub fn step<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) -> bool {
        if self.is_finished() {
            return true;
        }
        self.remaining_ticks -= 1;

        for item in self.items.iter_mut() {
            item.ttl_ticks = item.ttl_ticks.saturating_sub(1);
        }
        self.items.retain(|i| i.ttl_ticks > 0);

        if self.spawn_timer == 0 {
            let good = rng.random::<f32>() < tuning.mini_good_chance;
            let lane = Lane::new(rng.random_range(0..LANE_COUNT));
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(MiniItem {
                id,
                good,
                lane,
                ttl_ticks: tuning.secs_to_ticks(tuning.mini_item_ttl_secs),
            });
            self.spawn_timer = tuning.secs_to_ticks(tuning.mini_item_interval_secs);
        }
        self.spawn_timer -= 1;

        self.is_finished()
    }

    /// Tap an item: collectibles add points, traps subtract. Unknown ids are ignored.
    pub fn tap(&mut self, item_id: u32, tuning: &Tuning) -> bool {
        let Some(index) = self.items.iter().position(|i| i.id == item_id) else {
            return false;
        };
        let item = self.items.remove(index);
        if item.good {
            self.score += tuning.mini_good_points;
        } else {
            self.score = self.score.saturating_sub(tuning.mini_trap_penalty);
        }
        true
    }

    /// Time is up; the game resolves with whatever was collected
    pub fn is_finished(&self) -> bool {
        self.remaining_ticks == 0
    }
}

/// The open interrupt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    Exam(ExamGate),
    MiniCollection(MiniCollection),
}

impl Interrupt {
    pub fn kind(&self) -> InterruptKind {
        match self {
            Interrupt::Exam(gate) if gate.last_chance => InterruptKind::Recovery,
            Interrupt::Exam(_) => InterruptKind::Exam,
            Interrupt::MiniCollection(_) => InterruptKind::MiniCollection,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_kinds() {
        let exam = Interrupt::Exam(ExamGate {
            question: Some(0),
            last_chance: false,
        });
        let recovery = Interrupt::Exam(ExamGate {
            question: Some(0),
            last_chance: true,
        });
        let mini = Interrupt::MiniCollection(MiniCollection::new(&Tuning::default()));
        assert_eq!(exam.kind(), InterruptKind::Exam);
        assert_eq!(recovery.kind(), InterruptKind::Recovery);
        assert_eq!(mini.kind(), InterruptKind::MiniCollection);
    }

    #[test]
    fn test_mini_game_runs_for_fixed_duration() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut game = MiniCollection::new(&tuning);
        let total = game.remaining_ticks;
        assert_eq!(total, 200);

        let mut finished_at = None;
        for i in 1..=total + 10 {
            if game.step(&tuning, &mut rng) {
                finished_at = Some(i);
                break;
            }
        }
        assert_eq!(finished_at, Some(total));
        assert!(game.is_finished());

        // A finished game stays finished and no longer spawns
        let items = game.items.clone();
        assert!(game.step(&tuning, &mut rng));
        assert_eq!(game.items, items);
        assert_eq!(game.remaining_ticks, 0);
    }

    #[test]
    fn test_items_spawn_and_expire() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut game = MiniCollection::new(&tuning);

        game.step(&tuning, &mut rng);
        assert_eq!(game.items.len(), 1);
        let first = game.items[0].id;

        // ttl is 30 ticks at 20 Hz
        for _ in 0..30 {
            game.step(&tuning, &mut rng);
        }
        assert!(game.items.iter().all(|i| i.id != first));
        assert!(!game.items.is_empty());
    }

    #[test]
    fn test_tap_scoring() {
        let tuning = Tuning::default();
        let mut game = MiniCollection::new(&tuning);
        game.items = vec![
            MiniItem {
                id: 1,
                good: true,
                lane: Lane::LEFT,
                ttl_ticks: 10,
            },
            MiniItem {
                id: 2,
                good: true,
                lane: Lane::CENTER,
                ttl_ticks: 10,
            },
            MiniItem {
                id: 3,
                good: false,
                lane: Lane::RIGHT,
                ttl_ticks: 10,
            },
        ];

        assert!(game.tap(1, &tuning));
        assert_eq!(game.score, 10);
        assert!(!game.tap(1, &tuning), "an item can only be tapped once");
        assert!(game.tap(3, &tuning));
        assert_eq!(game.score, 0, "trap penalty floors at zero");
        assert!(game.tap(2, &tuning));
        assert_eq!(game.score, 10);
        assert!(!game.tap(99, &tuning));
        assert!(game.items.is_empty());
    }
}
