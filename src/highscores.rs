//! Leaderboard of finished rounds
//!
//! `GameState` only remembers a single `high_score`. The board keeps the best
//! rounds across sessions, each tagged with the seed that produced it so the
//! round can be replayed, and is stored as JSON at a path the host picks.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::GameState;

/// Rounds kept on the board
pub const MAX_ENTRIES: usize = 10;

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub score: u64,
    /// Nur held when the round ended
    pub nur: f32,
    /// Running ticks the round lasted
    pub ticks: u64,
    /// Session seed that produced the round
    pub seed: u64,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

impl RoundRecord {
    /// Describe the round that just ended in `state`
    ///
    /// Call on `GameEvent::Ended`, before the next round resets the stats.
    pub fn from_ended(state: &GameState, final_score: u64, timestamp: f64) -> Self {
        Self {
            score: final_score,
            nur: state.stats.nur,
            ticks: state.round_ticks,
            seed: state.seed,
            timestamp,
        }
    }
}

/// Best rounds, highest score first; equal scores keep their arrival order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<RoundRecord>,
}

impl HighScores {
    /// Rank (1-based) a round with this score would take, None if it stays off the board
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let rank = self.entries.partition_point(|e| e.score >= score) + 1;
        (rank <= MAX_ENTRIES).then_some(rank)
    }

    /// Insert a finished round; returns its rank if it made the board
    pub fn record(&mut self, round: RoundRecord) -> Option<usize> {
        let rank = self.potential_rank(round.score)?;
        log::info!("Round with score {} (seed {}) placed #{rank}", round.score, round.seed);
        self.entries.insert(rank - 1, round);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    /// Score to seed `GameState::with_high_score` with
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut board: HighScores = serde_json::from_str(json)?;
        // Stored boards may have been edited by hand
        board.entries.retain(|e| e.score > 0);
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(MAX_ENTRIES);
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load the board from `path`; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let board = Self::from_json(&json)?;
                log::info!("Loaded {} leaderboard entries from {}", board.entries.len(), path.display());
                Ok(board)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No leaderboard at {}; starting a new one", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, TickInput, tick};

    fn round(score: u64, seed: u64) -> RoundRecord {
        RoundRecord {
            score,
            nur: 50.0,
            ticks: 100,
            seed,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_zero_never_ranks() {
        let mut board = HighScores::default();
        assert_eq!(board.potential_rank(0), None);
        assert_eq!(board.record(round(0, 1)), None);
        assert_eq!(board.top_score(), None);
    }

    #[test]
    fn test_ranks_and_ties() {
        let mut board = HighScores::default();
        assert_eq!(board.record(round(100, 1)), Some(1));
        assert_eq!(board.record(round(300, 2)), Some(1));
        assert_eq!(board.record(round(200, 3)), Some(2));
        // An equal score ranks behind the round that got there first
        assert_eq!(board.potential_rank(200), Some(3));
        assert_eq!(board.record(round(200, 4)), Some(3));

        let seeds: Vec<u64> = board.entries.iter().map(|e| e.seed).collect();
        assert_eq!(seeds, vec![2, 3, 4, 1]);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = HighScores::default();
        for s in 1..=MAX_ENTRIES as u64 {
            board.record(round(s * 10, s));
        }
        assert_eq!(board.potential_rank(10), None, "ties with the last entry stay off");
        assert_eq!(board.record(round(5, 0)), None);
        assert_eq!(board.record(round(1000, 0)), Some(1));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_json_sorts_and_drops_zero() {
        let json = r#"{ "entries": [
            { "score": 5, "nur": 1.0, "ticks": 10, "seed": 1, "timestamp": 0.0 },
            { "score": 0, "nur": 1.0, "ticks": 10, "seed": 2, "timestamp": 0.0 },
            { "score": 50, "nur": 2.0, "ticks": 10, "seed": 3, "timestamp": 0.0 }
        ] }"#;
        let board = HighScores::from_json(json).expect("valid json");
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.top_score(), Some(50));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join("istikamet-no-such-board.json");
        let _ = std::fs::remove_file(&path);
        let board = HighScores::load(&path).expect("missing file is not an error");
        assert!(board.entries.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("istikamet-board-{}.json", std::process::id()));
        let mut board = HighScores::default();
        board.record(round(70, 7));
        board.record(round(90, 9));
        board.save(&path).expect("writable temp dir");

        let loaded = HighScores::load(&path).expect("saved board loads");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.entries, board.entries);
    }

    #[test]
    fn test_records_ended_round() {
        let mut state = GameState::with_defaults(31);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start);
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);

        let mut board = HighScores::default();
        for event in state.drain_events() {
            if let GameEvent::Ended { final_score, .. } = event {
                let rank = board.record(RoundRecord::from_ended(&state, final_score, 1.0));
                assert_eq!(rank, Some(1));
            }
        }
        let entry = &board.entries[0];
        assert_eq!(entry.score, state.high_score);
        assert_eq!(entry.seed, 31);
        assert_eq!(entry.ticks, state.round_ticks);
        assert!(entry.ticks > 0);
    }
}
