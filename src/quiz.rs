//! Question bank for exam and recovery gates
//!
//! The bank is content, not logic: the simulation only asks it for a random
//! question and whether a chosen option was correct. Records that cannot be
//! answered are dropped on load, and an empty bank disables exam gates.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    pub fn new(text: impl Into<String>, options: &[&str], correct_index: usize) -> Self {
        Self {
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
        }
    }

    /// A question is usable only if it has text and its answer points at an option
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.correct_index < self.options.len()
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}

/// Swappable list of questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, dropping records that cannot be answered
    pub fn new(questions: Vec<Question>) -> Self {
        let before = questions.len();
        let questions: Vec<Question> = questions.into_iter().filter(Question::is_valid).collect();
        if questions.len() < before {
            log::warn!(
                "Dropped {} malformed question(s) from bank",
                before - questions.len()
            );
        }
        Self { questions }
    }

    /// Parse a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(Self::new(questions))
    }

    /// Load a bank from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bank = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// A small built-in bank so the game is playable without host content
    pub fn builtin() -> Self {
        Self::new(vec![
            Question::new("How many daily prayers are there?", &["3", "5", "7", "4"], 1),
            Question::new(
                "Which month is the month of fasting?",
                &["Shawwal", "Muharram", "Ramadan", "Rajab"],
                2,
            ),
            Question::new("How many pillars of Islam are there?", &["5", "6", "4", "3"], 0),
            Question::new(
                "What is the first surah of the Quran?",
                &["Al-Baqarah", "Al-Ikhlas", "Yasin", "Al-Fatiha"],
                3,
            ),
            Question::new(
                "What is the word for repentance?",
                &["Tevbe", "Sabr", "Shukr", "Niyyah"],
                0,
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Pick a random question index (None for an empty bank)
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.questions.is_empty() {
            None
        } else {
            Some(rng.random_range(0..self.questions.len()))
        }
    }

    /// Whether `choice` answers question `index` correctly; unknown questions never pass
    pub fn check(&self, index: usize, choice: usize) -> bool {
        self.get(index).is_some_and(|q| q.is_correct(choice))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_builtin_is_usable() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.len(), 5);
        assert!(bank.check(0, 1));
        assert!(!bank.check(0, 0));
    }

    #[test]
    fn test_drops_malformed_records() {
        let json = r#"[
            { "text": "ok", "options": ["a", "b"], "correct_index": 1 },
            { "text": "no options", "options": [], "correct_index": 0 },
            { "text": "out of range", "options": ["a"], "correct_index": 3 },
            { "text": "  ", "options": ["a"], "correct_index": 0 }
        ]"#;
        let bank = QuestionBank::from_json(json).expect("valid json");
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).map(|q| q.text.as_str()), Some("ok"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(QuestionBank::from_json("not json").is_err());
    }

    #[test]
    fn test_pick_and_check_on_empty_bank() {
        let bank = QuestionBank::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(bank.pick(&mut rng), None);
        assert!(!bank.check(0, 0));
    }

    #[test]
    fn test_pick_in_range() {
        let bank = QuestionBank::builtin();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let index = bank.pick(&mut rng).expect("non-empty bank");
            assert!(index < bank.len());
        }
    }
}
