//! Error types for the fallible edges of the crate.
//!
//! The simulation itself never fails; only loading data from the host
//! (tuning, question banks, leaderboards) can.

use std::io;

/// Main error type for data loading.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, Error>;
