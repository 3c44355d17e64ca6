use thiserror::Error;

use crate::board::StateKey;

#[derive(Error, Debug)]
pub enum TttError {
    #[error("Invalid move {mv}: {reason}")]
    InvalidMove { mv: usize, reason: &'static str },

    #[error("No table entry for state key {0}: state space was not fully enumerated")]
    PolicyLookup(StateKey),

    #[error("Opponent transition probabilities sum to {sum}, expected 1.0")]
    TransitionProbability { sum: f64 },

    #[error("Agent queried before initialize() completed training")]
    NotTrained,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TttResult<T> = Result<T, TttError>;
