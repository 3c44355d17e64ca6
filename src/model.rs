//! Agent and opponent-model interfaces.
//!
//! The solvers never inspect how an opponent chooses moves; they only
//! consume the weighted successor distribution an `OpponentModel`
//! reports. Probability sums are validated here, at the boundary, so
//! contract violations surface before they corrupt a value sweep.

use crate::board::GameState;
use crate::error::{TttError, TttResult};

/// Tolerance when checking that a transition distribution sums to 1.
const PROBABILITY_EPSILON: f64 = 1e-9;

/// One possible opponent reply: the resulting position and the
/// probability of the opponent choosing it.
#[derive(Clone, Copy, Debug)]
pub struct TransitionPair {
    pub state: GameState,
    pub probability: f64,
}

impl TransitionPair {
    pub fn new(state: GameState, probability: f64) -> TransitionPair {
        TransitionPair { state, probability }
    }
}

/// A stochastic move policy, queried as a distribution over successor
/// states. Implemented by every agent; consumed by the solvers as the
/// transition model of the Markov decision process.
pub trait OpponentModel {
    /// Distribution over the positions reachable by this model's next
    /// move from `state`. Must be non-empty for a non-terminal `state`
    /// and its probabilities must sum to 1.
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair>;
}

/// A playable tic-tac-toe agent.
pub trait Agent: OpponentModel {
    /// Prepare for a match against `opponent`. For the trained agents
    /// this runs enumeration and convergence synchronously; `pick_move`
    /// must not be called before this returns.
    fn initialize(&mut self, opponent: &dyn OpponentModel) -> TttResult<()>;

    /// Choose a square (0-8) to play in `state`.
    fn pick_move(&mut self, state: &GameState) -> TttResult<usize>;

    /// Short display name for match output.
    fn name(&self) -> &'static str;

    /// This agent as a plain opponent model. Implementations return
    /// `self`; the method exists so `Box<dyn Agent>` holders can hand
    /// an agent to another agent's `initialize`.
    fn as_model(&self) -> &dyn OpponentModel;
}

/// Fetch and validate an opponent's successor distribution.
///
/// Solvers go through this function rather than calling the model
/// directly, so a model returning a malformed distribution fails fast
/// with `TransitionProbability` instead of skewing the value tables.
pub fn checked_successors(
    model: &dyn OpponentModel,
    state: &GameState,
) -> TttResult<Vec<TransitionPair>> {
    let pairs = model.successor_states(state);
    let sum: f64 = pairs.iter().map(|p| p.probability).sum();
    if pairs.is_empty() || (sum - 1.0).abs() > PROBABILITY_EPSILON {
        return Err(TttError::TransitionProbability { sum });
    }
    Ok(pairs)
}
