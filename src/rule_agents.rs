//! Stochastic rule-based agents.
//!
//! These are the opponents the trained agents model: simple mixtures of
//! "take the winning square", "block the opponent's winning square",
//! and "play anywhere". Each agent exposes the exact same mixture as a
//! successor-state distribution, which is what makes the MDP solvers'
//! opponent models faithful to how these agents actually play.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{GameState, Mark, Status};
use crate::error::TttResult;
use crate::model::{Agent, OpponentModel, TransitionPair};

/// Weight the aggressive and balanced agents put on their preferred
/// tactical move (the rest is spread uniformly).
const TACTICAL_WEIGHT: f64 = 0.8;

/// Weight the defensive agent puts on a blocking move.
const DEFENSIVE_WEIGHT: f64 = 0.5;

// ---------------------------------------------------------------------------
// Tactic helpers
// ---------------------------------------------------------------------------

/// First square that completes a line for `mark`, if any.
pub fn winning_move(state: &GameState, mark: Mark) -> Option<usize> {
    state.legal_moves().into_iter().find(|&mv| {
        state
            .apply(mv, mark)
            .map(|next| next.status() == Status::Won(mark))
            .unwrap_or(false)
    })
}

/// First square that denies the other mark an immediate win, if any.
pub fn blocking_move(state: &GameState, mark: Mark) -> Option<usize> {
    winning_move(state, mark.other())
}

/// Uniformly random legal square. Panics on a full board; the callers
/// only move when the game is in progress.
pub fn random_move(rng: &mut StdRng, state: &GameState) -> usize {
    let moves = state.legal_moves();
    moves[rng.gen_range(0..moves.len())]
}

/// Keep `mv` with odds (odds-1):1, otherwise fall back to a random
/// square. `odds` of 5 keeps the tactical move 80% of the time.
fn move_or_random(rng: &mut StdRng, mv: usize, odds: u32, state: &GameState) -> usize {
    if rng.gen_range(0..odds) == 0 {
        random_move(rng, state)
    } else {
        mv
    }
}

/// Distribution putting `weight` on `preferred` (plus its share of the
/// residual uniform mass) and spreading the rest evenly; plain uniform
/// when there is no preferred move.
pub fn weighted_successors(
    state: &GameState,
    preferred: Option<usize>,
    weight: f64,
) -> Vec<TransitionPair> {
    let mark = state.next_mark();
    let moves = state.legal_moves();
    let residual = match preferred {
        Some(_) => 1.0 - weight,
        None => 1.0,
    };
    let share = residual / moves.len() as f64;

    let mut pairs = Vec::with_capacity(moves.len());
    if let Some(mv) = preferred {
        // Moves come from legal_moves(), so apply cannot fail.
        let next = state.apply(mv, mark).expect("tactical move was legal");
        pairs.push(TransitionPair::new(next, weight + share));
    }
    for mv in moves {
        if Some(mv) != preferred {
            let next = state.apply(mv, mark).expect("legal move rejected");
            pairs.push(TransitionPair::new(next, share));
        }
    }
    pairs
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Plays uniformly at random.
pub struct NaiveAgent {
    rng: StdRng,
}

impl NaiveAgent {
    pub fn new() -> NaiveAgent {
        NaiveAgent {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> NaiveAgent {
        NaiveAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for NaiveAgent {
    fn default() -> Self {
        NaiveAgent::new()
    }
}

impl Agent for NaiveAgent {
    fn initialize(&mut self, _opponent: &dyn OpponentModel) -> TttResult<()> {
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        Ok(random_move(&mut self.rng, state))
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for NaiveAgent {
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        weighted_successors(state, None, 0.0)
    }
}

/// Takes a winning square 80% of the time when one exists, otherwise
/// plays at random.
pub struct AggressiveAgent {
    rng: StdRng,
}

impl AggressiveAgent {
    pub fn new() -> AggressiveAgent {
        AggressiveAgent {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> AggressiveAgent {
        AggressiveAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for AggressiveAgent {
    fn default() -> Self {
        AggressiveAgent::new()
    }
}

impl Agent for AggressiveAgent {
    fn initialize(&mut self, _opponent: &dyn OpponentModel) -> TttResult<()> {
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        match winning_move(state, state.next_mark()) {
            Some(mv) => Ok(move_or_random(&mut self.rng, mv, 5, state)),
            None => Ok(random_move(&mut self.rng, state)),
        }
    }

    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for AggressiveAgent {
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        let preferred = winning_move(state, state.next_mark());
        weighted_successors(state, preferred, TACTICAL_WEIGHT)
    }
}

/// Blocks the opponent's winning square half the time when one exists,
/// otherwise plays at random.
pub struct DefensiveAgent {
    rng: StdRng,
}

impl DefensiveAgent {
    pub fn new() -> DefensiveAgent {
        DefensiveAgent {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> DefensiveAgent {
        DefensiveAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DefensiveAgent {
    fn default() -> Self {
        DefensiveAgent::new()
    }
}

impl Agent for DefensiveAgent {
    fn initialize(&mut self, _opponent: &dyn OpponentModel) -> TttResult<()> {
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        match blocking_move(state, state.next_mark()) {
            Some(mv) => Ok(move_or_random(&mut self.rng, mv, 2, state)),
            None => Ok(random_move(&mut self.rng, state)),
        }
    }

    fn name(&self) -> &'static str {
        "defensive"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for DefensiveAgent {
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        let preferred = blocking_move(state, state.next_mark());
        weighted_successors(state, preferred, DEFENSIVE_WEIGHT)
    }
}

/// Wins if it can, blocks if it must, and otherwise plays at random;
/// the tactical move is kept 80% of the time.
pub struct BalancedAgent {
    rng: StdRng,
}

impl BalancedAgent {
    pub fn new() -> BalancedAgent {
        BalancedAgent {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> BalancedAgent {
        BalancedAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn tactical_move(&self, state: &GameState) -> Option<usize> {
        let mark = state.next_mark();
        winning_move(state, mark).or_else(|| blocking_move(state, mark))
    }
}

impl Default for BalancedAgent {
    fn default() -> Self {
        BalancedAgent::new()
    }
}

impl Agent for BalancedAgent {
    fn initialize(&mut self, _opponent: &dyn OpponentModel) -> TttResult<()> {
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        match self.tactical_move(state) {
            Some(mv) => Ok(move_or_random(&mut self.rng, mv, 5, state)),
            None => Ok(random_move(&mut self.rng, state)),
        }
    }

    fn name(&self) -> &'static str {
        "balanced"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for BalancedAgent {
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        weighted_successors(state, self.tactical_move(state), TACTICAL_WEIGHT)
    }
}
