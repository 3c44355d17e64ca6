//! Shared substrate for the two dynamic-programming solvers: the reward
//! function, the value/policy tables, and exhaustive enumeration of the
//! reachable state space.
//!
//! The tables are keyed by the base-3 `StateKey`, which keeps them
//! sparse: only the 5,478 positions reachable by alternating legal play
//! get an entry, not all 19,683 cell combinations. During enumeration
//! the value table doubles as the visited set, so shared subtrees
//! reached through different move orders are expanded exactly once.

use std::collections::HashMap;

use crate::board::{GameState, Mark, StateKey, Status};
use crate::error::{TttError, TttResult};
use crate::model::{checked_successors, OpponentModel, TransitionPair};

/// Discount applied to future expected value in Bellman updates.
pub const DISCOUNT: f64 = 0.8;

/// Reward for reaching a non-terminal state. Slightly negative so the
/// agent does not dawdle in lines it cannot win.
pub const REWARD_IN_PROGRESS: f64 = -1.0;
/// Reward for reaching a winning state.
pub const REWARD_WON: f64 = 10.0;
/// Reward for reaching a losing state.
pub const REWARD_LOST: f64 = -10.0;
/// Reward for a tie. Positive: a draw beats a loss, but the +/-10
/// terminal asymmetry still biases play toward decisive wins.
pub const REWARD_TIED: f64 = 1.0;

/// Value assigned to every state at enumeration time.
pub const INITIAL_VALUE: f64 = 0.0;

/// Reward for reaching `state`, seen from `mark`'s side.
pub fn reward(state: &GameState, mark: Mark) -> f64 {
    match state.status() {
        Status::InProgress => REWARD_IN_PROGRESS,
        Status::Won(winner) if winner == mark => REWARD_WON,
        Status::Won(_) => REWARD_LOST,
        Status::Tied => REWARD_TIED,
        Status::Invalid => 0.0,
    }
}

/// Expected-value estimates per reachable state.
///
/// Lookups are fallible: a missing key means the state space was not
/// fully enumerated, which is a solver bug the caller must see rather
/// than a case to paper over with a default.
#[derive(Clone, Debug, Default)]
pub struct ValueTable {
    values: HashMap<StateKey, f64>,
}

impl ValueTable {
    pub fn new() -> ValueTable {
        ValueTable::default()
    }

    pub fn get(&self, key: StateKey) -> TttResult<f64> {
        self.values
            .get(&key)
            .copied()
            .ok_or(TttError::PolicyLookup(key))
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn insert(&mut self, key: StateKey, value: f64) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> Vec<StateKey> {
        self.values.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }
}

/// Chosen move per reachable state; `None` for terminal states, which
/// have no move to make.
#[derive(Clone, Debug, Default)]
pub struct PolicyTable {
    moves: HashMap<StateKey, Option<usize>>,
}

impl PolicyTable {
    pub fn new() -> PolicyTable {
        PolicyTable::default()
    }

    pub fn get(&self, key: StateKey) -> TttResult<Option<usize>> {
        self.moves
            .get(&key)
            .copied()
            .ok_or(TttError::PolicyLookup(key))
    }

    pub fn insert(&mut self, key: StateKey, mv: Option<usize>) {
        self.moves.insert(key, mv);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn keys(&self) -> Vec<StateKey> {
        self.moves.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, Option<usize>)> + '_ {
        self.moves.iter().map(|(&k, &v)| (k, v))
    }
}

/// Expected discounted value of playing `mv` from `state`, judged from
/// `mark`'s side: the immediate reward of the resulting position plus,
/// if play continues, the discounted expectation of `values` over the
/// opponent model's replies. This is the per-move term of the Bellman
/// update, shared by both solvers' updates and improvement passes.
pub fn move_value(
    values: &ValueTable,
    state: &GameState,
    mv: usize,
    mark: Mark,
    opponent: &dyn OpponentModel,
) -> TttResult<f64> {
    let next = state.apply(mv, state.next_mark())?;
    let mut value = reward(&next, mark);
    // A terminal reply leaves no further moves; the expectation term
    // vanishes.
    if !next.status().is_terminal() {
        for TransitionPair { state: successor, probability } in
            checked_successors(opponent, &next)?
        {
            value += DISCOUNT * values.get(successor.key())? * probability;
        }
    }
    Ok(value)
}

/// Seed `values` with every state reachable from `root`.
pub fn seed_value_table(root: &GameState, values: &mut ValueTable) {
    expand(root, values, None);
}

/// Seed both tables with every state reachable from `root`. The policy
/// for each state starts as its first legal move (`None` if terminal).
pub fn seed_tables(root: &GameState, values: &mut ValueTable, policy: &mut PolicyTable) {
    expand(root, values, Some(policy));
}

/// Depth-first expansion of the legal-move tree. The value table is the
/// memo set: a key already present means the whole subtree below it has
/// been expanded through some earlier move order, so the walk stays
/// linear in the reachable-state count instead of exponential in depth.
fn expand(state: &GameState, values: &mut ValueTable, mut policy: Option<&mut PolicyTable>) {
    let key = state.key();
    if values.contains(key) {
        return;
    }

    let terminal = state.status().is_terminal();
    values.insert(key, INITIAL_VALUE);
    if let Some(policy) = policy.as_deref_mut() {
        let seed = if terminal {
            None
        } else {
            state.legal_moves().first().copied()
        };
        policy.insert(key, seed);
    }

    // Terminal states get an entry but no children.
    if terminal {
        return;
    }

    let mark = state.next_mark();
    for mv in state.legal_moves() {
        // Moves come from legal_moves(), so apply cannot fail here.
        let child = state
            .apply(mv, mark)
            .expect("legal move rejected during enumeration");
        expand(&child, values, policy.as_deref_mut());
    }
}
