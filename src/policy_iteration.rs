//! Policy-iteration agent.
//!
//! A variant of the value-iteration learner that keeps an explicit
//! action table. Training alternates two phases: evaluation, which
//! propagates values to a fixed point while holding the current policy
//! fixed, and improvement, which greedily re-picks each state's action
//! under the new values. The loop stops when an improvement pass
//! changes nothing, which typically happens well before the value table
//! itself would have fully converged under plain value iteration.
//!
//! After training, move selection is a single policy-table lookup.

use crate::board::{GameState, Mark};
use crate::error::{TttError, TttResult};
use crate::mdp::{move_value, reward, seed_tables, PolicyTable, ValueTable};
use crate::model::{checked_successors, Agent, OpponentModel, TransitionPair};

/// Cap on outer evaluation/improvement iterations.
const MAX_ITERATIONS: usize = 25;

/// Safety bound on evaluation sweeps within one iteration.
const MAX_EVAL_SWEEPS: usize = 16;

pub struct PolicyIterationAgent {
    mark: Mark,
    values: ValueTable,
    policy: PolicyTable,
    trained: bool,
}

impl PolicyIterationAgent {
    pub fn new(mark: Mark) -> PolicyIterationAgent {
        PolicyIterationAgent {
            mark,
            values: ValueTable::new(),
            policy: PolicyTable::new(),
            trained: false,
        }
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Value of one state under the fixed current policy.
    ///
    /// Terminal states are pinned to their reward. States where the
    /// opponent moves take the expectation under its transition model
    /// rather than a policy move, so the value of a position reached by
    /// one of our moves reflects what the opponent will actually do.
    fn policy_value(
        &self,
        state: &GameState,
        opponent: &dyn OpponentModel,
    ) -> TttResult<f64> {
        if state.status().is_terminal() {
            return Ok(reward(state, self.mark));
        }
        if state.next_mark() != self.mark {
            let mut expected = 0.0;
            for TransitionPair { state: successor, probability } in
                checked_successors(opponent, state)?
            {
                expected += self.values.get(successor.key())? * probability;
            }
            return Ok(expected);
        }
        match self.policy.get(state.key())? {
            Some(mv) => move_value(&self.values, state, mv, self.mark, opponent),
            // A non-terminal state always carries a policy move; an
            // empty entry can only mean the tables were corrupted.
            None => Err(TttError::PolicyLookup(state.key())),
        }
    }

    /// Evaluation phase: sweep values under the fixed policy until the
    /// largest per-sweep change is zero. As in value iteration, each
    /// sweep is computed against the previous sweep's values and
    /// applied as a whole, so the result does not depend on table
    /// iteration order.
    fn evaluate_policy(&mut self, opponent: &dyn OpponentModel) -> TttResult<()> {
        for _ in 0..MAX_EVAL_SWEEPS {
            let mut delta: f64 = 0.0;
            let mut updates = Vec::with_capacity(self.values.len());
            for key in self.values.keys() {
                let old = self.values.get(key)?;
                let new = self.policy_value(&key.decode(), opponent)?;
                delta = delta.max((old - new).abs());
                updates.push((key, new));
            }
            for (key, new) in updates {
                self.values.insert(key, new);
            }
            if delta == 0.0 {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Improvement phase: greedily re-pick the action for every
    /// non-terminal state where this agent moves. Returns whether any
    /// policy entry changed. Opponent-turn states keep their seed
    /// entry; their values come from the opponent model, not from a
    /// policy of ours.
    fn improve_policy(&mut self, opponent: &dyn OpponentModel) -> TttResult<bool> {
        let mut changed = false;
        for key in self.policy.keys() {
            let state = key.decode();
            if state.status().is_terminal() || state.next_mark() != self.mark {
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for mv in state.legal_moves() {
                let value = move_value(&self.values, &state, mv, self.mark, opponent)?;
                if best.map_or(true, |(_, v)| value > v) {
                    best = Some((mv, value));
                }
            }

            let old = self.policy.get(key)?;
            let new = best.map(|(mv, _)| mv);
            if new != old {
                self.policy.insert(key, new);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// One evaluation-to-fixed-point plus improvement pass. Returns
    /// whether the improvement changed any policy entry; once this
    /// reports `false`, further passes leave both tables untouched.
    pub fn refine_pass(&mut self, opponent: &dyn OpponentModel) -> TttResult<bool> {
        self.evaluate_policy(opponent)?;
        self.improve_policy(opponent)
    }
}

impl Agent for PolicyIterationAgent {
    /// Enumerate the state space, then alternate evaluation and
    /// improvement until the policy is stable or the iteration cap is
    /// reached.
    fn initialize(&mut self, opponent: &dyn OpponentModel) -> TttResult<()> {
        self.values = ValueTable::new();
        self.policy = PolicyTable::new();
        self.trained = false;
        seed_tables(&GameState::empty(), &mut self.values, &mut self.policy);

        for _ in 0..MAX_ITERATIONS {
            if !self.refine_pass(opponent)? {
                break;
            }
        }

        self.trained = true;
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        if !self.trained {
            return Err(TttError::NotTrained);
        }
        self.policy.get(state.key())?.ok_or(TttError::InvalidMove {
            mv: 0,
            reason: "no legal moves in terminal state",
        })
    }

    fn name(&self) -> &'static str {
        "policy iteration"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for PolicyIterationAgent {
    /// A trained policy agent always plays its table move, so the
    /// distribution is that single successor with probability 1.
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        if !self.trained {
            return Vec::new();
        }
        let next = self
            .policy
            .get(state.key())
            .ok()
            .flatten()
            .and_then(|mv| state.apply(mv, state.next_mark()).ok());
        match next {
            Some(next) => vec![TransitionPair::new(next, 1.0)],
            None => Vec::new(),
        }
    }
}
