//! Value-iteration agent.
//!
//! An offline, model-based learner: at initialization it enumerates the
//! full reachable state space, then repeatedly applies the Bellman
//! optimality update to every entry until no value changes. The state
//! graph is finite and acyclic (turn counts strictly increase), so with
//! a fixed opponent model the sweep reaches an exact fixed point in at
//! most a handful of passes.
//!
//! The agent maximizes expected discounted reward against the modeled
//! opponent; against a stochastic opponent that is not the same thing
//! as perfect play, and the occasional lost game is expected.

use crate::board::{GameState, Mark};
use crate::error::{TttError, TttResult};
use crate::mdp::{move_value, reward, seed_value_table, ValueTable, DISCOUNT};
use crate::model::{checked_successors, Agent, OpponentModel, TransitionPair};

/// Safety bound on convergence sweeps. Values stabilize from the
/// terminal states upward, so the game depth of 9 bounds the number of
/// productive sweeps; this cap only guards against a broken update.
const MAX_SWEEPS: usize = 16;

/// Per-training convergence record: the maximum absolute value change
/// observed in each sweep, in order. Non-increasing by the contraction
/// property of the discounted update.
#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub sweeps: usize,
    pub deltas: Vec<f64>,
}

pub struct ValueIterationAgent {
    mark: Mark,
    values: ValueTable,
    report: Option<TrainingReport>,
}

impl ValueIterationAgent {
    pub fn new(mark: Mark) -> ValueIterationAgent {
        ValueIterationAgent {
            mark,
            values: ValueTable::new(),
            report: None,
        }
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Converged value estimates. Meaningful only after `initialize`.
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Convergence record from the last training run.
    pub fn report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.report.is_some()
    }

    /// One full Bellman sweep over the table. All updates are computed
    /// against the previous sweep's values and applied together, which
    /// keeps the result independent of table iteration order and the
    /// per-sweep deltas monotone. Returns the largest absolute change.
    fn sweep(&mut self, opponent: &dyn OpponentModel) -> TttResult<f64> {
        let mut delta: f64 = 0.0;
        let mut updates = Vec::with_capacity(self.values.len());
        for key in self.values.keys() {
            let old = self.values.get(key)?;
            let new = self.updated_value(&key.decode(), opponent)?;
            delta = delta.max((old - new).abs());
            updates.push((key, new));
        }
        for (key, new) in updates {
            self.values.insert(key, new);
        }
        Ok(delta)
    }

    /// Bellman update for one state.
    ///
    /// States where this agent moves take the best move value; states
    /// where the opponent moves take the expectation under its
    /// transition model. Keeping the two cases distinct is what makes
    /// the stored value of a position after one of our moves equal the
    /// true expected continuation, so `pick_move`'s one-step lookahead
    /// sees opponent threats instead of assuming a cooperative reply.
    fn updated_value(
        &self,
        state: &GameState,
        opponent: &dyn OpponentModel,
    ) -> TttResult<f64> {
        // Terminal values are pinned to their reward.
        if state.status().is_terminal() {
            return Ok(reward(state, self.mark));
        }

        if state.next_mark() == self.mark {
            let mut best = f64::NEG_INFINITY;
            for mv in state.legal_moves() {
                best = best.max(move_value(&self.values, state, mv, self.mark, opponent)?);
            }
            Ok(best)
        } else {
            let mut expected = 0.0;
            for TransitionPair { state: successor, probability } in
                checked_successors(opponent, state)?
            {
                expected += self.values.get(successor.key())? * probability;
            }
            Ok(expected)
        }
    }

    /// One-step lookahead value of playing `mv` from `state`.
    fn lookahead(&self, state: &GameState, mv: usize) -> TttResult<f64> {
        let next = state.apply(mv, state.next_mark())?;
        Ok(reward(&next, self.mark) + DISCOUNT * self.values.get(next.key())?)
    }

    /// Greedy move under the converged values, shared by `pick_move`
    /// and the opponent-model view of this agent.
    fn greedy_move(&self, state: &GameState) -> TttResult<usize> {
        let mut best: Option<(usize, f64)> = None;
        for mv in state.legal_moves() {
            let value = self.lookahead(state, mv)?;
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((mv, value));
            }
        }
        best.map(|(mv, _)| mv).ok_or(TttError::InvalidMove {
            mv: 0,
            reason: "no legal moves in terminal state",
        })
    }
}

impl Agent for ValueIterationAgent {
    /// Enumerate the state space, then iterate the Bellman update to a
    /// fixed point against `opponent`'s transition model.
    fn initialize(&mut self, opponent: &dyn OpponentModel) -> TttResult<()> {
        self.values = ValueTable::new();
        self.report = None;
        seed_value_table(&GameState::empty(), &mut self.values);

        let mut deltas = Vec::new();
        loop {
            let delta = self.sweep(opponent)?;
            deltas.push(delta);
            if delta == 0.0 || deltas.len() >= MAX_SWEEPS {
                break;
            }
        }

        self.report = Some(TrainingReport {
            sweeps: deltas.len(),
            deltas,
        });
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        if !self.is_trained() {
            return Err(TttError::NotTrained);
        }
        self.greedy_move(state)
    }

    fn name(&self) -> &'static str {
        "value iteration"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for ValueIterationAgent {
    /// A trained value-iteration agent is deterministic: its greedy
    /// move with probability 1. Before training (or for a terminal
    /// state) there is no prediction to make and the list is empty,
    /// which the solver boundary rejects.
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        if !self.is_trained() {
            return Vec::new();
        }
        match self
            .greedy_move(state)
            .and_then(|mv| state.apply(mv, state.next_mark()))
        {
            Ok(next) => vec![TransitionPair::new(next, 1.0)],
            Err(_) => Vec::new(),
        }
    }
}
