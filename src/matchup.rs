//! Match runner: plays full games between two agents and tallies the
//! results from the X agent's side.

use crate::board::{GameState, Mark, Status};
use crate::error::TttResult;
use crate::model::Agent;

/// Win/draw/loss record, counted from the X agent's perspective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl MatchStats {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Won(Mark::X) => self.wins += 1,
            Status::Won(Mark::O) => self.losses += 1,
            Status::Tied => self.ties += 1,
            Status::InProgress | Status::Invalid => {}
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.ties
    }

    pub fn win_pct(&self) -> f64 {
        self.share(self.wins)
    }

    pub fn loss_pct(&self) -> f64 {
        self.share(self.losses)
    }

    pub fn tie_pct(&self) -> f64 {
        self.share(self.ties)
    }

    fn share(&self, count: usize) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            count as f64 / self.total() as f64
        }
    }
}

/// Play one game to completion, `x` opening. Returns the final
/// position; its status tells who won.
pub fn play_game(x: &mut dyn Agent, o: &mut dyn Agent) -> TttResult<GameState> {
    let mut state = GameState::empty();
    while state.status() == Status::InProgress {
        let mv = match state.next_mark() {
            Mark::X => x.pick_move(&state)?,
            Mark::O => o.pick_move(&state)?,
        };
        state = state.play(mv)?;
    }
    Ok(state)
}

/// Initialize both agents against each other, then play `games` games.
/// Returns the tally and the final position of the last game.
pub fn run_match(
    x: &mut dyn Agent,
    o: &mut dyn Agent,
    games: usize,
) -> TttResult<(MatchStats, Option<GameState>)> {
    x.initialize(o.as_model())?;
    o.initialize(x.as_model())?;

    let mut stats = MatchStats::default();
    let mut last = None;
    for _ in 0..games {
        let final_state = play_game(x, o)?;
        stats.record(final_state.status());
        last = Some(final_state);
    }
    Ok((stats, last))
}
