use ttt_cli::board::{GameState, Mark, Status, NUM_SQUARES, REACHABLE_STATES};
use ttt_cli::error::TttError;
use ttt_cli::mdp::reward;
use ttt_cli::model::{Agent, OpponentModel, TransitionPair};
use ttt_cli::rule_agents::{weighted_successors, winning_move, NaiveAgent};
use ttt_cli::value_iteration::ValueIterationAgent;

fn board(layout: [char; 9]) -> GameState {
    let mut cells = [None; NUM_SQUARES];
    for (i, c) in layout.iter().enumerate() {
        cells[i] = match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        };
    }
    GameState::from_cells(cells)
}

/// Opponent model that always takes a winning square when one exists,
/// and is otherwise uniform.
struct DeterministicAggressive;

impl OpponentModel for DeterministicAggressive {
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        match winning_move(state, state.next_mark()) {
            Some(mv) => {
                let next = state.apply(mv, state.next_mark()).unwrap();
                vec![TransitionPair::new(next, 1.0)]
            }
            None => weighted_successors(state, None, 0.0),
        }
    }
}

fn trained_vs_random(mark: Mark) -> ValueIterationAgent {
    let mut agent = ValueIterationAgent::new(mark);
    agent.initialize(&NaiveAgent::seeded(3)).unwrap();
    agent
}

#[test]
fn pick_move_before_training_is_rejected() {
    let mut agent = ValueIterationAgent::new(Mark::X);
    let result = agent.pick_move(&GameState::empty());
    assert!(matches!(result, Err(TttError::NotTrained)));
}

#[test]
fn training_covers_the_full_state_space() {
    let agent = trained_vs_random(Mark::X);
    assert_eq!(agent.values().len(), REACHABLE_STATES);
}

#[test]
fn terminal_values_equal_their_reward() {
    let agent = trained_vs_random(Mark::X);
    for (key, value) in agent.values().iter() {
        let state = key.decode();
        if state.status().is_terminal() {
            assert_eq!(value, reward(&state, Mark::X));
        }
    }
}

#[test]
fn sweep_deltas_are_monotone_non_increasing() {
    let agent = trained_vs_random(Mark::X);
    let report = agent.report().unwrap();
    assert!(report.sweeps >= 2);
    for pair in report.deltas.windows(2) {
        assert!(
            pair[1] <= pair[0] + 1e-12,
            "delta rose from {} to {}",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(*report.deltas.last().unwrap(), 0.0);
}

#[test]
fn convergence_fits_within_game_depth() {
    let agent = trained_vs_random(Mark::X);
    // Values stabilize from the terminals upward; depth 9 plus the
    // final no-change sweep bounds the count.
    assert!(agent.report().unwrap().sweeps <= 10);
}

#[test]
fn picks_the_immediate_win() {
    let mut agent = trained_vs_random(Mark::X);
    let state = board(['X', 'X', '.', '.', 'O', '.', '.', '.', 'O']);
    assert_eq!(state.next_mark(), Mark::X);
    assert_eq!(agent.pick_move(&state).unwrap(), 2);
}

#[test]
fn blocks_the_forced_loss() {
    let mut agent = ValueIterationAgent::new(Mark::O);
    agent.initialize(&DeterministicAggressive).unwrap();

    // X threatens the top row; anything but square 2 loses next turn.
    let state = board(['X', 'X', '.', '.', 'O', '.', '.', '.', '.']);
    assert_eq!(state.next_mark(), Mark::O);
    assert_eq!(agent.pick_move(&state).unwrap(), 2);
}

#[test]
fn pick_move_works_from_every_non_terminal_reachable_state() {
    let mut agent = trained_vs_random(Mark::X);
    for key in agent.values().keys() {
        let state = key.decode();
        if state.status() == Status::InProgress {
            let mv = agent.pick_move(&state).unwrap();
            assert!(state.legal_moves().contains(&mv));
        }
    }
}

#[test]
fn trained_agent_models_itself_deterministically() {
    let agent = trained_vs_random(Mark::X);
    let successors = agent.successor_states(&GameState::empty());
    assert_eq!(successors.len(), 1);
    assert_eq!(successors[0].probability, 1.0);
    assert_eq!(successors[0].state.turns_elapsed(), 1);
}

#[test]
fn untrained_agent_has_no_opponent_model() {
    let agent = ValueIterationAgent::new(Mark::X);
    assert!(agent.successor_states(&GameState::empty()).is_empty());
}
