use std::collections::HashMap;

use ttt_cli::board::{GameState, Mark, StateKey, Status, NUM_SQUARES, REACHABLE_STATES};
use ttt_cli::error::TttError;
use ttt_cli::mdp::reward;
use ttt_cli::model::{Agent, OpponentModel, TransitionPair};
use ttt_cli::policy_iteration::PolicyIterationAgent;
use ttt_cli::rule_agents::{weighted_successors, winning_move, NaiveAgent};

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

fn trained_vs_random(mark: Mark) -> PolicyIterationAgent {
    let mut agent = PolicyIterationAgent::new(mark);
    agent.initialize(&NaiveAgent::seeded(5)).unwrap();
    agent
}

fn value_snapshot(agent: &PolicyIterationAgent) -> HashMap<StateKey, f64> {
    agent.values().iter().collect()
}

fn policy_snapshot(agent: &PolicyIterationAgent) -> HashMap<StateKey, Option<usize>> {
    agent.policy().iter().collect()
}

#[test]
fn pick_move_before_training_is_rejected() {
    let mut agent = PolicyIterationAgent::new(Mark::X);
    let result = agent.pick_move(&GameState::empty());
    assert!(matches!(result, Err(TttError::NotTrained)));
}

#[test]
fn training_covers_the_full_state_space() {
    let agent = trained_vs_random(Mark::X);
    assert_eq!(agent.values().len(), REACHABLE_STATES);
    assert_eq!(agent.policy().len(), REACHABLE_STATES);
}

#[test]
fn terminal_states_keep_reward_value_and_no_move() {
    let agent = trained_vs_random(Mark::X);
    for (key, value) in agent.values().iter() {
        let state = key.decode();
        if state.status().is_terminal() {
            assert_eq!(value, reward(&state, Mark::X));
            assert_eq!(agent.policy().get(key).unwrap(), None);
        }
    }
}

#[test]
fn converged_policy_is_a_stable_fixed_point() {
    let mut agent = trained_vs_random(Mark::X);
    let values_before = value_snapshot(&agent);
    let policy_before = policy_snapshot(&agent);

    // Re-running evaluation plus improvement once more must change
    // nothing at the fixed point.
    let changed = agent.refine_pass(&NaiveAgent::seeded(5)).unwrap();

    assert!(!changed);
    assert_eq!(value_snapshot(&agent), values_before);
    assert_eq!(policy_snapshot(&agent), policy_before);
}

#[test]
fn policy_moves_are_legal_everywhere() {
    let agent = trained_vs_random(Mark::X);
    for (key, mv) in agent.policy().iter() {
        let state = key.decode();
        match mv {
            Some(mv) => assert!(state.legal_moves().contains(&mv)),
            None => assert!(state.status().is_terminal()),
        }
    }
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
    let mut agent = PolicyIterationAgent::new(Mark::O);
    agent.initialize(&DeterministicAggressive).unwrap();

    // X threatens the top row; anything but square 2 loses next turn.
    let state = board(['X', 'X', '.', '.', 'O', '.', '.', '.', '.']);
    assert_eq!(state.next_mark(), Mark::O);
    assert_eq!(agent.pick_move(&state).unwrap(), 2);
}

#[test]
fn pick_move_matches_the_policy_table() {
    let mut agent = trained_vs_random(Mark::X);
    for key in agent.policy().keys() {
        let state = key.decode();
        if state.status() == Status::InProgress && state.next_mark() == Mark::X {
            let table_move = agent.policy().get(key).unwrap();
            assert_eq!(Some(agent.pick_move(&state).unwrap()), table_move);
        }
    }
}

#[test]
fn trained_agent_models_itself_deterministically() {
    let agent = trained_vs_random(Mark::X);
    let successors = agent.successor_states(&GameState::empty());
    assert_eq!(successors.len(), 1);
    assert_eq!(successors[0].probability, 1.0);
}

#[test]
fn untrained_agent_has_no_opponent_model() {
    let agent = PolicyIterationAgent::new(Mark::X);
    assert!(agent.successor_states(&GameState::empty()).is_empty());
}
