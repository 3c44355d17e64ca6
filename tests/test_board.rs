use ttt_cli::board::{GameState, Mark, StateKey, Status, NUM_SQUARES};

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

#[test]
fn empty_board_starts_fresh() {
    let state = GameState::empty();
    assert_eq!(state.turns_elapsed(), 0);
    assert_eq!(state.next_mark(), Mark::X);
    assert_eq!(state.legal_moves(), (0..9).collect::<Vec<_>>());
    assert_eq!(state.status(), Status::InProgress);
}

#[test]
fn apply_returns_new_state_without_mutating_parent() {
    let parent = GameState::empty();
    let child = parent.apply(4, Mark::X).unwrap();

    assert_eq!(parent.turns_elapsed(), 0);
    assert_eq!(parent.cell(4), None);
    assert_eq!(child.turns_elapsed(), 1);
    assert_eq!(child.cell(4), Some(Mark::X));
}

#[test]
fn apply_rejects_out_of_range_move() {
    let state = GameState::empty();
    assert!(state.apply(9, Mark::X).is_err());
    assert!(state.apply(usize::MAX, Mark::X).is_err());
}

#[test]
fn apply_rejects_occupied_square() {
    let state = GameState::empty().apply(0, Mark::X).unwrap();
    assert!(state.apply(0, Mark::O).is_err());
}

#[test]
fn play_alternates_marks() {
    let state = GameState::empty().play(0).unwrap().play(1).unwrap();
    assert_eq!(state.cell(0), Some(Mark::X));
    assert_eq!(state.cell(1), Some(Mark::O));
    assert_eq!(state.next_mark(), Mark::X);
}

#[test]
fn legal_moves_are_ascending_empty_squares() {
    let state = board(['X', '.', 'O', '.', 'X', '.', '.', 'O', '.']);
    assert_eq!(state.legal_moves(), vec![1, 3, 5, 6, 8]);
}

#[test]
fn status_detects_row_wins() {
    assert_eq!(
        board(['X', 'X', 'X', 'O', 'O', '.', '.', '.', '.']).status(),
        Status::Won(Mark::X)
    );
    assert_eq!(
        board(['X', '.', 'X', 'O', 'O', 'O', 'X', '.', '.']).status(),
        Status::Won(Mark::O)
    );
}

#[test]
fn status_detects_column_and_diagonal_wins() {
    assert_eq!(
        board(['X', 'O', '.', 'X', 'O', '.', 'X', '.', '.']).status(),
        Status::Won(Mark::X)
    );
    assert_eq!(
        board(['O', 'X', 'X', '.', 'O', 'X', '.', '.', 'O']).status(),
        Status::Won(Mark::O)
    );
    assert_eq!(
        board(['X', 'O', 'O', '.', 'X', '.', '.', '.', 'X']).status(),
        Status::Won(Mark::X)
    );
    assert_eq!(
        board(['X', 'X', 'O', '.', 'O', 'X', 'O', '.', '.']).status(),
        Status::Won(Mark::O)
    );
}

#[test]
fn full_board_without_winner_is_tied() {
    let state = board(['X', 'O', 'X', 'X', 'O', 'O', 'O', 'X', 'X']);
    assert_eq!(state.turns_elapsed(), 9);
    assert_eq!(state.status(), Status::Tied);
}

#[test]
fn two_simultaneous_lines_are_invalid() {
    let state = board(['X', 'X', 'X', 'O', 'O', 'O', '.', '.', '.']);
    assert_eq!(state.status(), Status::Invalid);
}

#[test]
fn state_key_is_base_three() {
    assert_eq!(GameState::empty().key(), StateKey(0));
    assert_eq!(board(['X', '.', '.', '.', '.', '.', '.', '.', '.']).key(), StateKey(1));
    assert_eq!(board(['O', '.', '.', '.', '.', '.', '.', '.', '.']).key(), StateKey(2));
    assert_eq!(board(['.', 'X', '.', '.', '.', '.', '.', '.', '.']).key(), StateKey(3));
    // Cell 8 contributes its digit times 3^8 = 6561.
    assert_eq!(board(['.', '.', '.', '.', '.', '.', '.', '.', 'X']).key(), StateKey(6561));
}

#[test]
fn key_depends_only_on_cell_contents() {
    let via_one_order = GameState::empty().play(0).unwrap().play(4).unwrap().play(8).unwrap();
    let direct = board(['X', '.', '.', '.', 'O', '.', '.', '.', 'X']);
    assert_eq!(via_one_order.key(), direct.key());
}

#[test]
fn decode_rebuilds_board_and_turn_count() {
    let state = board(['X', 'O', '.', '.', 'X', '.', 'O', '.', 'X']);
    let decoded = state.key().decode();
    assert_eq!(decoded, state);
    assert_eq!(decoded.turns_elapsed(), 5);
    assert_eq!(decoded.next_mark(), Mark::O);
}
