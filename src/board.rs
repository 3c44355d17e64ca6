//! Tic-tac-toe board state and its dense integer encoding.
//!
//! A `GameState` is a value type: applying a move always produces a new,
//! independently owned state, so solvers can branch into hypothetical
//! futures without aliasing the board they started from. Terminal status
//! is recomputed from the cells on every query rather than cached, so it
//! can never go stale.

use crate::error::{TttError, TttResult};

/// Number of squares on the board.
pub const NUM_SQUARES: usize = 9;

/// Count of board states reachable by alternating legal play from the
/// empty board (well-known without symmetry reduction).
pub const REACHABLE_STATES: usize = 5478;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark. X always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// One square: empty or claimed by a mark.
pub type Cell = Option<Mark>;

/// Game outcome as derived from the cell contents and turn count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Won(Mark),
    Tied,
    /// Both marks complete a line. Unreachable under alternating legal
    /// play; reported rather than panicking so callers can reject bad
    /// hand-constructed boards.
    Invalid,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

/// Base-3 encoding of the 9 cells: empty = 0, X = 1, O = 2, with cell
/// `i` contributing `digit * 3^i`. 3^9 = 19,683 distinct keys, so a u16
/// holds every board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(pub u16);

impl StateKey {
    /// Rebuild the board this key encodes. The turn count is re-derived
    /// from the mark counts, so the round trip `encode -> decode ->
    /// encode` is exact for every key produced from a real board.
    pub fn decode(self) -> GameState {
        let mut cells = [None; NUM_SQUARES];
        let mut remaining = self.0;
        let mut turns = 0u8;
        for cell in cells.iter_mut() {
            *cell = match remaining % 3 {
                0 => None,
                1 => Some(Mark::X),
                _ => Some(Mark::O),
            };
            if cell.is_some() {
                turns += 1;
            }
            remaining /= 3;
        }
        GameState { cells, turns }
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A board position: 9 cells plus the number of moves already played.
///
/// Invariant: exactly `turns` cells are non-empty. Everything else
/// (whose turn it is, terminal status) is derived on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    cells: [Cell; NUM_SQUARES],
    turns: u8,
}

impl GameState {
    pub fn empty() -> GameState {
        GameState {
            cells: [None; NUM_SQUARES],
            turns: 0,
        }
    }

    /// Build a state from explicit cells, deriving the turn count.
    pub fn from_cells(cells: [Cell; NUM_SQUARES]) -> GameState {
        let turns = cells.iter().filter(|c| c.is_some()).count() as u8;
        GameState { cells, turns }
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cells(&self) -> &[Cell; NUM_SQUARES] {
        &self.cells
    }

    pub fn turns_elapsed(&self) -> u8 {
        self.turns
    }

    /// The mark that moves next. X opens, so X is on the move whenever
    /// an even number of turns has elapsed.
    pub fn next_mark(&self) -> Mark {
        if self.turns % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// Ascending indices of all empty squares.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..NUM_SQUARES).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// Place `mark` on square `mv`, returning the resulting position.
    /// The receiver is never modified.
    pub fn apply(&self, mv: usize, mark: Mark) -> TttResult<GameState> {
        if mv >= NUM_SQUARES {
            return Err(TttError::InvalidMove {
                mv,
                reason: "square index out of range",
            });
        }
        if self.cells[mv].is_some() {
            return Err(TttError::InvalidMove {
                mv,
                reason: "square already occupied",
            });
        }
        let mut next = *self;
        next.cells[mv] = Some(mark);
        next.turns += 1;
        Ok(next)
    }

    /// Apply a move for whichever mark is on turn.
    pub fn play(&self, mv: usize) -> TttResult<GameState> {
        self.apply(mv, self.next_mark())
    }

    fn has_line(&self, mark: Mark) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(mark)))
    }

    /// Evaluate the game outcome from the cells alone.
    pub fn status(&self) -> Status {
        let x_won = self.has_line(Mark::X);
        let o_won = self.has_line(Mark::O);
        match (x_won, o_won) {
            (true, true) => Status::Invalid,
            (true, false) => Status::Won(Mark::X),
            (false, true) => Status::Won(Mark::O),
            (false, false) => {
                if self.turns as usize == NUM_SQUARES {
                    Status::Tied
                } else {
                    Status::InProgress
                }
            }
        }
    }

    /// Base-3 integer key for this board's contents.
    pub fn key(&self) -> StateKey {
        let mut key = 0u16;
        let mut place = 1u16;
        for cell in &self.cells {
            let digit = match cell {
                None => 0,
                Some(Mark::X) => 1,
                Some(Mark::O) => 2,
            };
            key += digit * place;
            place *= 3;
        }
        StateKey(key)
    }
}
