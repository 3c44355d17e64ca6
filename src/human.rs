//! Interactive agent driven by command-line input.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::board::GameState;
use crate::display::board_display;
use crate::error::{TttError, TttResult};
use crate::model::{Agent, OpponentModel, TransitionPair};
use crate::rule_agents::weighted_successors;

/// Prompts on stdout and reads square indices from its input stream,
/// re-prompting until the user names an empty square.
pub struct HumanAgent {
    input: Box<dyn BufRead>,
}

impl HumanAgent {
    pub fn new() -> HumanAgent {
        HumanAgent {
            input: Box::new(io::BufReader::new(io::stdin())),
        }
    }

    /// Read moves from an arbitrary stream. Used by tests to script
    /// input.
    pub fn from_reader(reader: impl BufRead + 'static) -> HumanAgent {
        HumanAgent {
            input: Box::new(reader),
        }
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        HumanAgent::new()
    }
}

impl Agent for HumanAgent {
    fn initialize(&mut self, _opponent: &dyn OpponentModel) -> TttResult<()> {
        Ok(())
    }

    fn pick_move(&mut self, state: &GameState) -> TttResult<usize> {
        println!("{}", board_display(state));
        println!(
            "You are playing '{}'. Squares are numbered:",
            state.next_mark().to_char()
        );
        println!("  0|1|2\n  3|4|5\n  6|7|8");

        loop {
            print!("Your move: ");
            io::stdout().flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(TttError::InvalidMove {
                    mv: 0,
                    reason: "input stream closed",
                });
            }

            match line.trim().parse::<usize>() {
                Ok(mv) if state.legal_moves().contains(&mv) => return Ok(mv),
                Ok(_) => println!("{}", "That square is taken or out of range.".red()),
                Err(_) => println!("{}", "Enter a square number between 0 and 8.".red()),
            }
        }
    }

    fn name(&self) -> &'static str {
        "human"
    }

    fn as_model(&self) -> &dyn OpponentModel {
        self
    }
}

impl OpponentModel for HumanAgent {
    /// The learners need some model of a human; assume uniform play,
    /// knowingly false but serviceable.
    fn successor_states(&self, state: &GameState) -> Vec<TransitionPair> {
        weighted_successors(state, None, 0.0)
    }
}
