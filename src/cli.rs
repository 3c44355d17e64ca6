use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use crate::board::Mark;
use crate::display::{
    board_display, comparison_table, outcome_line, print_error, results_table, ComparisonRow,
};
use crate::error::TttResult;
use crate::export::TrainedTables;
use crate::human::HumanAgent;
use crate::matchup::run_match;
use crate::model::Agent;
use crate::policy_iteration::PolicyIterationAgent;
use crate::rule_agents::{AggressiveAgent, BalancedAgent, DefensiveAgent, NaiveAgent};
use crate::value_iteration::ValueIterationAgent;

#[derive(Parser)]
#[command(
    name = "ttt",
    version = "1.0.0",
    about = "Tic-tac-toe MDP trainer: value/policy iteration agents vs rule-based opponents."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Uniformly random play
    Random,
    /// Value-iteration learner
    Value,
    /// Policy-iteration learner
    Policy,
    /// Interactive play on stdin
    Human,
}

#[derive(Clone, Copy, ValueEnum)]
enum OpponentKind {
    Random,
    Defensive,
    Aggressive,
    Balanced,
    Human,
}

impl OpponentKind {
    fn as_str(self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Defensive => "defensive",
            OpponentKind::Aggressive => "aggressive",
            OpponentKind::Balanced => "balanced",
            OpponentKind::Human => "human",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverKind {
    Value,
    Policy,
}

impl SolverKind {
    fn as_str(self) -> &'static str {
        match self {
            SolverKind::Value => "value iteration",
            SolverKind::Policy => "policy iteration",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between an agent (X) and an opponent (O)
    Play {
        /// Agent playing X
        #[arg(short, long, default_value = "value")]
        agent: AgentKind,
        /// Opponent playing O
        #[arg(short, long, default_value = "random")]
        opponent: OpponentKind,
        /// Number of games in the match
        #[arg(short, long, default_value = "100")]
        games: usize,
        /// Seed for the stochastic agents (omit for entropy)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Train both solvers against every rule opponent and tabulate
    Compare {
        /// Games per configuration
        #[arg(short, long, default_value = "1000")]
        games: usize,
        /// Seed for the stochastic agents (omit for entropy)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Train a solver and write its converged tables as JSON
    Export {
        /// Which solver to train
        #[arg(short, long, default_value = "value")]
        agent: SolverKind,
        /// Opponent model to train against
        #[arg(short, long, default_value = "random")]
        opponent: OpponentKind,
        /// Output file
        #[arg(short = 'O', long)]
        output: PathBuf,
    },
}

fn build_agent(kind: AgentKind, seed: Option<u64>) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => match seed {
            Some(seed) => Box::new(NaiveAgent::seeded(seed)),
            None => Box::new(NaiveAgent::new()),
        },
        AgentKind::Value => Box::new(ValueIterationAgent::new(Mark::X)),
        AgentKind::Policy => Box::new(PolicyIterationAgent::new(Mark::X)),
        AgentKind::Human => Box::new(HumanAgent::new()),
    }
}

fn build_opponent(kind: OpponentKind, seed: Option<u64>) -> Box<dyn Agent> {
    match (kind, seed) {
        (OpponentKind::Random, Some(seed)) => Box::new(NaiveAgent::seeded(seed)),
        (OpponentKind::Random, None) => Box::new(NaiveAgent::new()),
        (OpponentKind::Defensive, Some(seed)) => Box::new(DefensiveAgent::seeded(seed)),
        (OpponentKind::Defensive, None) => Box::new(DefensiveAgent::new()),
        (OpponentKind::Aggressive, Some(seed)) => Box::new(AggressiveAgent::seeded(seed)),
        (OpponentKind::Aggressive, None) => Box::new(AggressiveAgent::new()),
        (OpponentKind::Balanced, Some(seed)) => Box::new(BalancedAgent::seeded(seed)),
        (OpponentKind::Balanced, None) => Box::new(BalancedAgent::new()),
        (OpponentKind::Human, _) => Box::new(HumanAgent::new()),
    }
}

fn build_solver(kind: SolverKind) -> Box<dyn Agent> {
    match kind {
        SolverKind::Value => Box::new(ValueIterationAgent::new(Mark::X)),
        SolverKind::Policy => Box::new(PolicyIterationAgent::new(Mark::X)),
    }
}

fn cmd_play(
    agent: AgentKind,
    opponent: OpponentKind,
    games: usize,
    seed: Option<u64>,
) -> TttResult<()> {
    let mut x = build_agent(agent, seed);
    let mut o = build_opponent(opponent, seed.map(|s| s.wrapping_add(1)));

    println!(
        "Training {} against the {} opponent model...",
        x.name().bold(),
        o.name().bold()
    );
    let (stats, last) = run_match(x.as_mut(), o.as_mut(), games)?;

    if games == 1 {
        if let Some(state) = last {
            println!("{}", board_display(&state));
            println!("  {}", outcome_line(state.status()));
        }
    }
    println!("{}", results_table(x.name(), o.name(), &stats));
    Ok(())
}

fn cmd_compare(games: usize, seed: Option<u64>) -> TttResult<()> {
    let opponents = [
        OpponentKind::Random,
        OpponentKind::Defensive,
        OpponentKind::Aggressive,
        OpponentKind::Balanced,
    ];
    let solvers = [SolverKind::Value, SolverKind::Policy];

    let configs: Vec<(SolverKind, OpponentKind)> = solvers
        .iter()
        .flat_map(|&s| opponents.iter().map(move |&o| (s, o)))
        .collect();

    println!(
        "Training {} configurations, {} games each...",
        configs.len(),
        games
    );

    // Each configuration trains and plays independently, so the grid
    // parallelizes cleanly. The solvers themselves stay single-threaded.
    let rows: TttResult<Vec<ComparisonRow>> = configs
        .par_iter()
        .enumerate()
        .map(|(i, &(solver, opponent))| {
            let mut x = build_solver(solver);
            let config_seed = seed.map(|s| s.wrapping_add(i as u64));
            let mut o = build_opponent(opponent, config_seed);
            let (stats, _) = run_match(x.as_mut(), o.as_mut(), games)?;
            Ok(ComparisonRow {
                agent: solver.as_str(),
                opponent: opponent.as_str(),
                stats,
            })
        })
        .collect();

    println!("{}", comparison_table(&rows?));
    Ok(())
}

fn cmd_export(agent: SolverKind, opponent: OpponentKind, output: PathBuf) -> TttResult<()> {
    let o = build_opponent(opponent, None);

    let tables = match agent {
        SolverKind::Value => {
            let mut x = ValueIterationAgent::new(Mark::X);
            x.initialize(o.as_model())?;
            TrainedTables::from_value_agent(&x)?
        }
        SolverKind::Policy => {
            let mut x = PolicyIterationAgent::new(Mark::X);
            x.initialize(o.as_model())?;
            TrainedTables::from_policy_agent(&x)?
        }
    };

    tables.write_to(&output)?;
    println!(
        "Wrote {} tables ({} states) to {}",
        agent.as_str(),
        tables.values.len(),
        output.display()
    );
    Ok(())
}

pub fn run() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            agent,
            opponent,
            games,
            seed,
        } => cmd_play(agent, opponent, games, seed),
        Commands::Compare { games, seed } => cmd_compare(games, seed),
        Commands::Export {
            agent,
            opponent,
            output,
        } => cmd_export(agent, opponent, output),
    };

    if let Err(err) = result {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}
