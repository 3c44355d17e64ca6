use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::board::{GameState, Mark, Status};
use crate::matchup::MatchStats;

fn cell_display(cell: Option<Mark>) -> String {
    match cell {
        Some(Mark::X) => "X".red().bold().to_string(),
        Some(Mark::O) => "O".blue().bold().to_string(),
        None => ".".dimmed().to_string(),
    }
}

/// Render a board as a colored 3x3 grid.
pub fn board_display(state: &GameState) -> String {
    state
        .cells()
        .iter()
        .map(|&cell| cell_display(cell))
        .chunks(3)
        .into_iter()
        .map(|row| format!(" {}", row.format(" ")))
        .join("\n")
}

/// One-line description of a finished game from X's side.
pub fn outcome_line(status: Status) -> String {
    match status {
        Status::Won(Mark::X) => "X wins".red().bold().to_string(),
        Status::Won(Mark::O) => "O wins".blue().bold().to_string(),
        Status::Tied => "Draw".yellow().to_string(),
        Status::InProgress => "In progress".to_string(),
        Status::Invalid => "Invalid board".to_string(),
    }
}

/// Tabulate a finished match from the X agent's perspective.
pub fn results_table(agent: &str, opponent: &str, stats: &MatchStats) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Result").set_alignment(CellAlignment::Left),
        Cell::new("Games").set_alignment(CellAlignment::Right),
        Cell::new("Share").set_alignment(CellAlignment::Right),
    ]);

    let rows = [
        ("Won", stats.wins, stats.win_pct()),
        ("Drawn", stats.ties, stats.tie_pct()),
        ("Lost", stats.losses, stats.loss_pct()),
    ];
    for (label, count, pct) in rows {
        table.add_row(vec![
            Cell::new(label.bold().to_string()),
            Cell::new(count.to_string()),
            Cell::new(format!("{:.1}%", pct * 100.0)),
        ]);
    }

    format!(
        "  {} (X) vs {} (O)\n{}",
        agent.bold(),
        opponent.bold(),
        table
    )
}

/// Row of the `compare` output: one trained configuration's record.
pub struct ComparisonRow {
    pub agent: &'static str,
    pub opponent: &'static str,
    pub stats: MatchStats,
}

/// Tabulate a solver-vs-opponent comparison grid.
pub fn comparison_table(rows: &[ComparisonRow]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Agent"),
        Cell::new("Opponent"),
        Cell::new("Won").set_alignment(CellAlignment::Right),
        Cell::new("Drawn").set_alignment(CellAlignment::Right),
        Cell::new("Lost").set_alignment(CellAlignment::Right),
        Cell::new("Win %").set_alignment(CellAlignment::Right),
    ]);

    for row in rows {
        let win_pct = format!("{:.1}%", row.stats.win_pct() * 100.0);
        let styled = if row.stats.losses == 0 {
            win_pct.green().to_string()
        } else {
            win_pct.yellow().to_string()
        };
        table.add_row(vec![
            Cell::new(row.agent),
            Cell::new(row.opponent),
            Cell::new(row.stats.wins.to_string()),
            Cell::new(row.stats.ties.to_string()),
            Cell::new(row.stats.losses.to_string()),
            Cell::new(styled),
        ]);
    }

    table.to_string()
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
