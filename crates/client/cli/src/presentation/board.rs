//! Board rendering.
//!
//! Rows are printed from the top (`y = height - 1`) down to `y = 0`, every
//! square as a four-column `[..]` cell framed by coordinate labels.

use std::collections::HashSet;
use std::fmt::Write;

use playground_core::{Board, BoardView, GamePhase, Piece, Position, Team, TurnState};

/// Squares to mark on top of the board.
#[derive(Clone, Debug)]
pub struct Highlight {
    /// Square of the inspected piece, drawn as `X`.
    pub selected: Position,
    pub squares: HashSet<Position>,
    /// `M` for moves, `A` for attacks.
    pub marker: char,
}

impl Highlight {
    pub fn new(
        selected: Position,
        squares: impl IntoIterator<Item = Position>,
        marker: char,
    ) -> Self {
        Self {
            selected,
            squares: squares.into_iter().collect(),
            marker,
        }
    }
}

pub fn render_board(board: &Board, highlight: Option<&Highlight>) -> String {
    let dims = board.dimensions();
    let width = dims.width as i32;
    let height = dims.height as i32;

    let mut labels = String::from("  ");
    for x in 0..width {
        let _ = write!(labels, "  {x} ");
    }
    labels.push('\n');

    let mut out = labels.clone();
    for y in (0..height).rev() {
        let _ = write!(out, "{y} ");
        for x in 0..width {
            let square = Position::new(x, y);
            let _ = write!(out, "[{}]", cell(board, square, highlight));
        }
        let _ = writeln!(out, " {y}");
    }
    out.push_str(&labels);
    out
}

/// Turn banner or the final result.
pub fn status_line(turn: TurnState, phase: GamePhase) -> String {
    match phase {
        GamePhase::Finished { losing_team } => {
            format!("Game over: {losing_team} lost. {} wins.", losing_team.opponent())
        }
        GamePhase::Setup => "Setting up.".to_owned(),
        GamePhase::InProgress => format!("Turn {}: {}'s turn.", turn.number, turn.current),
    }
}

fn cell(board: &Board, square: Position, highlight: Option<&Highlight>) -> String {
    if let Some(highlight) = highlight {
        if highlight.selected == square {
            return "X ".to_owned();
        }
        if highlight.squares.contains(&square) {
            return format!("{} ", highlight.marker);
        }
    }
    match board.piece_at(square) {
        Some(piece) => format!("{}{}", glyph(piece), team_mark(piece.team())),
        None => "  ".to_owned(),
    }
}

fn glyph(piece: &Piece) -> String {
    match piece.emoji().chars().next() {
        Some(emoji) => emoji.to_string(),
        None => piece
            .name()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
            .to_string(),
    }
}

fn team_mark(team: Team) -> char {
    match team {
        Team::White => 'w',
        Team::Black => 'b',
    }
}
