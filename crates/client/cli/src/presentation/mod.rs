//! Text presentation used by the CLI client.
pub mod board;

pub use board::{Highlight, render_board, status_line};
