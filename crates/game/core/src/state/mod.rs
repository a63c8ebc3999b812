//! Board state and the value types shared across the crate.
//!
//! This module owns positions, offsets, teams, the board storage and turn
//! bookkeeping. Validators only read through [`BoardView`]; the engine is the
//! sole writer.
pub mod board;
pub mod error;
pub mod types;

pub use board::{Board, BoardDimensions, BoardView};
pub use error::BoardError;
pub use types::{Offset, PieceId, Position, Team, TurnState};
