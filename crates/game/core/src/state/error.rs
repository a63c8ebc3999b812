//! Board storage errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{PieceId, Position};

/// Errors raised while placing, moving or removing pieces on a [`Board`](super::Board).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Position lies outside the board dimensions.
    #[error("position {position} is outside the board ({width}x{height})")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    /// Position is already occupied by another piece.
    #[error("position {position} is already occupied by piece {occupant}")]
    PositionOccupied {
        position: Position,
        occupant: PieceId,
    },

    /// A piece with the same identifier is already on the board.
    #[error("piece {0} is already on the board")]
    DuplicatePiece(PieceId),

    /// No piece with this identifier is on the board.
    #[error("piece {0} not found")]
    PieceNotFound(PieceId),
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BoardError::OutOfBounds { .. } | BoardError::PositionOccupied { .. } => {
                ErrorSeverity::Recoverable
            }
            BoardError::DuplicatePiece(_) => ErrorSeverity::Internal,
            BoardError::PieceNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BoardError::OutOfBounds { .. } => "BOARD_OUT_OF_BOUNDS",
            BoardError::PositionOccupied { .. } => "BOARD_POSITION_OCCUPIED",
            BoardError::DuplicatePiece(_) => "BOARD_DUPLICATE_PIECE",
            BoardError::PieceNotFound(_) => "BOARD_PIECE_NOT_FOUND",
        }
    }
}
