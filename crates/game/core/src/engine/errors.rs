//! Error types for the game engine.

use crate::ability::AbilityNotRegistered;
use crate::error::{ErrorSeverity, GameError};
use crate::event::{DispatchError, GameEventKind};
use crate::piece::PieceCreationError;
use crate::state::{BoardError, PieceId, Team};
use crate::validation::Rejection;

/// Errors surfaced by [`GameEngine`](super::GameEngine) operations.
///
/// Every variant is returned before the board changes. Faults raised by the
/// events that follow a move or capture are logged instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("piece {0} not found")]
    PieceNotFound(PieceId),

    #[error("piece {piece} belongs to {team}, but it is {current}'s turn")]
    NotYourTurn {
        piece: PieceId,
        team: Team,
        current: Team,
    },

    #[error("the game has not started")]
    NotStarted,

    #[error("the game has already started")]
    AlreadyStarted,

    #[error("the game is over; {losing_team} lost")]
    GameFinished { losing_team: Team },

    #[error("illegal: {0}")]
    Illegal(#[from] Rejection),

    #[error("cancelled by an ability during {event}")]
    Cancelled { event: GameEventKind },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Creation(#[from] PieceCreationError),

    #[error("status effect: {0}")]
    Status(#[from] AbilityNotRegistered),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::PieceNotFound(_) => ErrorSeverity::Validation,
            EngineError::NotYourTurn { .. }
            | EngineError::NotStarted
            | EngineError::AlreadyStarted
            | EngineError::GameFinished { .. }
            | EngineError::Cancelled { .. } => ErrorSeverity::Recoverable,
            EngineError::Illegal(rejection) => rejection.severity(),
            EngineError::Dispatch(err) => err.severity(),
            EngineError::Board(err) => err.severity(),
            EngineError::Creation(err) => err.severity(),
            EngineError::Status(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::PieceNotFound(_) => "ENGINE_PIECE_NOT_FOUND",
            EngineError::NotYourTurn { .. } => "ENGINE_NOT_YOUR_TURN",
            EngineError::NotStarted => "ENGINE_NOT_STARTED",
            EngineError::AlreadyStarted => "ENGINE_ALREADY_STARTED",
            EngineError::GameFinished { .. } => "ENGINE_GAME_FINISHED",
            EngineError::Illegal(rejection) => rejection.error_code(),
            EngineError::Cancelled { .. } => "ENGINE_CANCELLED",
            EngineError::Dispatch(err) => err.error_code(),
            EngineError::Board(err) => err.error_code(),
            EngineError::Creation(err) => err.error_code(),
            EngineError::Status(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityFault, AbilityKind};

    #[test]
    fn only_ability_faults_are_internal() {
        let fault = EngineError::from(DispatchError {
            event: GameEventKind::MoveValidate,
            ability: AbilityKind::from("Jumping"),
            fault: AbilityFault::new("boom"),
        });
        assert!(fault.severity().is_internal());
        assert_eq!(fault.severity().as_str(), "internal");

        let turn = EngineError::NotYourTurn {
            piece: PieceId(1),
            team: Team::Black,
            current: Team::White,
        };
        assert_eq!(turn.severity(), ErrorSeverity::Recoverable);
        assert!(!turn.severity().is_internal());
        assert!(!EngineError::PieceNotFound(PieceId(9)).severity().is_internal());
    }
}
