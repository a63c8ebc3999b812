use crate::error::{ErrorSeverity, GameError};
use crate::event::{DispatchError, GameEventKind, flags};
use crate::state::{PieceId, Position};

/// How an action's target relates to the acting piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TargetRelation {
    /// The acting piece itself.
    Own,
    Ally,
    Enemy,
}

impl TargetRelation {
    /// Validation flag that must be `true` to target this relation.
    pub const fn flag(self) -> &'static str {
        match self {
            TargetRelation::Own => flags::ALLOW_TARGET_SELF,
            TargetRelation::Ally => flags::ALLOW_TARGET_ALLY,
            TargetRelation::Enemy => flags::ALLOW_TARGET_ENEMY,
        }
    }
}

/// The stage at which a move or action was found illegal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("{target} is off the board")]
    OutOfBounds { target: Position },

    #[error("target is the piece's own square")]
    SameSquare,

    #[error("{target} is outside the piece's shape")]
    OutsideShape { target: Position },

    #[error("cancelled by an ability during {event}")]
    Cancelled { event: GameEventKind },

    #[error("path blocked at {at} by {blocker}")]
    PathBlocked { at: Position, blocker: PieceId },

    #[error("{target} is occupied by {occupant}")]
    Occupied { target: Position, occupant: PieceId },

    #[error("cannot target the piece's own empty square")]
    SelfEmptySquare,

    #[error("no piece at {target}")]
    EmptyTarget { target: Position },

    #[error("targeting {relation} pieces is not allowed")]
    TargetingPolicy { relation: TargetRelation, target: Position },

    #[error(transparent)]
    AbilityFault(#[from] DispatchError),
}

impl Rejection {
    /// Short stage name used in logs.
    pub const fn stage(&self) -> &'static str {
        match self {
            Rejection::OutOfBounds { .. } => "bounds",
            Rejection::SameSquare => "same_square",
            Rejection::OutsideShape { .. } => "shape",
            Rejection::Cancelled { .. } => "cancelled",
            Rejection::PathBlocked { .. } => "path",
            Rejection::Occupied { .. } => "occupied",
            Rejection::SelfEmptySquare => "self_empty",
            Rejection::EmptyTarget { .. } => "empty_target",
            Rejection::TargetingPolicy { .. } => "targeting_policy",
            Rejection::AbilityFault(_) => "ability_fault",
        }
    }
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Rejection::AbilityFault(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Rejection::OutOfBounds { .. } => "REJECT_OUT_OF_BOUNDS",
            Rejection::SameSquare => "REJECT_SAME_SQUARE",
            Rejection::OutsideShape { .. } => "REJECT_OUTSIDE_SHAPE",
            Rejection::Cancelled { .. } => "REJECT_CANCELLED",
            Rejection::PathBlocked { .. } => "REJECT_PATH_BLOCKED",
            Rejection::Occupied { .. } => "REJECT_OCCUPIED",
            Rejection::SelfEmptySquare => "REJECT_SELF_EMPTY_SQUARE",
            Rejection::EmptyTarget { .. } => "REJECT_EMPTY_TARGET",
            Rejection::TargetingPolicy { .. } => "REJECT_TARGETING_POLICY",
            Rejection::AbilityFault(_) => "REJECT_ABILITY_FAULT",
        }
    }
}
