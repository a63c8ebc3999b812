//! Move and action legality.
//!
//! Both checks run a fixed sequence of gates and stop at the first failure,
//! which is reported as a [`Rejection`] naming the gate:
//!
//! | move                          | action                              |
//! |-------------------------------|-------------------------------------|
//! | bounds                        | bounds                              |
//! | not the piece's own square    | not the piece's own empty square    |
//! | inside the movement shape     | inside the action shape             |
//! | `MoveValidate` dispatch       | `ActionValidate` dispatch           |
//! | straight path clear           | target occupied, relation allowed   |
//! | target empty                  |                                     |
//!
//! The dispatch stage is where abilities adjust the rules, through the
//! context's cancellation flag and validation flags. Validators never touch
//! the board.

mod path;
mod rejection;

pub use path::path_between;
pub use rejection::{Rejection, TargetRelation};

use tracing::{debug, error, trace};

use crate::event::{EventContext, EventDispatcher, GameEventKind, flags};
use crate::piece::Piece;
use crate::state::{BoardView, Position};

const LOG_TARGET: &str = "playground::validation";

/// Runs legality checks against a board, dispatching validation events
/// through the borrowed dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct LegalityValidator<'d> {
    dispatcher: &'d EventDispatcher,
}

impl<'d> LegalityValidator<'d> {
    pub fn new(dispatcher: &'d EventDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Checks whether `piece` may move to the empty square `to`.
    pub fn validate_move(
        &self,
        piece: &Piece,
        to: Position,
        board: &dyn BoardView,
    ) -> Result<(), Rejection> {
        let verdict = self.check_move(piece, to, board);
        log_verdict("move", piece, to, &verdict);
        verdict
    }

    /// Checks whether `piece` may perform `action` on `target`.
    pub fn validate_action_target(
        &self,
        piece: &Piece,
        target: Position,
        action: &str,
        board: &dyn BoardView,
    ) -> Result<(), Rejection> {
        let verdict = self.check_action(piece, target, action, board);
        log_verdict(action, piece, target, &verdict);
        verdict
    }

    pub fn is_move_legal(&self, piece: &Piece, to: Position, board: &dyn BoardView) -> bool {
        self.validate_move(piece, to, board).is_ok()
    }

    pub fn is_action_legal(
        &self,
        piece: &Piece,
        target: Position,
        action: &str,
        board: &dyn BoardView,
    ) -> bool {
        self.validate_action_target(piece, target, action, board)
            .is_ok()
    }

    /// Every square `piece` may legally move to, in shape order.
    pub fn legal_moves(&self, piece: &Piece, board: &dyn BoardView) -> Vec<Position> {
        piece
            .potential_movement_targets()
            .filter(|&to| self.is_move_legal(piece, to, board))
            .collect()
    }

    /// Every square `piece` may legally target with `action`, in shape order.
    pub fn legal_action_targets(
        &self,
        piece: &Piece,
        action: &str,
        board: &dyn BoardView,
    ) -> Vec<Position> {
        piece
            .potential_action_targets()
            .filter(|&target| self.is_action_legal(piece, target, action, board))
            .collect()
    }

    fn check_move(
        &self,
        piece: &Piece,
        to: Position,
        board: &dyn BoardView,
    ) -> Result<(), Rejection> {
        let from = piece.position();

        if !board.is_valid_position(to) {
            return Err(Rejection::OutOfBounds { target: to });
        }
        if from == to {
            return Err(Rejection::SameSquare);
        }
        if !piece.potential_movement_targets().any(|square| square == to) {
            return Err(Rejection::OutsideShape { target: to });
        }

        let mut ctx = EventContext::new(GameEventKind::MoveValidate, board)
            .with_source(piece)
            .with_move(from, to);
        self.dispatcher
            .dispatch(GameEventKind::MoveValidate, &mut ctx)?;
        if ctx.is_cancelled() {
            return Err(Rejection::Cancelled {
                event: GameEventKind::MoveValidate,
            });
        }

        if !ctx.flag_enabled(flags::IGNORE_PATH_BLOCKING) {
            for at in path_between(from, to) {
                if let Some(blocker) = board.piece_at(at) {
                    return Err(Rejection::PathBlocked {
                        at,
                        blocker: blocker.id(),
                    });
                }
            }
        }

        if let Some(occupant) = board.piece_at(to) {
            return Err(Rejection::Occupied {
                target: to,
                occupant: occupant.id(),
            });
        }

        Ok(())
    }

    fn check_action(
        &self,
        piece: &Piece,
        target: Position,
        action: &str,
        board: &dyn BoardView,
    ) -> Result<(), Rejection> {
        let from = piece.position();

        if !board.is_valid_position(target) {
            return Err(Rejection::OutOfBounds { target });
        }
        let target_piece = board.piece_at(target);
        if from == target && target_piece.is_none() {
            return Err(Rejection::SelfEmptySquare);
        }
        if !piece.potential_action_targets().any(|square| square == target) {
            return Err(Rejection::OutsideShape { target });
        }

        let mut ctx = EventContext::new(GameEventKind::ActionValidate, board)
            .with_source(piece)
            .with_target(target_piece)
            .with_move(from, target)
            .with_action(action, None);
        self.dispatcher
            .dispatch(GameEventKind::ActionValidate, &mut ctx)?;
        if ctx.is_cancelled() {
            return Err(Rejection::Cancelled {
                event: GameEventKind::ActionValidate,
            });
        }

        if ctx.flag_enabled(flags::IGNORE_TARGETING_RULES) {
            return Ok(());
        }

        let Some(target_piece) = target_piece else {
            return Err(Rejection::EmptyTarget { target });
        };
        let relation = relation_between(piece, target_piece);
        if !ctx.flag_enabled(relation.flag()) {
            return Err(Rejection::TargetingPolicy { relation, target });
        }

        Ok(())
    }
}

/// Classifies `target` relative to `actor`.
pub fn relation_between(actor: &Piece, target: &Piece) -> TargetRelation {
    if actor.id() == target.id() {
        TargetRelation::Own
    } else if actor.team() == target.team() {
        TargetRelation::Ally
    } else {
        TargetRelation::Enemy
    }
}

fn log_verdict(check: &str, piece: &Piece, target: Position, verdict: &Result<(), Rejection>) {
    match verdict {
        Ok(()) => trace!(
            target: LOG_TARGET,
            check,
            piece = %piece.id(),
            from = %piece.position(),
            to = %target,
            "legal"
        ),
        Err(Rejection::AbilityFault(fault)) => error!(
            target: LOG_TARGET,
            check,
            piece = %piece.id(),
            to = %target,
            error = %fault,
            "ability fault during validation"
        ),
        Err(rejection) => debug!(
            target: LOG_TARGET,
            check,
            piece = %piece.id(),
            from = %piece.position(),
            to = %target,
            stage = rejection.stage(),
            reason = %rejection,
            "rejected"
        ),
    }
}
