//! Rectangular board holding pieces and an occupancy index.

use std::collections::{BTreeMap, HashMap};

use super::error::BoardError;
use super::{PieceId, Position};
use crate::piece::Piece;

/// Read-only view of a board used by the validator and by abilities.
///
/// Validators depend on this trait rather than on [`Board`] so tests and
/// alternative front-ends can supply their own storage.
pub trait BoardView {
    fn dimensions(&self) -> BoardDimensions;

    /// Returns the piece standing on `position`, if any.
    fn piece_at(&self, position: Position) -> Option<&Piece>;

    fn is_valid_position(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardDimensions {
    pub width: u32,
    pub height: u32,
}

impl BoardDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Concrete board storage.
///
/// Pieces are keyed by id (ordered, so iteration is deterministic) and indexed
/// by square. The two maps are kept in sync by every mutating method.
#[derive(Debug, Default)]
pub struct Board {
    dimensions: BoardDimensions,
    pieces: BTreeMap<PieceId, Piece>,
    occupancy: HashMap<Position, PieceId>,
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_dimensions(BoardDimensions::new(width, height))
    }

    pub fn with_dimensions(dimensions: BoardDimensions) -> Self {
        Self {
            dimensions,
            pieces: BTreeMap::new(),
            occupancy: HashMap::new(),
        }
    }

    /// Puts `piece` on its current position.
    pub fn place(&mut self, piece: Piece) -> Result<(), BoardError> {
        let position = piece.position();
        self.ensure_in_bounds(position)?;

        if self.pieces.contains_key(&piece.id()) {
            return Err(BoardError::DuplicatePiece(piece.id()));
        }
        if let Some(&occupant) = self.occupancy.get(&position) {
            return Err(BoardError::PositionOccupied { position, occupant });
        }

        self.occupancy.insert(position, piece.id());
        self.pieces.insert(piece.id(), piece);
        Ok(())
    }

    /// Takes a piece off the board and hands it back to the caller.
    pub fn remove(&mut self, id: PieceId) -> Result<Piece, BoardError> {
        let piece = self
            .pieces
            .remove(&id)
            .ok_or(BoardError::PieceNotFound(id))?;
        self.occupancy.remove(&piece.position());
        Ok(piece)
    }

    /// Moves a piece to an empty square. Legality is not checked here.
    pub fn relocate(&mut self, id: PieceId, to: Position) -> Result<(), BoardError> {
        self.ensure_in_bounds(to)?;
        if let Some(&occupant) = self.occupancy.get(&to)
            && occupant != id
        {
            return Err(BoardError::PositionOccupied {
                position: to,
                occupant,
            });
        }

        let piece = self
            .pieces
            .get_mut(&id)
            .ok_or(BoardError::PieceNotFound(id))?;
        self.occupancy.remove(&piece.position());
        piece.set_position(to);
        self.occupancy.insert(to, id);
        Ok(())
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// Iterates pieces in ascending id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn ensure_in_bounds(&self, position: Position) -> Result<(), BoardError> {
        if self.dimensions.contains(position) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                position,
                width: self.dimensions.width,
                height: self.dimensions.height,
            })
        }
    }
}

impl BoardView for Board {
    fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.occupancy
            .get(&position)
            .and_then(|id| self.pieces.get(id))
    }
}
