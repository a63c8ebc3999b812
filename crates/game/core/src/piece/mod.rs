//! Pieces, their blueprints and the factory that turns one into the other.

mod blueprint;
mod factory;

pub use blueprint::{AbilitySpec, PieceBlueprint, ShapeSource};
pub use factory::{PieceCreationError, PieceFactory};

use crate::ability::{AbilityKind, AbilityRef};
use crate::state::{Offset, PieceId, Position, Team};
use crate::status::StatusEffectInstance;

/// A piece on the board.
///
/// Movement and action offsets are compiled once at creation (already
/// mirrored for black) and never change afterwards.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    name: String,
    emoji: String,
    team: Team,
    position: Position,
    movement: Vec<Offset>,
    actions: Vec<Offset>,
    abilities: Vec<AbilityRef>,
    status_effects: Vec<StatusEffectInstance>,
}

impl Piece {
    pub fn builder(
        id: PieceId,
        name: impl Into<String>,
        team: Team,
        position: Position,
    ) -> PieceBuilder {
        PieceBuilder {
            piece: Piece {
                id,
                name: name.into(),
                emoji: String::new(),
                team,
                position,
                movement: Vec::new(),
                actions: Vec::new(),
                abilities: Vec::new(),
                status_effects: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn movement_offsets(&self) -> &[Offset] {
        &self.movement
    }

    pub fn action_offsets(&self) -> &[Offset] {
        &self.actions
    }

    /// Squares the movement shape reaches from the current position.
    /// Not filtered by board bounds.
    pub fn potential_movement_targets(&self) -> impl Iterator<Item = Position> + '_ {
        self.movement.iter().map(|&offset| self.position + offset)
    }

    /// Squares the action shape reaches from the current position.
    /// Not filtered by board bounds.
    pub fn potential_action_targets(&self) -> impl Iterator<Item = Position> + '_ {
        self.actions.iter().map(|&offset| self.position + offset)
    }

    /// Abilities the piece was created with.
    pub fn abilities(&self) -> &[AbilityRef] {
        &self.abilities
    }

    pub fn status_effects(&self) -> &[StatusEffectInstance] {
        &self.status_effects
    }

    /// Own abilities followed by those granted by active status effects.
    pub fn all_abilities(&self) -> impl Iterator<Item = &AbilityRef> {
        self.abilities.iter().chain(
            self.status_effects
                .iter()
                .flat_map(|effect| effect.abilities().iter()),
        )
    }

    /// True if the piece, or one of its status effects, carries `kind`.
    pub fn has_ability(&self, kind: &AbilityKind) -> bool {
        self.all_abilities().any(|ability| ability.kind() == kind)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn status_effects_mut(&mut self) -> &mut Vec<StatusEffectInstance> {
        &mut self.status_effects
    }
}

/// Incremental constructor for [`Piece`], used by the factory and tests.
#[derive(Debug)]
pub struct PieceBuilder {
    piece: Piece,
}

impl PieceBuilder {
    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.piece.emoji = emoji.into();
        self
    }

    pub fn movement(mut self, offsets: Vec<Offset>) -> Self {
        self.piece.movement = offsets;
        self
    }

    pub fn actions(mut self, offsets: Vec<Offset>) -> Self {
        self.piece.actions = offsets;
        self
    }

    pub fn ability(mut self, ability: AbilityRef) -> Self {
        self.piece.abilities.push(ability);
        self
    }

    pub fn abilities(mut self, abilities: impl IntoIterator<Item = AbilityRef>) -> Self {
        self.piece.abilities.extend(abilities);
        self
    }

    pub fn build(self) -> Piece {
        self.piece
    }
}
