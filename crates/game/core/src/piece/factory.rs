use super::{Piece, PieceBlueprint};
use crate::ability::{AbilityNotRegistered, AbilityRegistry};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::shape::{self, ShapeDefinitionError, ShapeParser};
use crate::state::{PieceId, Position, Team};

/// Builds pieces from blueprints.
///
/// Both shapes are parsed and compiled here, once, and mirrored vertically
/// for [`Team::Black`]. Abilities are instantiated through the borrowed
/// registry, so every piece owns distinct ability instances.
#[derive(Debug)]
pub struct PieceFactory<'r> {
    registry: &'r AbilityRegistry,
    parser: ShapeParser,
    next_id: u32,
}

impl<'r> PieceFactory<'r> {
    pub fn new(registry: &'r AbilityRegistry) -> Self {
        Self::with_parser(registry, ShapeParser::default())
    }

    pub fn from_config(registry: &'r AbilityRegistry, config: &GameConfig) -> Self {
        Self::with_parser(registry, ShapeParser::from_config(config))
    }

    pub fn with_parser(registry: &'r AbilityRegistry, parser: ShapeParser) -> Self {
        Self {
            registry,
            parser,
            next_id: 1,
        }
    }

    pub fn registry(&self) -> &'r AbilityRegistry {
        self.registry
    }

    /// Creates a piece with the next free id.
    ///
    /// Fails without consuming an id if a shape is malformed or an ability is
    /// unknown.
    pub fn create(
        &mut self,
        blueprint: &PieceBlueprint,
        team: Team,
        position: Position,
    ) -> Result<Piece, PieceCreationError> {
        let piece = self.build(PieceId(self.next_id), blueprint, team, position)?;
        self.next_id += 1;
        Ok(piece)
    }

    fn build(
        &self,
        id: PieceId,
        blueprint: &PieceBlueprint,
        team: Team,
        position: Position,
    ) -> Result<Piece, PieceCreationError> {
        let movement = blueprint
            .movement
            .parse(&self.parser)
            .map_err(|source| PieceCreationError::Shape {
                blueprint: blueprint.name.clone(),
                field: "movement",
                source,
            })?;
        let attack = blueprint
            .attack
            .parse(&self.parser)
            .map_err(|source| PieceCreationError::Shape {
                blueprint: blueprint.name.clone(),
                field: "attack",
                source,
            })?;

        let abilities = blueprint
            .abilities
            .iter()
            .map(|spec| self.registry.create(spec.name(), &spec.params()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| PieceCreationError::Ability {
                blueprint: blueprint.name.clone(),
                source,
            })?;

        let mut movement = shape::compile_shape(&movement);
        let mut actions = shape::compile_shape(&attack);
        if team.mirrors_shapes() {
            movement = shape::mirror_vertical(&movement);
            actions = shape::mirror_vertical(&actions);
        }

        tracing::debug!(
            %id,
            name = %blueprint.name,
            %team,
            %position,
            movement = movement.len(),
            actions = actions.len(),
            "piece created"
        );

        Ok(Piece::builder(id, blueprint.name.as_str(), team, position)
            .emoji(blueprint.emoji.as_str())
            .movement(movement)
            .actions(actions)
            .abilities(abilities)
            .build())
    }
}

/// Piece creation aborted; nothing was placed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PieceCreationError {
    #[error("blueprint \"{blueprint}\" has an invalid {field} shape: {source}")]
    Shape {
        blueprint: String,
        field: &'static str,
        source: ShapeDefinitionError,
    },

    #[error("blueprint \"{blueprint}\": {source}")]
    Ability {
        blueprint: String,
        source: AbilityNotRegistered,
    },
}

impl GameError for PieceCreationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            PieceCreationError::Shape { .. } => "PIECE_INVALID_SHAPE",
            PieceCreationError::Ability { .. } => "PIECE_UNKNOWN_ABILITY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityKind;
    use crate::piece::{AbilitySpec, ShapeSource};
    use crate::state::Offset;
    use serde_json::json;

    fn pawn() -> PieceBlueprint {
        PieceBlueprint {
            name: "pawn".into(),
            emoji: "♟".into(),
            movement: ShapeSource::Encoded(
                r#"{"kind":"ray","dirs":["N"],"min":1,"max":1}"#.into(),
            ),
            attack: ShapeSource::Inline(json!({
                "kind": "union",
                "shapes": [
                    { "kind": "point", "delta": { "x": 1, "y": 1 } },
                    { "kind": "point", "delta": { "x": -1, "y": 1 } }
                ]
            })),
            abilities: vec![AbilitySpec::Name("Jumping".into())],
        }
    }

    #[test]
    fn white_keeps_and_black_mirrors_shapes() {
        let registry = AbilityRegistry::with_builtins();
        let mut factory = PieceFactory::new(&registry);

        let white = factory.create(&pawn(), Team::White, Position::new(0, 1)).unwrap();
        let black = factory.create(&pawn(), Team::Black, Position::new(0, 6)).unwrap();

        assert_eq!(white.id(), PieceId(1));
        assert_eq!(black.id(), PieceId(2));
        assert_eq!(white.movement_offsets(), &[Offset::new(0, 1)]);
        assert_eq!(black.movement_offsets(), &[Offset::new(0, -1)]);
        assert_eq!(
            black.action_offsets(),
            &[Offset::new(1, -1), Offset::new(-1, -1)]
        );
        assert!(white.has_ability(&AbilityKind::Jumping));
        assert_eq!(white.emoji(), "♟");
    }

    #[test]
    fn unknown_ability_fails_without_consuming_an_id() {
        let registry = AbilityRegistry::with_builtins();
        let mut factory = PieceFactory::new(&registry);

        let mut broken = pawn();
        broken.abilities.push(AbilitySpec::Name("Teleport".into()));
        let err = factory
            .create(&broken, Team::White, Position::ORIGIN)
            .unwrap_err();
        assert_eq!(err.error_code(), "PIECE_UNKNOWN_ABILITY");

        let ok = factory.create(&pawn(), Team::White, Position::ORIGIN).unwrap();
        assert_eq!(ok.id(), PieceId(1));
    }

    #[test]
    fn bad_shape_names_the_field() {
        let registry = AbilityRegistry::with_builtins();
        let mut factory = PieceFactory::new(&registry);

        let mut broken = pawn();
        broken.attack = ShapeSource::Inline(json!({ "kind": "circle", "radius": -1 }));
        match factory.create(&broken, Team::White, Position::ORIGIN) {
            Err(PieceCreationError::Shape { field, source, .. }) => {
                assert_eq!(field, "attack");
                assert_eq!(source.path, "$.radius");
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn pieces_get_distinct_ability_instances() {
        let registry = AbilityRegistry::with_builtins();
        let mut factory = PieceFactory::new(&registry);
        let a = factory.create(&pawn(), Team::White, Position::ORIGIN).unwrap();
        let b = factory.create(&pawn(), Team::White, Position::new(1, 0)).unwrap();
        assert!(!crate::ability::same_instance(
            &a.abilities()[0],
            &b.abilities()[0]
        ));
    }
}
