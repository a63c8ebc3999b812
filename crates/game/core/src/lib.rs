//! Rules engine for a chess playground with programmable pieces.
//!
//! `playground-core` turns declarative piece blueprints into live pieces and
//! decides what each of them may legally do:
//!
//! - [`shape`] parses the JSON shape DSL and compiles it into offset lists.
//! - [`event`] carries the priority-ordered, cancellable dispatcher that lets
//!   [`ability`] instances rewrite the rules at fixed interception points.
//! - [`validation`] runs the staged move and action legality checks.
//! - [`engine::GameEngine`] owns the board and applies moves, actions,
//!   captures and status effects turn by turn.
pub mod ability;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod piece;
pub mod shape;
pub mod state;
pub mod status;
pub mod validation;

pub use ability::{
    Ability, AbilityFault, AbilityKind, AbilityNotRegistered, AbilityParams, AbilityRef,
    AbilityRegistry,
};
pub use config::GameConfig;
pub use engine::{ActionOutcome, EngineError, GameEngine, GamePhase, MoveOutcome};
pub use error::{ErrorSeverity, GameError};
pub use event::{DispatchError, EventContext, EventDispatcher, GameEventKind};
pub use piece::{AbilitySpec, Piece, PieceBlueprint, PieceCreationError, PieceFactory, ShapeSource};
pub use shape::{
    Direction, ReflectAxis, ShapeDefinitionError, ShapeNode, compile_shape, parse_shape_json,
    parse_shape_str,
};
pub use state::{
    Board, BoardDimensions, BoardError, BoardView, Offset, PieceId, Position, Team, TurnState,
};
pub use status::{
    StackBehavior, StatusApplication, StatusEffectDefinition, StatusEffectFactory,
    StatusEffectInstance,
};
pub use validation::{LegalityValidator, Rejection, TargetRelation};
