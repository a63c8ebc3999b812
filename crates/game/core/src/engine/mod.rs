//! Turn handling and the move/action pipeline.
//!
//! The [`GameEngine`] owns the board and the dispatcher. Every mutation goes
//! through one of its operations, which validate first, publish the
//! corresponding start event, apply the change, publish the end event and
//! hand the turn over.
//!
//! Ability faults abort an operation only while nothing has changed yet.
//! Once the board is mutated, faults from the follow-up events are logged
//! and the operation completes, so the turn is always handed over.

mod errors;

pub use errors::EngineError;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::ability::{AbilityRef, AbilityRegistry};
use crate::config::GameConfig;
use crate::event::{DispatchError, EventContext, EventDispatcher, GameEventKind, payload};
use crate::piece::{Piece, PieceBlueprint, PieceFactory};
use crate::state::{Board, BoardView, PieceId, Position, Team, TurnState};
use crate::status::{
    StatusApplication, StatusEffectDefinition, StatusEffectFactory, StatusEffectInstance,
};
use crate::validation::LegalityValidator;

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Pieces may be added; nothing may move yet.
    Setup,
    InProgress,
    Finished { losing_team: Team },
}

/// Result of a successful [`GameEngine::move_piece`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
}

/// Result of a successful [`GameEngine::perform_action`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub actor: PieceId,
    pub target: Position,
    /// Enemy piece removed by the action.
    pub captured: Option<PieceId>,
    /// Set when the capture ended the game.
    pub losing_team: Option<Team>,
}

/// Game engine that owns the board, the listener registry and turn state.
///
/// The ability registry is borrowed; both factories instantiate abilities
/// from it.
pub struct GameEngine<'r> {
    config: GameConfig,
    board: Board,
    dispatcher: EventDispatcher,
    pieces: PieceFactory<'r>,
    statuses: StatusEffectFactory<'r>,
    turn: TurnState,
    phase: GamePhase,
}

impl<'r> GameEngine<'r> {
    pub fn new(registry: &'r AbilityRegistry) -> Self {
        Self::with_config(registry, GameConfig::default())
    }

    pub fn with_config(registry: &'r AbilityRegistry, config: GameConfig) -> Self {
        Self {
            board: Board::with_dimensions(config.board_dimensions()),
            dispatcher: EventDispatcher::new(),
            pieces: PieceFactory::from_config(registry, &config),
            statuses: StatusEffectFactory::new(registry),
            turn: TurnState::default(),
            phase: GamePhase::Setup,
            config,
        }
    }

    // ===== queries =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.board.piece(id)
    }

    /// Validator bound to this engine's dispatcher.
    pub fn validator(&self) -> LegalityValidator<'_> {
        LegalityValidator::new(&self.dispatcher)
    }

    pub fn legal_moves(&self, id: PieceId) -> Result<Vec<Position>, EngineError> {
        let piece = self.lookup(id)?;
        Ok(self.validator().legal_moves(piece, &self.board))
    }

    pub fn legal_action_targets(
        &self,
        id: PieceId,
        action: &str,
    ) -> Result<Vec<Position>, EngineError> {
        let piece = self.lookup(id)?;
        Ok(self
            .validator()
            .legal_action_targets(piece, action, &self.board))
    }

    // ===== setup =====

    /// Creates a piece from `blueprint`, places it and subscribes its
    /// abilities.
    pub fn add_piece(
        &mut self,
        blueprint: &PieceBlueprint,
        team: Team,
        position: Position,
    ) -> Result<PieceId, EngineError> {
        let piece = self.pieces.create(blueprint, team, position)?;
        let id = piece.id();
        let abilities = piece.abilities().to_vec();
        self.board.place(piece)?;
        self.subscribe_all(&abilities);

        info!(%id, name = %blueprint.name, %team, %position, "piece added");
        Ok(id)
    }

    /// Leaves setup and gives the first turn to white.
    pub fn start_game(&mut self) -> Result<(), EngineError> {
        match self.phase {
            GamePhase::Setup => {}
            GamePhase::InProgress => return Err(EngineError::AlreadyStarted),
            GamePhase::Finished { losing_team } => {
                return Err(EngineError::GameFinished { losing_team });
            }
        }

        self.dispatch_bare(GameEventKind::GameStart)?;

        self.phase = GamePhase::InProgress;
        self.turn = TurnState::default();
        info!(pieces = self.board.len(), "game started");

        report_late_fault(self.dispatch_bare(GameEventKind::TurnStart));
        Ok(())
    }

    // ===== turn actions =====

    /// Moves a piece of the side to act to an empty square.
    pub fn move_piece(&mut self, id: PieceId, to: Position) -> Result<MoveOutcome, EngineError> {
        self.ensure_in_progress()?;
        let piece = self.active_piece(id)?;
        let from = piece.position();

        self.validator().validate_move(piece, to, &self.board)?;

        let mut ctx = EventContext::new(GameEventKind::MoveStart, &self.board)
            .with_source(piece)
            .with_move(from, to);
        self.dispatcher
            .dispatch(GameEventKind::MoveStart, &mut ctx)?;
        if ctx.is_cancelled() {
            debug!(%id, %from, %to, "move cancelled at start");
            return Err(EngineError::Cancelled {
                event: GameEventKind::MoveStart,
            });
        }

        self.board.relocate(id, to)?;
        info!(%id, %from, %to, "piece moved");

        report_late_fault(self.dispatch_piece_event(GameEventKind::MoveEnd, id, from, to));
        self.end_turn();

        Ok(MoveOutcome {
            piece: id,
            from,
            to,
        })
    }

    /// Performs `action` from a piece of the side to act on `target`.
    ///
    /// An enemy standing on the target is captured. Capturing a piece that
    /// carries `King` finishes the game.
    pub fn perform_action(
        &mut self,
        id: PieceId,
        target: Position,
        action: &str,
    ) -> Result<ActionOutcome, EngineError> {
        self.ensure_in_progress()?;
        let actor = self.active_piece(id)?;
        let from = actor.position();

        self.validator()
            .validate_action_target(actor, target, action, &self.board)?;

        let target_piece = self.board.piece_at(target);
        let mut ctx = EventContext::new(GameEventKind::ActionStart, &self.board)
            .with_source(actor)
            .with_target(target_piece)
            .with_move(from, target)
            .with_action(action, None);
        self.dispatcher
            .dispatch(GameEventKind::ActionStart, &mut ctx)?;
        if ctx.is_cancelled() {
            debug!(%id, %target, action, "action cancelled at start");
            return Err(EngineError::Cancelled {
                event: GameEventKind::ActionStart,
            });
        }

        let victim = target_piece
            .filter(|piece| piece.team() != actor.team())
            .map(Piece::id);

        let mut losing_team = None;
        if let Some(victim) = victim {
            losing_team = self.capture(victim, id)?;
        }

        report_late_fault(self.dispatch_piece_event(GameEventKind::ActionEnd, id, from, target));
        if losing_team.is_none() {
            self.end_turn();
        }

        Ok(ActionOutcome {
            actor: id,
            target,
            captured: victim,
            losing_team,
        })
    }

    /// Applies a status effect to a piece, honouring the definition's stack
    /// behaviour when the effect is already active.
    pub fn apply_status(
        &mut self,
        id: PieceId,
        definition: &StatusEffectDefinition,
    ) -> Result<StatusApplication, EngineError> {
        let piece = self
            .board
            .piece_mut(id)
            .ok_or(EngineError::PieceNotFound(id))?;

        if let Some(active) = piece
            .status_effects_mut()
            .iter_mut()
            .find(|effect| effect.name() == definition.name)
        {
            let outcome = active.restack();
            debug!(
                %id,
                status = %definition.name,
                ?outcome,
                remaining = active.remaining_duration(),
                "status re-applied"
            );
            return Ok(outcome);
        }

        let instance = self.statuses.create(definition)?;
        for ability in instance.abilities() {
            self.dispatcher.subscribe_ability(ability);
        }
        piece.status_effects_mut().push(instance);

        info!(
            %id,
            status = %definition.name,
            duration = definition.base_duration,
            "status applied"
        );
        Ok(StatusApplication::Applied)
    }

    // ===== internals =====

    fn lookup(&self, id: PieceId) -> Result<&Piece, EngineError> {
        self.board.piece(id).ok_or(EngineError::PieceNotFound(id))
    }

    /// Looks up a piece that belongs to the side to act.
    fn active_piece(&self, id: PieceId) -> Result<&Piece, EngineError> {
        let piece = self.lookup(id)?;
        if piece.team() != self.turn.current {
            return Err(EngineError::NotYourTurn {
                piece: id,
                team: piece.team(),
                current: self.turn.current,
            });
        }
        Ok(piece)
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.phase {
            GamePhase::InProgress => Ok(()),
            GamePhase::Setup => Err(EngineError::NotStarted),
            GamePhase::Finished { losing_team } => Err(EngineError::GameFinished { losing_team }),
        }
    }

    fn subscribe_all(&mut self, abilities: &[AbilityRef]) {
        for ability in abilities {
            self.dispatcher.subscribe_ability(ability);
        }
    }

    fn unsubscribe_all<'a>(&mut self, abilities: impl IntoIterator<Item = &'a AbilityRef>) {
        for ability in abilities {
            self.dispatcher.unsubscribe_all(ability);
        }
    }

    /// Removes `victim` after publishing the capture. Returns the losing team
    /// if the capture ended the game.
    ///
    /// A fault during the `Capture` dispatch leaves the board untouched.
    fn capture(&mut self, victim: PieceId, attacker: PieceId) -> Result<Option<Team>, EngineError> {
        let written = {
            let captured = self.lookup(victim)?;
            let at = captured.position();
            let mut ctx = EventContext::new(GameEventKind::Capture, &self.board)
                .with_source(captured)
                .with_target(self.board.piece(attacker))
                .with_move(at, at);
            self.dispatcher.dispatch(GameEventKind::Capture, &mut ctx)?;
            ctx.into_payload()
        };

        let removed = self.board.remove(victim)?;
        let abilities: Vec<_> = removed.all_abilities().cloned().collect();
        self.unsubscribe_all(&abilities);
        info!(%victim, by = %attacker, name = removed.name(), "piece captured");

        if written.get(payload::GAME_OVER_TRIGGERED) != Some(&Value::Bool(true)) {
            return Ok(None);
        }

        let losing_team = written
            .get(payload::LOSING_TEAM)
            .and_then(Value::as_str)
            .and_then(|team| team.parse::<Team>().ok())
            .unwrap_or_else(|| removed.team());
        self.finish(losing_team);
        Ok(Some(losing_team))
    }

    fn finish(&mut self, losing_team: Team) {
        self.phase = GamePhase::Finished { losing_team };
        self.turn.finished = true;
        info!(%losing_team, turn = self.turn.number, "game over");

        let mut ctx = EventContext::new(GameEventKind::GameOver, &self.board);
        ctx.set_payload(payload::LOSING_TEAM, losing_team.to_string());
        report_late_fault(self.dispatcher.dispatch(GameEventKind::GameOver, &mut ctx));
    }

    /// Ticks the finishing side's status effects, then passes the turn.
    fn end_turn(&mut self) {
        let team = self.turn.current;
        let affected: Vec<PieceId> = self
            .board
            .pieces()
            .filter(|piece| piece.team() == team && !piece.status_effects().is_empty())
            .map(Piece::id)
            .collect();

        for id in affected {
            let Some(piece) = self.board.piece_mut(id) else {
                warn!(%id, "piece vanished while ticking status effects");
                continue;
            };
            let effects = piece.status_effects_mut();
            let (expired, active): (Vec<StatusEffectInstance>, Vec<_>) = std::mem::take(effects)
                .into_iter()
                .map(|mut effect| {
                    effect.tick();
                    effect
                })
                .partition(StatusEffectInstance::is_expired);
            *effects = active;

            for effect in &expired {
                debug!(%id, status = effect.name(), "status expired");
                self.unsubscribe_all(effect.abilities());
            }
        }

        self.turn.advance();
        debug!(turn = self.turn.number, current = %self.turn.current, "turn started");
        report_late_fault(self.dispatch_bare(GameEventKind::TurnStart));
    }

    fn dispatch_bare(&self, kind: GameEventKind) -> Result<(), DispatchError> {
        let mut ctx = EventContext::new(kind, &self.board);
        self.dispatcher.dispatch(kind, &mut ctx)
    }

    fn dispatch_piece_event(
        &self,
        kind: GameEventKind,
        id: PieceId,
        from: Position,
        to: Position,
    ) -> Result<(), DispatchError> {
        let mut ctx = EventContext::new(kind, &self.board).with_move(from, to);
        if let Some(piece) = self.board.piece(id) {
            ctx = ctx.with_source(piece);
        }
        self.dispatcher.dispatch(kind, &mut ctx)
    }
}

/// Logs a fault raised by an event published after the board changed.
fn report_late_fault(result: Result<(), DispatchError>) {
    if let Err(err) = result {
        error!(
            event = %err.event,
            ability = %err.ability,
            fault = %err.fault,
            "ability fault after the board changed; keeping the change"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::ability::{Ability, AbilityFault, AbilityKind};
    use crate::piece::AbilitySpec;
    use crate::status::StackBehavior;
    use crate::validation::Rejection;

    fn blueprint(raw: serde_json::Value) -> PieceBlueprint {
        serde_json::from_value(raw).unwrap()
    }

    fn rook() -> PieceBlueprint {
        blueprint(json!({
            "name": "rook",
            "movement": { "kind": "ray", "dirs": ["N", "E", "S", "W"], "min": 1, "max": 7 },
            "attack": { "kind": "ray", "dirs": ["N", "E", "S", "W"], "min": 1, "max": 7 }
        }))
    }

    fn king() -> PieceBlueprint {
        blueprint(json!({
            "name": "king",
            "movement": { "kind": "square", "size": 1 },
            "attack": { "kind": "square", "size": 1 },
            "abilities": ["King"]
        }))
    }

    fn frozen() -> StatusEffectDefinition {
        StatusEffectDefinition {
            name: "frozen".into(),
            base_duration: 1,
            stack_behavior: StackBehavior::Refresh,
            abilities: vec![AbilitySpec::Name("Immobile".into())],
        }
    }

    #[test]
    fn turn_order_is_enforced() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let white = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        let black = engine.add_piece(&rook(), Team::Black, Position::new(7, 7)).unwrap();

        assert_eq!(
            engine.move_piece(white, Position::new(0, 1)),
            Err(EngineError::NotStarted)
        );
        engine.start_game().unwrap();
        assert_eq!(engine.start_game(), Err(EngineError::AlreadyStarted));

        assert!(matches!(
            engine.move_piece(black, Position::new(7, 6)),
            Err(EngineError::NotYourTurn { .. })
        ));
        engine.move_piece(white, Position::new(0, 4)).unwrap();
        assert_eq!(engine.turn().current, Team::Black);
        assert_eq!(engine.turn().number, 2);
        assert_eq!(
            engine.piece(white).unwrap().position(),
            Position::new(0, 4)
        );
    }

    #[test]
    fn illegal_move_keeps_the_turn() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let white = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        engine.start_game().unwrap();

        let err = engine.move_piece(white, Position::new(1, 1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Illegal(Rejection::OutsideShape { .. })
        ));
        assert_eq!(engine.turn().current, Team::White);
    }

    #[test]
    fn capturing_the_king_ends_the_game() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let white = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        let black_king = engine.add_piece(&king(), Team::Black, Position::new(0, 5)).unwrap();
        engine.start_game().unwrap();

        let outcome = engine
            .perform_action(white, Position::new(0, 5), "attack")
            .unwrap();
        assert_eq!(outcome.captured, Some(black_king));
        assert_eq!(outcome.losing_team, Some(Team::Black));
        assert_eq!(
            engine.phase(),
            GamePhase::Finished {
                losing_team: Team::Black
            }
        );
        assert!(engine.piece(black_king).is_none());
        assert_eq!(engine.dispatcher().listener_count(GameEventKind::Capture), 0);
        assert!(matches!(
            engine.move_piece(white, Position::new(0, 1)),
            Err(EngineError::GameFinished { .. })
        ));
    }

    #[test]
    fn capturing_a_plain_piece_passes_the_turn() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let white = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        let black = engine.add_piece(&rook(), Team::Black, Position::new(3, 0)).unwrap();
        engine.start_game().unwrap();

        let outcome = engine
            .perform_action(white, Position::new(3, 0), "attack")
            .unwrap();
        assert_eq!(outcome.captured, Some(black));
        assert_eq!(outcome.losing_team, None);
        assert_eq!(engine.phase(), GamePhase::InProgress);
        assert_eq!(engine.turn().current, Team::Black);
        // The attacker stays where it was
        assert_eq!(engine.piece(white).unwrap().position(), Position::new(0, 0));
    }

    #[test]
    fn frozen_piece_is_cancelled_at_move_start() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let white = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        let black = engine.add_piece(&rook(), Team::Black, Position::new(7, 7)).unwrap();
        engine.start_game().unwrap();

        assert_eq!(engine.apply_status(black, &frozen()).unwrap(), StatusApplication::Applied);
        assert_eq!(engine.apply_status(black, &frozen()).unwrap(), StatusApplication::Refreshed);
        assert!(engine.piece(black).unwrap().has_ability(&AbilityKind::Immobile));
        assert_eq!(engine.dispatcher().listener_count(GameEventKind::MoveStart), 1);

        engine.move_piece(white, Position::new(0, 1)).unwrap();

        // Validation passes; the move is stopped when it starts
        assert!(engine.legal_moves(black).unwrap().contains(&Position::new(7, 6)));
        assert_eq!(
            engine.move_piece(black, Position::new(7, 6)),
            Err(EngineError::Cancelled {
                event: GameEventKind::MoveStart
            })
        );
        assert_eq!(engine.turn().current, Team::Black);
        assert_eq!(engine.piece(black).unwrap().position(), Position::new(7, 7));
    }

    #[test]
    fn status_expires_at_the_end_of_its_owners_turn() {
        let registry = AbilityRegistry::with_builtins();
        let mut engine = GameEngine::new(&registry);
        let frozen_rook = engine.add_piece(&rook(), Team::White, Position::new(0, 0)).unwrap();
        let free_rook = engine.add_piece(&rook(), Team::White, Position::new(1, 0)).unwrap();
        let black = engine.add_piece(&rook(), Team::Black, Position::new(7, 7)).unwrap();
        engine.start_game().unwrap();

        engine.apply_status(frozen_rook, &frozen()).unwrap();
        assert!(matches!(
            engine.move_piece(frozen_rook, Position::new(0, 1)),
            Err(EngineError::Cancelled { .. })
        ));

        // White's turn ends: the one-turn effect ticks down and expires
        engine.move_piece(free_rook, Position::new(1, 1)).unwrap();
        let piece = engine.piece(frozen_rook).unwrap();
        assert!(piece.status_effects().is_empty());
        assert!(!piece.has_ability(&AbilityKind::Immobile));
        assert_eq!(engine.dispatcher().listener_count(GameEventKind::MoveStart), 0);

        engine.move_piece(black, Position::new(7, 6)).unwrap();
        engine.move_piece(frozen_rook, Position::new(0, 1)).unwrap();
    }

    /// Fails on every end-of-move, end-of-action and turn-start event.
    #[derive(Debug)]
    struct Grudging {
        kind: AbilityKind,
    }

    impl Ability for Grudging {
        fn kind(&self) -> &AbilityKind {
            &self.kind
        }

        fn triggers(&self) -> &[GameEventKind] {
            &[
                GameEventKind::MoveEnd,
                GameEventKind::ActionEnd,
                GameEventKind::TurnStart,
            ]
        }

        fn on_trigger(&self, _ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
            Err(AbilityFault::new("refuses to cooperate"))
        }
    }

    fn grudging_registry() -> AbilityRegistry {
        let mut registry = AbilityRegistry::with_builtins();
        registry.register("Grudging", |_| -> AbilityRef {
            Arc::new(Grudging {
                kind: AbilityKind::Custom("Grudging".into()),
            })
        });
        registry
    }

    #[test]
    fn faults_after_the_board_changed_still_pass_the_turn() {
        let registry = grudging_registry();
        let mut engine = GameEngine::new(&registry);
        let grudging_rook = blueprint(json!({
            "name": "rook",
            "movement": { "kind": "ray", "dirs": ["N", "E", "S", "W"], "min": 1, "max": 7 },
            "attack": { "kind": "ray", "dirs": ["N", "E", "S", "W"], "min": 1, "max": 7 },
            "abilities": ["Grudging"]
        }));
        let mover = engine
            .add_piece(&grudging_rook, Team::White, Position::new(0, 0))
            .unwrap();
        engine
            .add_piece(&grudging_rook, Team::White, Position::new(5, 0))
            .unwrap();
        let black = engine.add_piece(&rook(), Team::Black, Position::new(0, 7)).unwrap();
        engine.start_game().unwrap();

        let outcome = engine.move_piece(mover, Position::new(0, 1)).unwrap();
        assert_eq!(outcome.to, Position::new(0, 1));
        assert_eq!(engine.piece(mover).unwrap().position(), Position::new(0, 1));
        assert_eq!(engine.turn().current, Team::Black);
        assert_eq!(engine.turn().number, 2);
        assert!(matches!(
            engine.move_piece(mover, Position::new(0, 2)),
            Err(EngineError::NotYourTurn { .. })
        ));

        let outcome = engine
            .perform_action(black, Position::new(0, 1), "attack")
            .unwrap();
        assert_eq!(outcome.captured, Some(mover));
        assert!(engine.piece(mover).is_none());
        assert_eq!(engine.turn().current, Team::White);
        assert_eq!(engine.turn().number, 3);
    }

    #[test]
    fn legal_queries_report_missing_pieces() {
        let registry = AbilityRegistry::with_builtins();
        let engine = GameEngine::new(&registry);
        assert_eq!(
            engine.legal_moves(PieceId(42)),
            Err(EngineError::PieceNotFound(PieceId(42)))
        );
    }
}
