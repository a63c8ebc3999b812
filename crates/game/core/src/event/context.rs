use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::GameEventKind;
use crate::piece::Piece;
use crate::state::{BoardView, Position};

/// Validation flag names understood by the legality validator.
pub mod flags {
    /// Move validation skips the straight-line path check.
    pub const IGNORE_PATH_BLOCKING: &str = "ignorePathBlocking";
    /// An action may target the acting piece's own square.
    pub const ALLOW_TARGET_SELF: &str = "allowTargetSelf";
    /// An action may target a piece of the same team.
    pub const ALLOW_TARGET_ALLY: &str = "allowTargetAlly";
    /// An action may target a piece of the opposing team.
    pub const ALLOW_TARGET_ENEMY: &str = "allowTargetEnemy";
    /// Action validation skips the occupancy and relation checks entirely.
    pub const IGNORE_TARGETING_RULES: &str = "ignoreTargetingRules";
}

/// Payload keys written by built-in abilities.
pub mod payload {
    pub const GAME_OVER_TRIGGERED: &str = "gameOverTriggered";
    pub const LOSING_TEAM: &str = "losingTeam";
}

/// Scratchpad shared by every listener of one dispatch.
///
/// The identity half (kind, pieces, board, squares, action) is fixed at
/// construction. Listeners communicate through the mutable half:
/// cancellation, validation flags and the free-form payload. Cancellation is
/// one-way; once set it stays set for the rest of the dispatch.
pub struct EventContext<'a> {
    kind: GameEventKind,
    board: &'a dyn BoardView,
    source: Option<&'a Piece>,
    target: Option<&'a Piece>,
    from: Option<Position>,
    to: Option<Position>,
    action: Option<&'a str>,
    action_params: Option<&'a Map<String, Value>>,

    cancelled: bool,
    validation_flags: BTreeMap<String, Value>,
    payload: Map<String, Value>,
}

impl<'a> EventContext<'a> {
    /// Creates a context with the default flags for `kind`.
    pub fn new(kind: GameEventKind, board: &'a dyn BoardView) -> Self {
        Self {
            kind,
            board,
            source: None,
            target: None,
            from: None,
            to: None,
            action: None,
            action_params: None,
            cancelled: false,
            validation_flags: default_flags(kind),
            payload: Map::new(),
        }
    }

    pub fn with_source(mut self, piece: &'a Piece) -> Self {
        self.source = Some(piece);
        self
    }

    pub fn with_target(mut self, piece: Option<&'a Piece>) -> Self {
        self.target = piece;
        self
    }

    pub fn with_move(mut self, from: Position, to: Position) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_action(mut self, name: &'a str, params: Option<&'a Map<String, Value>>) -> Self {
        self.action = Some(name);
        self.action_params = params;
        self
    }

    // ===== identity =====

    pub fn kind(&self) -> GameEventKind {
        self.kind
    }

    pub fn board(&self) -> &'a dyn BoardView {
        self.board
    }

    /// The acting piece, or for [`GameEventKind::Capture`] the captured one.
    pub fn source(&self) -> Option<&'a Piece> {
        self.source
    }

    pub fn target(&self) -> Option<&'a Piece> {
        self.target
    }

    pub fn from(&self) -> Option<Position> {
        self.from
    }

    pub fn to(&self) -> Option<Position> {
        self.to
    }

    pub fn action(&self) -> Option<&'a str> {
        self.action
    }

    pub fn action_params(&self) -> Option<&'a Map<String, Value>> {
        self.action_params
    }

    // ===== cancellation =====

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    // ===== validation flags =====

    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.validation_flags.insert(name.into(), value.into());
    }

    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.validation_flags.get(name)
    }

    /// True only when the flag is present and exactly `true`.
    pub fn flag_enabled(&self, name: &str) -> bool {
        matches!(self.validation_flags.get(name), Some(Value::Bool(true)))
    }

    pub fn validation_flags(&self) -> &BTreeMap<String, Value> {
        &self.validation_flags
    }

    // ===== payload =====

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    pub fn set_payload(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.payload.insert(key.into(), value.into());
    }

    /// Consumes the context, keeping only what listeners wrote to the payload.
    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }
}

impl fmt::Debug for EventContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("kind", &self.kind)
            .field("source", &self.source.map(Piece::id))
            .field("target", &self.target.map(Piece::id))
            .field("from", &self.from)
            .field("to", &self.to)
            .field("action", &self.action)
            .field("cancelled", &self.cancelled)
            .field("validation_flags", &self.validation_flags)
            .field("payload", &self.payload)
            .finish()
    }
}

fn default_flags(kind: GameEventKind) -> BTreeMap<String, Value> {
    let seeded: &[(&str, bool)] = match kind {
        GameEventKind::ActionValidate => &[
            (flags::ALLOW_TARGET_SELF, false),
            (flags::ALLOW_TARGET_ALLY, false),
            (flags::ALLOW_TARGET_ENEMY, true),
            (flags::IGNORE_TARGETING_RULES, false),
        ],
        GameEventKind::MoveValidate => &[(flags::IGNORE_PATH_BLOCKING, false)],
        _ => &[],
    };

    seeded
        .iter()
        .map(|(name, value)| ((*name).to_owned(), Value::Bool(*value)))
        .collect()
}
