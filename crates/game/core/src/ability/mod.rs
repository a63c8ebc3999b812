//! Abilities: capabilities that subscribe to game events and rewrite the
//! shared [`EventContext`].
//!
//! Every ability carries an [`AbilityKind`] tag. Pieces and status effects are
//! queried by that tag, never by the concrete Rust type behind the trait
//! object.

mod builtins;
mod registry;

pub use builtins::{ImmobileAbility, JumpingAbility, KingAbility, TargetAlliesOnlyAbility};
pub use registry::{AbilityConstructor, AbilityNotRegistered, AbilityRegistry};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::event::{EventContext, GameEventKind};

/// Free-form constructor arguments taken from blueprint data.
pub type AbilityParams = serde_json::Map<String, serde_json::Value>;

/// Shared handle to a live ability instance.
///
/// Two handles name the same listener only when they point at the same
/// allocation; see [`same_instance`].
pub type AbilityRef = Arc<dyn Ability>;

/// A capability that reacts to game events.
///
/// Implementations run inside a single synchronous dispatch and must not
/// assume anything about listeners other than their relative priority.
pub trait Ability: Send + Sync + fmt::Debug {
    /// Tag compared by value in [`crate::piece::Piece::has_ability`].
    fn kind(&self) -> &AbilityKind;

    /// Event kinds this ability subscribes to.
    fn triggers(&self) -> &[GameEventKind];

    /// Returns the priority of this ability. Lower values run first.
    /// Default priority is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Reacts to one event. Returning a fault aborts the rest of the dispatch.
    fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault>;
}

/// Pointer identity for ability handles.
pub fn same_instance(a: &AbilityRef, b: &AbilityRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Identifying tag of an ability.
///
/// Unknown names round-trip through [`AbilityKind::Custom`] so content can
/// register its own abilities without touching this enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbilityKind {
    Immobile,
    Jumping,
    TargetAlliesOnly,
    King,
    Custom(String),
}

impl AbilityKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Immobile => "Immobile",
            Self::Jumping => "Jumping",
            Self::TargetAlliesOnly => "TargetAlliesOnly",
            Self::King => "King",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for AbilityKind {
    fn from(name: &str) -> Self {
        match name {
            "Immobile" => Self::Immobile,
            "Jumping" => Self::Jumping,
            "TargetAlliesOnly" => Self::TargetAlliesOnly,
            "King" => Self::King,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl FromStr for AbilityKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure raised by an ability handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AbilityFault {
    pub message: String,
}

impl AbilityFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
