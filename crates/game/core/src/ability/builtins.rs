//! Abilities registered by [`super::AbilityRegistry::with_builtins`].
//!
//! Each one reacts only to events whose source piece carries its kind, so a
//! single shared instance per piece can subscribe globally without affecting
//! other pieces.

use super::{Ability, AbilityFault, AbilityKind, AbilityParams};
use crate::event::{EventContext, GameEventKind, flags, payload};

/// True when the event's source piece carries `kind`.
fn source_has(ctx: &EventContext<'_>, kind: &AbilityKind) -> bool {
    ctx.source().is_some_and(|piece| piece.has_ability(kind))
}

/// Cancels every move the carrying piece starts.
#[derive(Debug)]
pub struct ImmobileAbility {
    kind: AbilityKind,
}

impl ImmobileAbility {
    pub fn new(_params: &AbilityParams) -> Self {
        Self::default()
    }
}

impl Default for ImmobileAbility {
    fn default() -> Self {
        Self {
            kind: AbilityKind::Immobile,
        }
    }
}

impl Ability for ImmobileAbility {
    fn kind(&self) -> &AbilityKind {
        &self.kind
    }

    fn triggers(&self) -> &[GameEventKind] {
        &[GameEventKind::MoveStart]
    }

    fn priority(&self) -> i32 {
        // Block before anything else reacts to the move
        100
    }

    fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
        if source_has(ctx, &self.kind) {
            ctx.cancel();
        }
        Ok(())
    }
}

/// Lets the carrying piece move over occupied squares.
#[derive(Debug)]
pub struct JumpingAbility {
    kind: AbilityKind,
}

impl JumpingAbility {
    pub fn new(_params: &AbilityParams) -> Self {
        Self::default()
    }
}

impl Default for JumpingAbility {
    fn default() -> Self {
        Self {
            kind: AbilityKind::Jumping,
        }
    }
}

impl Ability for JumpingAbility {
    fn kind(&self) -> &AbilityKind {
        &self.kind
    }

    fn triggers(&self) -> &[GameEventKind] {
        &[GameEventKind::MoveValidate]
    }

    fn priority(&self) -> i32 {
        50
    }

    fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
        if source_has(ctx, &self.kind) {
            ctx.set_flag(flags::IGNORE_PATH_BLOCKING, true);
        }
        Ok(())
    }
}

/// Restricts the carrying piece's actions to friendly pieces.
#[derive(Debug)]
pub struct TargetAlliesOnlyAbility {
    kind: AbilityKind,
}

impl TargetAlliesOnlyAbility {
    pub fn new(_params: &AbilityParams) -> Self {
        Self::default()
    }
}

impl Default for TargetAlliesOnlyAbility {
    fn default() -> Self {
        Self {
            kind: AbilityKind::TargetAlliesOnly,
        }
    }
}

impl Ability for TargetAlliesOnlyAbility {
    fn kind(&self) -> &AbilityKind {
        &self.kind
    }

    fn triggers(&self) -> &[GameEventKind] {
        &[GameEventKind::ActionValidate]
    }

    fn priority(&self) -> i32 {
        50
    }

    fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
        if source_has(ctx, &self.kind) {
            ctx.set_flag(flags::ALLOW_TARGET_ALLY, true);
            ctx.set_flag(flags::ALLOW_TARGET_ENEMY, false);
        }
        Ok(())
    }
}

/// Ends the game when the carrying piece is captured.
///
/// The capture event's source is the captured piece. The engine reads
/// [`payload::GAME_OVER_TRIGGERED`] and [`payload::LOSING_TEAM`] after the
/// dispatch.
#[derive(Debug)]
pub struct KingAbility {
    kind: AbilityKind,
}

impl KingAbility {
    pub fn new(_params: &AbilityParams) -> Self {
        Self::default()
    }
}

impl Default for KingAbility {
    fn default() -> Self {
        Self {
            kind: AbilityKind::King,
        }
    }
}

impl Ability for KingAbility {
    fn kind(&self) -> &AbilityKind {
        &self.kind
    }

    fn triggers(&self) -> &[GameEventKind] {
        &[GameEventKind::Capture]
    }

    fn priority(&self) -> i32 {
        100
    }

    fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
        let Some(captured) = ctx.source() else {
            return Ok(());
        };
        if !captured.has_ability(&self.kind) {
            return Ok(());
        }

        tracing::info!(piece = %captured.id(), team = %captured.team(), "king captured");
        ctx.set_payload(payload::GAME_OVER_TRIGGERED, true);
        ctx.set_payload(payload::LOSING_TEAM, captured.team().to_string());
        Ok(())
    }
}
