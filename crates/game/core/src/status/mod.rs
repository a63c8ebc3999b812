//! Timed status effects that grant abilities to a piece.
//!
//! A [`StatusEffectDefinition`] is static content. Applying it creates a
//! [`StatusEffectInstance`] whose child abilities are fresh registry
//! instances; the engine subscribes them while the effect is active and
//! unsubscribes them when [`StatusEffectInstance::tick`] reports expiry.

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityNotRegistered, AbilityRef, AbilityRegistry};
use crate::piece::AbilitySpec;

/// How a repeated application of the same effect combines with the active one.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StackBehavior {
    /// Reset the remaining duration to the base duration.
    #[default]
    Refresh,
    /// Add the base duration to what remains.
    StackDuration,
    /// Keep the active effect untouched.
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectDefinition {
    pub name: String,
    /// Turns the effect lasts when first applied.
    pub base_duration: u32,
    #[serde(default)]
    pub stack_behavior: StackBehavior,
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
}

/// Result of applying a definition to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplication {
    Applied,
    Refreshed,
    Extended,
    Ignored,
}

/// An active effect on one piece.
#[derive(Clone, Debug)]
pub struct StatusEffectInstance {
    name: String,
    base_duration: u32,
    stack_behavior: StackBehavior,
    remaining: u32,
    abilities: Vec<AbilityRef>,
}

impl StatusEffectInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remaining_duration(&self) -> u32 {
        self.remaining
    }

    pub fn stack_behavior(&self) -> StackBehavior {
        self.stack_behavior
    }

    /// Child abilities granted while the effect is active.
    pub fn abilities(&self) -> &[AbilityRef] {
        &self.abilities
    }

    /// Counts down one turn. Returns `true` once the effect has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Combines a re-application of the same effect with this instance.
    pub fn restack(&mut self) -> StatusApplication {
        match self.stack_behavior {
            StackBehavior::Refresh => {
                self.remaining = self.base_duration;
                StatusApplication::Refreshed
            }
            StackBehavior::StackDuration => {
                self.remaining = self.remaining.saturating_add(self.base_duration);
                StatusApplication::Extended
            }
            StackBehavior::Ignore => StatusApplication::Ignored,
        }
    }
}

/// Instantiates status effects with abilities from the borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct StatusEffectFactory<'r> {
    registry: &'r AbilityRegistry,
}

impl<'r> StatusEffectFactory<'r> {
    pub fn new(registry: &'r AbilityRegistry) -> Self {
        Self { registry }
    }

    pub fn create(
        &self,
        definition: &StatusEffectDefinition,
    ) -> Result<StatusEffectInstance, AbilityNotRegistered> {
        let abilities = definition
            .abilities
            .iter()
            .map(|spec| self.registry.create(spec.name(), &spec.params()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatusEffectInstance {
            name: definition.name.clone(),
            base_duration: definition.base_duration,
            stack_behavior: definition.stack_behavior,
            remaining: definition.base_duration,
            abilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityKind;
    use serde_json::json;

    fn frozen(stack_behavior: StackBehavior) -> StatusEffectDefinition {
        StatusEffectDefinition {
            name: "frozen".into(),
            base_duration: 2,
            stack_behavior,
            abilities: vec![AbilitySpec::Name("Immobile".into())],
        }
    }

    #[test]
    fn definition_deserializes_with_defaults() {
        let def: StatusEffectDefinition = serde_json::from_value(json!({
            "name": "haste",
            "base_duration": 3,
            "stack_behavior": "stack_duration"
        }))
        .unwrap();
        assert_eq!(def.stack_behavior, StackBehavior::StackDuration);
        assert!(def.abilities.is_empty());
    }

    #[test]
    fn tick_counts_down_to_expiry() {
        let registry = AbilityRegistry::with_builtins();
        let mut effect = StatusEffectFactory::new(&registry)
            .create(&frozen(StackBehavior::Refresh))
            .unwrap();
        assert_eq!(effect.abilities()[0].kind(), &AbilityKind::Immobile);
        assert!(!effect.tick());
        assert!(effect.tick());
        assert!(effect.tick());
        assert_eq!(effect.remaining_duration(), 0);
    }

    #[test]
    fn restack_follows_behavior() {
        let registry = AbilityRegistry::with_builtins();
        let factory = StatusEffectFactory::new(&registry);

        let mut refresh = factory.create(&frozen(StackBehavior::Refresh)).unwrap();
        refresh.tick();
        assert_eq!(refresh.restack(), StatusApplication::Refreshed);
        assert_eq!(refresh.remaining_duration(), 2);

        let mut stack = factory.create(&frozen(StackBehavior::StackDuration)).unwrap();
        stack.tick();
        assert_eq!(stack.restack(), StatusApplication::Extended);
        assert_eq!(stack.remaining_duration(), 3);

        let mut ignore = factory.create(&frozen(StackBehavior::Ignore)).unwrap();
        ignore.tick();
        assert_eq!(ignore.restack(), StatusApplication::Ignored);
        assert_eq!(ignore.remaining_duration(), 1);
    }

    #[test]
    fn unknown_child_ability_fails() {
        let registry = AbilityRegistry::new();
        let err = StatusEffectFactory::new(&registry)
            .create(&frozen(StackBehavior::Refresh))
            .unwrap_err();
        assert_eq!(err.name, "Immobile");
    }
}
