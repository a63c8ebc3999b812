use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    AbilityParams, AbilityRef, ImmobileAbility, JumpingAbility, KingAbility,
    TargetAlliesOnlyAbility,
};
use crate::error::{ErrorSeverity, GameError};

/// Builds a fresh ability instance from blueprint parameters.
pub type AbilityConstructor = Arc<dyn Fn(&AbilityParams) -> AbilityRef + Send + Sync>;

/// Name → constructor table, built once and passed by reference to the
/// piece and status-effect factories.
#[derive(Clone, Default)]
pub struct AbilityRegistry {
    constructors: HashMap<String, AbilityConstructor>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `Immobile`, `Jumping`, `TargetAlliesOnly` and
    /// `King`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Immobile", |params| Arc::new(ImmobileAbility::new(params)));
        registry.register("Jumping", |params| Arc::new(JumpingAbility::new(params)));
        registry.register("TargetAlliesOnly", |params| {
            Arc::new(TargetAlliesOnlyAbility::new(params))
        });
        registry.register("King", |params| Arc::new(KingAbility::new(params)));
        registry
    }

    /// Registers `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&AbilityParams) -> AbilityRef + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Instantiates the ability registered under `name`.
    pub fn create(
        &self,
        name: &str,
        params: &AbilityParams,
    ) -> Result<AbilityRef, AbilityNotRegistered> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| AbilityNotRegistered {
                name: name.to_owned(),
            })?;
        Ok(constructor(params))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// A blueprint or status effect named an ability nobody registered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("ability \"{name}\" is not registered")]
pub struct AbilityNotRegistered {
    pub name: String,
}

impl GameError for AbilityNotRegistered {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "ABILITY_NOT_REGISTERED"
    }
}
