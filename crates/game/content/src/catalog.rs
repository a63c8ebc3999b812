//! Named collection of piece blueprints.

use std::collections::BTreeMap;
use std::path::Path;

use playground_core::{AbilityRegistry, GameConfig, PieceBlueprint, PieceFactory, Position, Team};
use tracing::info;

use crate::loaders::{BlueprintLoader, LoadResult};

/// Blueprints shipped with the crate, as `(file name, JSON)` pairs.
const BUILTIN_BLUEPRINTS: [(&str, &str); 6] = [
    ("pawn.json", include_str!("../data/pieces/pawn.json")),
    ("rook.json", include_str!("../data/pieces/rook.json")),
    ("knight.json", include_str!("../data/pieces/knight.json")),
    ("bishop.json", include_str!("../data/pieces/bishop.json")),
    ("queen.json", include_str!("../data/pieces/queen.json")),
    ("king.json", include_str!("../data/pieces/king.json")),
];

/// Blueprints keyed by their `name` field.
#[derive(Clone, Debug, Default)]
pub struct BlueprintCatalog {
    blueprints: BTreeMap<String, PieceBlueprint>,
}

impl BlueprintCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six standard chess pieces bundled with this crate.
    pub fn builtin() -> LoadResult<Self> {
        let mut catalog = Self::new();
        for (file, content) in BUILTIN_BLUEPRINTS {
            let blueprint = BlueprintLoader::parse(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse bundled blueprint {}: {}", file, e))?;
            catalog.insert(blueprint);
        }
        Ok(catalog)
    }

    /// Loads every blueprint in `dir`. Duplicate names are an error.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let mut catalog = Self::new();
        for blueprint in BlueprintLoader::load_dir(dir)? {
            let name = blueprint.name.clone();
            if catalog.insert(blueprint).is_some() {
                anyhow::bail!(
                    "Duplicate blueprint '{}' in directory {}",
                    name,
                    dir.display()
                );
            }
        }
        info!(dir = %dir.display(), count = catalog.len(), "blueprint catalog loaded");
        Ok(catalog)
    }

    /// Adds or replaces a blueprint, returning the one it replaced.
    pub fn insert(&mut self, blueprint: PieceBlueprint) -> Option<PieceBlueprint> {
        self.blueprints.insert(blueprint.name.clone(), blueprint)
    }

    pub fn get(&self, name: &str) -> Option<&PieceBlueprint> {
        self.blueprints.get(name)
    }

    /// Looks up a blueprint, failing with the known names listed.
    pub fn require(&self, name: &str) -> LoadResult<&PieceBlueprint> {
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown blueprint '{}' (known: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blueprints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    /// Builds one throwaway piece per blueprint so that bad shapes or unknown
    /// abilities surface before a game starts.
    pub fn validate(&self, registry: &AbilityRegistry, config: &GameConfig) -> LoadResult<()> {
        let mut factory = PieceFactory::from_config(registry, config);
        for blueprint in self.blueprints.values() {
            factory
                .create(blueprint, Team::White, Position::new(0, 0))
                .map_err(|e| anyhow::anyhow!("Invalid blueprint '{}': {}", blueprint.name, e))?;
        }
        Ok(())
    }
}
