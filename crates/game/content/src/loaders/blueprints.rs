//! Piece blueprint loader.
//!
//! Each blueprint lives in its own `<name>.json` file.

use std::path::Path;

use playground_core::PieceBlueprint;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for piece blueprints stored as JSON.
pub struct BlueprintLoader;

impl BlueprintLoader {
    /// Load a single blueprint file.
    pub fn load(path: &Path) -> LoadResult<PieceBlueprint> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse blueprint {}: {}", path.display(), e))
    }

    /// Parse blueprint JSON already held in memory.
    pub fn parse(content: &str) -> LoadResult<PieceBlueprint> {
        let blueprint: PieceBlueprint = serde_json::from_str(content)?;
        if blueprint.name.trim().is_empty() {
            anyhow::bail!("blueprint name must not be empty");
        }
        Ok(blueprint)
    }

    /// Load every `*.json` file in `dir`, sorted by file name.
    ///
    /// Other files and subdirectories are skipped.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<PieceBlueprint>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            anyhow::anyhow!("Failed to read blueprint directory {}: {}", dir.display(), e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut blueprints = Vec::with_capacity(paths.len());
        for path in &paths {
            let blueprint = Self::load(path)?;
            debug!(path = %path.display(), name = %blueprint.name, "blueprint loaded");
            blueprints.push(blueprint);
        }
        Ok(blueprints)
    }
}
