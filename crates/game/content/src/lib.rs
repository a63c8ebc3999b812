//! Data-driven piece content for the playground.
//!
//! This crate ships the standard chess blueprints as JSON and loads custom
//! ones from disk:
//! - Piece blueprints (one JSON file per piece)
//! - The standard 8×8 opening placement
//!
//! Blueprints are plain [`PieceBlueprint`](playground_core::PieceBlueprint)
//! values; the core turns them into live pieces.

pub mod catalog;
pub mod loaders;
pub mod setup;

pub use catalog::BlueprintCatalog;
pub use loaders::{BlueprintLoader, LoadResult};
pub use setup::{Placement, populate, standard_setup};
