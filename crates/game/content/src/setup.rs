//! Starting placements.

use playground_core::{GameEngine, PieceId, Position, Team};
use tracing::info;

use crate::catalog::BlueprintCatalog;
use crate::loaders::LoadResult;

/// One piece to put on the board before the game starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub blueprint: String,
    pub team: Team,
    pub position: Position,
}

impl Placement {
    pub fn new(blueprint: impl Into<String>, team: Team, position: Position) -> Self {
        Self {
            blueprint: blueprint.into(),
            team,
            position,
        }
    }
}

const BACK_RANK: [&str; 8] = [
    "rook", "knight", "bishop", "queen", "king", "bishop", "knight", "rook",
];

/// The classical opening position on an 8×8 board, white on rows 0 and 1.
///
/// Pieces are listed white first, back rank before pawns, left to right.
pub fn standard_setup() -> Vec<Placement> {
    let mut placements = Vec::with_capacity(32);
    for (team, back, pawns) in [(Team::White, 0, 1), (Team::Black, 7, 6)] {
        for (x, name) in (0..).zip(BACK_RANK) {
            placements.push(Placement::new(name, team, Position::new(x, back)));
        }
        for x in 0..8 {
            placements.push(Placement::new("pawn", team, Position::new(x, pawns)));
        }
    }
    placements
}

/// Adds every placement to `engine`, resolving blueprints from `catalog`.
pub fn populate(
    engine: &mut GameEngine<'_>,
    catalog: &BlueprintCatalog,
    placements: &[Placement],
) -> LoadResult<Vec<PieceId>> {
    let mut ids = Vec::with_capacity(placements.len());
    for placement in placements {
        let blueprint = catalog.require(&placement.blueprint)?;
        let id = engine
            .add_piece(blueprint, placement.team, placement.position)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to place {} {} at {}: {}",
                    placement.team,
                    placement.blueprint,
                    placement.position,
                    e
                )
            })?;
        ids.push(id);
    }
    info!(count = ids.len(), "board populated");
    Ok(ids)
}
