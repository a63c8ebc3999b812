pub mod common;
pub mod turn;

// Re-export common types
pub use common::{Offset, PieceId, Position, Team};

// Re-export turn state
pub use turn::TurnState;
