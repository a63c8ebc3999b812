//! The eight compass directions understood by the shape DSL.

use crate::state::Offset;

/// Compass direction token as written in shape JSON (`"N"`, `"NE"`, ...).
///
/// North is `+y`, east is `+x`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum Direction {
    #[strum(serialize = "N")]
    North,
    #[strum(serialize = "NE")]
    NorthEast,
    #[strum(serialize = "E")]
    East,
    #[strum(serialize = "SE")]
    SouthEast,
    #[strum(serialize = "S")]
    South,
    #[strum(serialize = "SW")]
    SouthWest,
    #[strum(serialize = "W")]
    West,
    #[strum(serialize = "NW")]
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit step for this direction.
    pub const fn unit(self) -> Offset {
        match self {
            Direction::North => Offset::new(0, 1),
            Direction::NorthEast => Offset::new(1, 1),
            Direction::East => Offset::new(1, 0),
            Direction::SouthEast => Offset::new(1, -1),
            Direction::South => Offset::new(0, -1),
            Direction::SouthWest => Offset::new(-1, -1),
            Direction::West => Offset::new(-1, 0),
            Direction::NorthWest => Offset::new(-1, 1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast
                | Direction::SouthEast
                | Direction::SouthWest
                | Direction::NorthWest
        )
    }

    /// Token as written in shape JSON.
    pub fn token(self) -> &'static str {
        self.into()
    }
}
