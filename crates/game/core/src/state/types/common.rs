use std::fmt;
use std::ops::{Add, Neg};

/// Unique identifier for a piece placed through the engine or a factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete board square expressed in grid coordinates.
///
/// `(0, 0)` is the bottom-left square; `y` grows towards the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset that leads from `self` to `other`.
    pub fn offset_to(self, other: Position) -> Offset {
        Offset::new(other.x.saturating_sub(self.x), other.y.saturating_sub(self.y))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    /// Saturates at the `i32` range.
    fn add(self, rhs: Offset) -> Position {
        Position::new(self.x.saturating_add(rhs.dx), self.y.saturating_add(rhs.dy))
    }
}

/// Relative displacement from a piece's current square.
///
/// Shape primitives and combinators produce lists of offsets; they are turned
/// into absolute squares by adding them to a [`Position`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Manhattan (taxicab) length.
    #[inline]
    pub fn manhattan(self) -> u32 {
        self.dx.unsigned_abs() + self.dy.unsigned_abs()
    }

    /// Chebyshev (king-move) length.
    #[inline]
    pub fn chebyshev(self) -> u32 {
        self.dx.unsigned_abs().max(self.dy.unsigned_abs())
    }

    pub const fn scale(self, k: i32) -> Self {
        Self::new(self.dx.saturating_mul(k), self.dy.saturating_mul(k))
    }

    pub const fn flip_x(self) -> Self {
        Self::new(self.dx.saturating_neg(), self.dy)
    }

    pub const fn flip_y(self) -> Self {
        Self::new(self.dx, self.dy.saturating_neg())
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(self.dx.saturating_neg(), self.dy.saturating_neg())
    }
}

impl From<(i32, i32)> for Offset {
    fn from((dx, dy): (i32, i32)) -> Self {
        Self::new(dx, dy)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.dx, self.dy)
    }
}

/// Side a piece plays for.
///
/// White advances towards increasing `y`. Black pieces have their shapes
/// mirrored vertically once at creation so blueprints can always be written
/// from white's point of view.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Team {
    White,
    Black,
}

impl Team {
    /// Returns the side that moves after this one.
    pub const fn opponent(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Returns true when blueprint shapes must be flipped along the y axis.
    pub const fn mirrors_shapes(self) -> bool {
        matches!(self, Team::Black)
    }
}
