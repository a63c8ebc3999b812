//! Geometric primitives.
//!
//! Every function returns offsets relative to the piece's square. None of them
//! produce duplicates; only [`point`] may produce the origin.

use super::Direction;
use crate::state::Offset;

/// Manhattan "circle" (a diamond): all offsets with `|dx| + |dy| <= radius`.
pub fn circle(radius: u32) -> Vec<Offset> {
    let r = radius as i32;
    let mut offsets = Vec::with_capacity((2 * radius * radius + 2 * radius) as usize);
    for dx in -r..=r {
        for dy in -r..=r {
            let offset = Offset::new(dx, dy);
            if !offset.is_zero() && offset.manhattan() <= radius {
                offsets.push(offset);
            }
        }
    }
    offsets
}

/// Chebyshev square: all offsets with `|dx| <= size` and `|dy| <= size`.
pub fn square(size: u32) -> Vec<Offset> {
    let s = size as i32;
    let side = (2 * size + 1) as usize;
    let mut offsets = Vec::with_capacity(side * side - 1);
    for dx in -s..=s {
        for dy in -s..=s {
            if dx != 0 || dy != 0 {
                offsets.push(Offset::new(dx, dy));
            }
        }
    }
    offsets
}

/// Straight lines: `unit(dir) * k` for every `dir` and `k` in `min..=max`.
///
/// Callers pass distinct directions; the parser guarantees it for DSL input.
pub fn ray(dirs: &[Direction], min: u32, max: u32) -> Vec<Offset> {
    dirs.iter()
        .flat_map(|dir| (min..=max).map(move |k| dir.unit().scale(k as i32)))
        .collect()
}

/// A single literal offset.
pub fn point(delta: Offset) -> Vec<Offset> {
    vec![delta]
}

/// Sector expanding from the origin towards `dir`.
///
/// Cardinal cones: layer `k` (1..=length) holds the cells whose distance along
/// the direction is `k` and whose sideways distance is below `k`, so the
/// layer is `2k - 1` wide.
///
/// Diagonal cones use `round(length / sqrt 2)` layers measured on a lattice
/// rotated by 45 degrees, which keeps their reach close to the cardinal one.
/// The approximation is not exactly symmetric for every length.
pub fn cone(dir: Direction, length: u32) -> Vec<Offset> {
    let diagonal_length = (f64::from(length) / std::f64::consts::SQRT_2).round() as i32;
    let length = length as i32;
    let bound = 2 * length;

    let mut offsets = Vec::new();
    for x in -bound..=bound {
        for y in -bound..=bound {
            if x == 0 && y == 0 {
                continue;
            }
            let Some((k, j)) = cone_coordinates(dir, x, y) else {
                continue;
            };
            let reach = if dir.is_diagonal() {
                diagonal_length
            } else {
                length
            };
            if k >= 1 && k <= reach && j < k {
                offsets.push(Offset::new(x, y));
            }
        }
    }
    offsets
}

/// Distance along the cone axis (`k`) and away from it (`j`) for cell `(x, y)`.
///
/// Returns `None` when a diagonal cone cannot contain the cell because it lies
/// outside the open quadrant the cone points into.
fn cone_coordinates(dir: Direction, x: i32, y: i32) -> Option<(i32, i32)> {
    // floor division on non-negative numerators only
    let rotated = |u: i32, v: i32| ((u + v + 1) / 2, (v - u).abs() / 2);

    match dir {
        Direction::North => Some((y, x.abs())),
        Direction::East => Some((x, y.abs())),
        Direction::South => Some((-y, x.abs())),
        Direction::West => Some((-x, y.abs())),
        Direction::NorthEast => (x > 0 && y > 0).then(|| rotated(x, y)),
        Direction::SouthEast => (x > 0 && y < 0).then(|| rotated(x, -y)),
        Direction::SouthWest => (x < 0 && y < 0).then(|| rotated(-x, -y)),
        Direction::NorthWest => (x < 0 && y > 0).then(|| rotated(-x, y)),
    }
}
