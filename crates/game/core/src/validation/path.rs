use crate::state::{Offset, Position};

/// Squares strictly between `start` and `end` along a rook or bishop line.
///
/// Anything that is not orthogonal or diagonal (knight hops, arbitrary
/// offsets) has no path and yields nothing. Adjacent squares yield nothing
/// either.
pub fn path_between(start: Position, end: Position) -> Vec<Position> {
    let Offset { dx, dy } = start.offset_to(end);

    let straight = dx == 0 || dy == 0 || dx.abs() == dy.abs();
    if !straight {
        return Vec::new();
    }

    let (step_x, step_y) = (dx.signum(), dy.signum());
    let steps = dx.abs().max(dy.abs());
    (1..steps)
        .map(|k| Position::new(start.x + step_x * k, start.y + step_y * k))
        .collect()
}
