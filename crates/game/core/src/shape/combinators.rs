//! Set algebra over offset lists.
//!
//! Lists are treated as ordered sets: results never contain the same
//! coordinate twice and keep the order in which coordinates were first seen.

use std::collections::HashSet;

use super::ReflectAxis;
use crate::state::Offset;

/// Concatenates `lists`, keeping only the first occurrence of each offset.
pub fn union<L: AsRef<[Offset]>>(lists: &[L]) -> Vec<Offset> {
    let mut seen = HashSet::new();
    lists
        .iter()
        .flat_map(|list| list.as_ref().iter().copied())
        .filter(|offset| seen.insert(*offset))
        .collect()
}

/// Offsets of the first list that appear in every other list.
///
/// Intersecting zero lists yields an empty list.
pub fn intersect<L: AsRef<[Offset]>>(lists: &[L]) -> Vec<Offset> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };
    let others: Vec<HashSet<Offset>> = rest
        .iter()
        .map(|list| list.as_ref().iter().copied().collect())
        .collect();

    let mut seen = HashSet::new();
    first
        .as_ref()
        .iter()
        .copied()
        .filter(|offset| others.iter().all(|other| other.contains(offset)))
        .filter(|offset| seen.insert(*offset))
        .collect()
}

/// Offsets of `base` that appear in none of the `cutters`.
pub fn subtract<L: AsRef<[Offset]>>(base: &[Offset], cutters: &[L]) -> Vec<Offset> {
    let cut: HashSet<Offset> = cutters
        .iter()
        .flat_map(|list| list.as_ref().iter().copied())
        .collect();

    let mut seen = HashSet::new();
    base.iter()
        .copied()
        .filter(|offset| !cut.contains(offset))
        .filter(|offset| seen.insert(*offset))
        .collect()
}

/// `offsets` together with their mirror images across `axis`.
///
/// `Horizontal` negates `dx`, `Vertical` negates `dy`, `Both` adds all three
/// mirrored variants. Originals come first, then mirrors in input order.
pub fn reflect(offsets: &[Offset], axis: ReflectAxis) -> Vec<Offset> {
    let mirrored = offsets.iter().flat_map(|&offset| match axis {
        ReflectAxis::Horizontal => vec![offset.flip_x()],
        ReflectAxis::Vertical => vec![offset.flip_y()],
        ReflectAxis::Both => vec![offset.flip_x(), offset.flip_y(), -offset],
    });

    let mut seen = HashSet::new();
    offsets
        .iter()
        .copied()
        .chain(mirrored)
        .filter(|offset| seen.insert(*offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::primitives::{circle, square};

    fn o(dx: i32, dy: i32) -> Offset {
        Offset::new(dx, dy)
    }

    #[test]
    fn union_is_idempotent_and_keeps_first_seen_order() {
        let a = vec![o(1, 0), o(0, 1), o(1, 0)];
        assert_eq!(union(&[&a, &a]), vec![o(1, 0), o(0, 1)]);

        let b = vec![o(2, 2), o(0, 1)];
        assert_eq!(union(&[&a, &b]), vec![o(1, 0), o(0, 1), o(2, 2)]);
        assert!(union::<Vec<Offset>>(&[]).is_empty());
    }

    #[test]
    fn intersect_follows_first_list() {
        let a = circle(2);
        assert_eq!(intersect(&[&a, &a]), a);

        let sq = square(1);
        let result = intersect(&[&a, &sq]);
        let expected: Vec<Offset> = a.iter().copied().filter(|x| x.chebyshev() <= 1).collect();
        assert_eq!(result, expected);
        assert_eq!(result.len(), 8);
        assert!(intersect::<Vec<Offset>>(&[]).is_empty());
    }

    #[test]
    fn subtract_self_is_empty() {
        let a = circle(3);
        assert!(subtract(&a, &[&a]).is_empty());

        let ring = subtract(&circle(2), &[circle(1)]);
        assert_eq!(ring.len(), 12 - 4);
        assert!(ring.iter().all(|x| x.manhattan() == 2));
    }

    #[test]
    fn subtract_with_several_cutters() {
        let base = vec![o(1, 0), o(2, 0), o(3, 0)];
        let result = subtract(&base, &[vec![o(1, 0)], vec![o(3, 0)]]);
        assert_eq!(result, vec![o(2, 0)]);
    }

    #[test]
    fn reflect_both_axes_yields_four_corners() {
        let result = reflect(&[o(2, 3)], ReflectAxis::Both);
        assert_eq!(result.len(), 4);
        for expected in [o(2, 3), o(-2, 3), o(2, -3), o(-2, -3)] {
            assert!(result.contains(&expected));
        }
    }

    #[test]
    fn reflect_single_axis() {
        assert_eq!(
            reflect(&[o(2, 3)], ReflectAxis::Horizontal),
            vec![o(2, 3), o(-2, 3)]
        );
        assert_eq!(
            reflect(&[o(2, 3)], ReflectAxis::Vertical),
            vec![o(2, 3), o(2, -3)]
        );
        // offsets on the mirror line are not duplicated
        assert_eq!(reflect(&[o(0, 3)], ReflectAxis::Horizontal), vec![o(0, 3)]);
    }
}
