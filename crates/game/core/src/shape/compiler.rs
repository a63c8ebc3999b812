//! [`ShapeNode`] → offset list evaluation.

use super::combinators::{intersect, reflect, subtract, union};
use super::primitives::{circle, cone, point, ray, square};
use super::ShapeNode;
use crate::state::Offset;

/// Evaluates a shape tree into a flat list of relative offsets.
///
/// Combinator results are de-duplicated; leaf primitives never contain
/// duplicates themselves.
pub fn compile_shape(node: &ShapeNode) -> Vec<Offset> {
    match node {
        ShapeNode::Circle { radius } => circle(*radius),
        ShapeNode::Square { size } => square(*size),
        ShapeNode::Ray { dirs, min, max } => ray(dirs, *min, *max),
        ShapeNode::Point { delta } => point(*delta),
        ShapeNode::Cone { dir, length } => cone(*dir, *length),
        ShapeNode::Union(shapes) => union(&compile_all(shapes)),
        ShapeNode::Intersect(shapes) => intersect(&compile_all(shapes)),
        ShapeNode::Subtract { base, cutters } => {
            subtract(&compile_shape(base), &compile_all(cutters))
        }
        ShapeNode::Reflect { axis, shapes } => {
            let children = compile_all(shapes);
            let combined = union(&children);
            let reflected = reflect(&combined, *axis);
            union(&[reflected, combined])
        }
    }
}

fn compile_all(nodes: &[ShapeNode]) -> Vec<Vec<Offset>> {
    nodes.iter().map(compile_shape).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::parse_shape_json;
    use serde_json::json;
    use std::collections::HashSet;

    fn compile(raw: serde_json::Value) -> Vec<Offset> {
        compile_shape(&parse_shape_json(&raw).unwrap())
    }

    fn assert_unique(offsets: &[Offset]) {
        let set: HashSet<_> = offsets.iter().collect();
        assert_eq!(set.len(), offsets.len(), "duplicates in {offsets:?}");
    }

    #[test]
    fn union_of_circle_and_ray() {
        let offsets = compile(json!({
            "kind": "union",
            "shapes": [
                { "kind": "circle", "radius": 1 },
                { "kind": "ray", "dirs": ["N"], "min": 1, "max": 3 }
            ]
        }));
        // (0, 1) is shared between the circle and the ray
        assert_eq!(offsets.len(), 4 + 2);
        assert_unique(&offsets);
        assert!(offsets.contains(&Offset::new(0, 3)));
    }

    #[test]
    fn reflect_includes_originals_and_mirrors() {
        let offsets = compile(json!({
            "kind": "reflect",
            "axis": "both",
            "shapes": [
                { "kind": "point", "delta": { "x": 1, "y": 2 } },
                { "kind": "point", "delta": { "x": 2, "y": 1 } }
            ]
        }));
        assert_eq!(offsets.len(), 8);
        assert_unique(&offsets);
        assert_eq!(offsets[0], Offset::new(1, 2));
        assert_eq!(offsets[1], Offset::new(2, 1));
    }

    #[test]
    fn subtract_removes_every_cutter() {
        let offsets = compile(json!({
            "kind": "subtract",
            "shapes": [
                { "kind": "square", "size": 1 },
                { "kind": "ray", "dirs": ["N", "S"], "min": 1, "max": 1 },
                { "kind": "ray", "dirs": ["E", "W"], "min": 1, "max": 1 }
            ]
        }));
        let expected: HashSet<_> = [(1, 1), (1, -1), (-1, 1), (-1, -1)]
            .into_iter()
            .map(Offset::from)
            .collect();
        assert_eq!(offsets.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn intersect_of_circle_and_square_is_the_inner_square() {
        let offsets = compile(json!({
            "kind": "intersect",
            "shapes": [
                { "kind": "circle", "radius": 2 },
                { "kind": "square", "size": 1 }
            ]
        }));
        assert_eq!(offsets.len(), 8);
        assert!(offsets.iter().all(|o| o.chebyshev() == 1));
    }

    #[test]
    fn point_origin_survives_compilation() {
        assert_eq!(
            compile(json!({ "kind": "point", "delta": { "x": 0, "y": 0 } })),
            vec![Offset::ZERO]
        );
    }

    #[test]
    fn flamethrower_pattern_has_no_duplicates() {
        let offsets = compile(json!({
            "kind": "union",
            "shapes": [
                { "kind": "cone", "dir": "N", "length": 3 },
                { "kind": "cone", "dir": "NE", "length": 3 },
                { "kind": "cone", "dir": "NW", "length": 3 },
                { "kind": "circle", "radius": 1 }
            ]
        }));
        assert_unique(&offsets);
        assert!(offsets.contains(&Offset::new(0, -1)));
        assert!(offsets.contains(&Offset::new(-3, 1)));
    }
}
