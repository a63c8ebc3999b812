//! Shape syntax tree.

use serde_json::{Value, json};

use super::Direction;
use crate::state::Offset;

/// Axis used by [`ShapeNode::Reflect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReflectAxis {
    /// Mirror left/right (negates `dx`).
    Horizontal,
    /// Mirror up/down (negates `dy`).
    Vertical,
    /// Both mirrors plus the point reflection through the origin.
    Both,
}

/// A validated shape expression.
///
/// Values are produced by [`parse_shape_json`](super::parse_shape_json), which
/// enforces every range constraint, so compiling a `ShapeNode` cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeNode {
    Circle {
        radius: u32,
    },
    Square {
        size: u32,
    },
    Ray {
        dirs: Vec<Direction>,
        min: u32,
        max: u32,
    },
    Point {
        delta: Offset,
    },
    Cone {
        dir: Direction,
        length: u32,
    },
    Union(Vec<ShapeNode>),
    Intersect(Vec<ShapeNode>),
    Subtract {
        base: Box<ShapeNode>,
        cutters: Vec<ShapeNode>,
    },
    Reflect {
        axis: ReflectAxis,
        shapes: Vec<ShapeNode>,
    },
}

impl ShapeNode {
    /// The `kind` token used in JSON.
    pub const fn kind(&self) -> &'static str {
        match self {
            ShapeNode::Circle { .. } => "circle",
            ShapeNode::Square { .. } => "square",
            ShapeNode::Ray { .. } => "ray",
            ShapeNode::Point { .. } => "point",
            ShapeNode::Cone { .. } => "cone",
            ShapeNode::Union(_) => "union",
            ShapeNode::Intersect(_) => "intersect",
            ShapeNode::Subtract { .. } => "subtract",
            ShapeNode::Reflect { .. } => "reflect",
        }
    }

    /// Renders the node back into the JSON grammar accepted by the parser.
    pub fn to_json(&self) -> Value {
        let children =
            |nodes: &[ShapeNode]| nodes.iter().map(ShapeNode::to_json).collect::<Vec<_>>();

        match self {
            ShapeNode::Circle { radius } => json!({ "kind": "circle", "radius": radius }),
            ShapeNode::Square { size } => json!({ "kind": "square", "size": size }),
            ShapeNode::Ray { dirs, min, max } => {
                let dirs: Vec<&str> = dirs.iter().map(|d| d.token()).collect();
                json!({ "kind": "ray", "dirs": dirs, "min": min, "max": max })
            }
            ShapeNode::Point { delta } => {
                json!({ "kind": "point", "delta": { "x": delta.dx, "y": delta.dy } })
            }
            ShapeNode::Cone { dir, length } => {
                json!({ "kind": "cone", "dir": dir.token(), "length": length })
            }
            ShapeNode::Union(shapes) => json!({ "kind": "union", "shapes": children(shapes) }),
            ShapeNode::Intersect(shapes) => {
                json!({ "kind": "intersect", "shapes": children(shapes) })
            }
            ShapeNode::Subtract { base, cutters } => {
                let mut shapes = vec![base.to_json()];
                shapes.extend(children(cutters));
                json!({ "kind": "subtract", "shapes": shapes })
            }
            ShapeNode::Reflect { axis, shapes } => json!({
                "kind": "reflect",
                "axis": axis.to_string(),
                "shapes": children(shapes),
            }),
        }
    }
}
