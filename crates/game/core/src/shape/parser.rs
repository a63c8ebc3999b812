//! Untyped JSON → [`ShapeNode`] validation.

use std::str::FromStr;

use serde_json::{Map, Value};

use super::error::{ShapeDefinitionError, ShapeErrorReason};
use super::{Direction, ReflectAxis, ShapeNode};
use crate::config::GameConfig;
use crate::state::Offset;

/// Validating parser for the shape DSL.
///
/// Every field is checked before the node is built, and children are parsed
/// recursively, so a failure anywhere in the tree aborts the whole parse.
#[derive(Clone, Copy, Debug)]
pub struct ShapeParser {
    max_extent: u32,
}

impl Default for ShapeParser {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_MAX_SHAPE_EXTENT)
    }
}

impl ShapeParser {
    /// Creates a parser that rejects radii, sizes, ray lengths and cone
    /// lengths above `max_extent`.
    pub const fn new(max_extent: u32) -> Self {
        Self { max_extent }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_shape_extent)
    }

    /// Parses shape JSON given as text.
    pub fn parse_str(&self, raw: &str) -> Result<ShapeNode, ShapeDefinitionError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| {
            ShapeDefinitionError::new("$", ShapeErrorReason::Syntax(e.to_string()))
        })?;
        self.parse(&value)
    }

    /// Parses an already decoded JSON value.
    pub fn parse(&self, raw: &Value) -> Result<ShapeNode, ShapeDefinitionError> {
        self.parse_node(raw, "$")
    }

    fn parse_node(&self, raw: &Value, path: &str) -> Result<ShapeNode, ShapeDefinitionError> {
        let object = raw.as_object().ok_or_else(|| {
            ShapeDefinitionError::new(path, ShapeErrorReason::NotAnObject(type_name(raw)))
        })?;
        let node = NodeReader { object, path };

        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| ShapeDefinitionError::new(path, ShapeErrorReason::MissingKind))?;

        match kind {
            "circle" => Ok(ShapeNode::Circle {
                radius: self.extent(&node, "radius", "circle.radius", 0)?,
            }),

            "square" => Ok(ShapeNode::Square {
                size: self.extent(&node, "size", "square.size", 0)?,
            }),

            "ray" => {
                let dirs = node.directions("dirs", "ray.dirs")?;
                let min = node.integer("min", "ray.min", RAY_BOUNDS)?;
                let max = node.integer("max", "ray.max", RAY_BOUNDS)?;
                if min < 1 || max < min {
                    return Err(node.invalid("min", "ray.min", RAY_BOUNDS));
                }
                let max = self.within_limit(&node, "max", "ray.max", max)?;
                Ok(ShapeNode::Ray {
                    dirs,
                    min: min as u32,
                    max,
                })
            }

            "point" => {
                const EXPECTED: &str = "an object {x: integer, y: integer}";
                let delta = node
                    .object
                    .get("delta")
                    .and_then(Value::as_object)
                    .ok_or_else(|| node.invalid("delta", "point.delta", EXPECTED))?;
                let coordinate = |key: &str| {
                    let value = delta
                        .get(key)
                        .and_then(as_integer)
                        .ok_or_else(|| node.invalid("delta", "point.delta", EXPECTED))?;
                    if value.unsigned_abs() > u64::from(self.max_extent) {
                        return Err(ShapeDefinitionError::new(
                            node.field_path("delta"),
                            ShapeErrorReason::ExtentTooLarge {
                                field: "point.delta",
                                value: value.unsigned_abs(),
                                max: self.max_extent,
                            },
                        ));
                    }
                    // |value| <= max_extent <= u32::MAX; clamp for extents past i32.
                    Ok(value.clamp(i64::from(i32::MIN + 1), i64::from(i32::MAX)) as i32)
                };
                Ok(ShapeNode::Point {
                    delta: Offset::new(coordinate("x")?, coordinate("y")?),
                })
            }

            "cone" => {
                let dir = node
                    .object
                    .get("dir")
                    .and_then(Value::as_str)
                    .and_then(|token| Direction::from_str(token).ok())
                    .ok_or_else(|| node.invalid("dir", "cone.dir", DIRECTION_TOKENS))?;
                Ok(ShapeNode::Cone {
                    dir,
                    length: self.extent(&node, "length", "cone.length", 1)?,
                })
            }

            "union" => Ok(ShapeNode::Union(self.children(&node, "union.shapes", 1)?)),

            "intersect" => Ok(ShapeNode::Intersect(self.children(&node, "intersect.shapes", 1)?)),

            "subtract" => {
                let mut shapes = self.children(&node, "subtract.shapes", 2)?.into_iter();
                let base = shapes.next().ok_or_else(|| {
                    node.invalid("shapes", "subtract.shapes", "an array of at least 2 shapes")
                })?;
                Ok(ShapeNode::Subtract {
                    base: Box::new(base),
                    cutters: shapes.collect(),
                })
            }

            "reflect" => {
                let axis = node
                    .object
                    .get("axis")
                    .and_then(Value::as_str)
                    .and_then(|token| ReflectAxis::from_str(token).ok())
                    .ok_or_else(|| {
                        node.invalid("axis", "reflect.axis", "one of horizontal, vertical, both")
                    })?;
                Ok(ShapeNode::Reflect {
                    axis,
                    shapes: self.children(&node, "reflect.shapes", 1)?,
                })
            }

            other => Err(ShapeDefinitionError::new(
                path,
                ShapeErrorReason::UnknownKind(other.to_owned()),
            )),
        }
    }

    /// Reads a non-negative integer field bounded below by `min` and above by
    /// the parser's extent limit.
    fn extent(
        &self,
        node: &NodeReader<'_>,
        key: &'static str,
        field: &'static str,
        min: i64,
    ) -> Result<u32, ShapeDefinitionError> {
        let expected = if min == 0 {
            "a non-negative integer"
        } else {
            "an integer >= 1"
        };
        let value = node.integer(key, field, expected)?;
        if value < min {
            return Err(node.invalid(key, field, expected));
        }
        self.within_limit(node, key, field, value)
    }

    fn within_limit(
        &self,
        node: &NodeReader<'_>,
        key: &'static str,
        field: &'static str,
        value: i64,
    ) -> Result<u32, ShapeDefinitionError> {
        if value > i64::from(self.max_extent) {
            return Err(ShapeDefinitionError::new(
                node.field_path(key),
                ShapeErrorReason::ExtentTooLarge {
                    field,
                    value: value as u64,
                    max: self.max_extent,
                },
            ));
        }
        Ok(value as u32)
    }

    fn children(
        &self,
        node: &NodeReader<'_>,
        field: &'static str,
        at_least: usize,
    ) -> Result<Vec<ShapeNode>, ShapeDefinitionError> {
        let expected = if at_least == 1 {
            "a non-empty array of shapes"
        } else {
            "an array of at least 2 shapes"
        };
        let shapes = node
            .object
            .get("shapes")
            .and_then(Value::as_array)
            .filter(|shapes| shapes.len() >= at_least)
            .ok_or_else(|| node.invalid("shapes", field, expected))?;

        shapes
            .iter()
            .enumerate()
            .map(|(index, child)| {
                self.parse_node(child, &format!("{}.shapes[{index}]", node.path))
            })
            .collect()
    }
}

const RAY_BOUNDS: &str = "integers with 1 <= min <= max";
const DIRECTION_TOKENS: &str = "one of N, NE, E, SE, S, SW, W, NW";

/// Field accessors for one JSON object, remembering where it sits in the tree.
struct NodeReader<'a> {
    object: &'a Map<String, Value>,
    path: &'a str,
}

impl NodeReader<'_> {
    fn field_path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    fn invalid(
        &self,
        key: &str,
        field: &'static str,
        expected: &'static str,
    ) -> ShapeDefinitionError {
        ShapeDefinitionError::new(
            self.field_path(key),
            ShapeErrorReason::InvalidField { field, expected },
        )
    }

    fn integer(
        &self,
        key: &str,
        field: &'static str,
        expected: &'static str,
    ) -> Result<i64, ShapeDefinitionError> {
        self.object
            .get(key)
            .and_then(as_integer)
            .ok_or_else(|| self.invalid(key, field, expected))
    }

    /// Reads a non-empty list of direction tokens. Repeated tokens collapse
    /// onto their first occurrence.
    fn directions(
        &self,
        key: &str,
        field: &'static str,
    ) -> Result<Vec<Direction>, ShapeDefinitionError> {
        const EXPECTED: &str = "a non-empty array of N, NE, E, SE, S, SW, W, NW";

        let tokens = self
            .object
            .get(key)
            .and_then(Value::as_array)
            .filter(|tokens| !tokens.is_empty())
            .ok_or_else(|| self.invalid(key, field, EXPECTED))?;

        let mut dirs = Vec::with_capacity(tokens.len());
        for token in tokens {
            let dir = token
                .as_str()
                .and_then(|t| Direction::from_str(t).ok())
                .ok_or_else(|| self.invalid(key, field, EXPECTED))?;
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        Ok(dirs)
    }
}

/// Integral JSON number, accepting `2.0` as well as `2`.
fn as_integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => number,
        _ => return None,
    };
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    let float = number.as_f64()?;
    (float.fract() == 0.0 && float.abs() < i64::MAX as f64).then_some(float as i64)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Result<ShapeNode, ShapeDefinitionError> {
        ShapeParser::default().parse(&raw)
    }

    fn reason_at(raw: Value) -> (String, ShapeErrorReason) {
        let err = parse(raw).unwrap_err();
        (err.path, err.reason)
    }

    #[test]
    fn parses_nested_union() {
        let node = parse(json!({
            "kind": "union",
            "shapes": [
                { "kind": "circle", "radius": 1 },
                { "kind": "ray", "dirs": ["N"], "min": 1, "max": 3 }
            ]
        }))
        .unwrap();

        assert_eq!(
            node,
            ShapeNode::Union(vec![
                ShapeNode::Circle { radius: 1 },
                ShapeNode::Ray {
                    dirs: vec![Direction::North],
                    min: 1,
                    max: 3
                },
            ])
        );
    }

    #[test]
    fn parses_every_leaf_kind() {
        assert_eq!(
            parse(json!({ "kind": "square", "size": 0 })).unwrap(),
            ShapeNode::Square { size: 0 }
        );
        assert_eq!(
            parse(json!({ "kind": "point", "delta": { "x": -2, "y": 0 } })).unwrap(),
            ShapeNode::Point {
                delta: Offset::new(-2, 0)
            }
        );
        assert_eq!(
            parse(json!({ "kind": "cone", "dir": "SW", "length": 2 })).unwrap(),
            ShapeNode::Cone {
                dir: Direction::SouthWest,
                length: 2
            }
        );
        assert_eq!(
            parse(json!({ "kind": "circle", "radius": 2.0 })).unwrap(),
            ShapeNode::Circle { radius: 2 }
        );
    }

    #[test]
    fn rejects_negative_or_fractional_radius() {
        let (path, reason) = reason_at(json!({ "kind": "circle", "radius": -1 }));
        assert_eq!(path, "$.radius");
        assert!(matches!(
            reason,
            ShapeErrorReason::InvalidField {
                field: "circle.radius",
                ..
            }
        ));

        assert!(parse(json!({ "kind": "circle", "radius": 1.5 })).is_err());
        assert!(parse(json!({ "kind": "square", "size": "2" })).is_err());
    }

    #[test]
    fn ray_bounds_are_checked() {
        for (min, max) in [(0, 3), (3, 2)] {
            let (path, _) =
                reason_at(json!({ "kind": "ray", "dirs": ["E"], "min": min, "max": max }));
            assert_eq!(path, "$.min");
        }
        assert!(parse(json!({ "kind": "ray", "dirs": [], "min": 1, "max": 1 })).is_err());
        assert!(parse(json!({ "kind": "ray", "dirs": ["UP"], "min": 1, "max": 1 })).is_err());
    }

    #[test]
    fn duplicate_ray_directions_collapse() {
        let node =
            parse(json!({ "kind": "ray", "dirs": ["N", "E", "N"], "min": 1, "max": 1 })).unwrap();
        assert_eq!(
            node,
            ShapeNode::Ray {
                dirs: vec![Direction::North, Direction::East],
                min: 1,
                max: 1
            }
        );
    }

    #[test]
    fn combinator_arity_is_enforced() {
        let (path, _) = reason_at(json!({ "kind": "union", "shapes": [] }));
        assert_eq!(path, "$.shapes");

        let (path, _) = reason_at(json!({
            "kind": "subtract",
            "shapes": [{ "kind": "circle", "radius": 1 }]
        }));
        assert_eq!(path, "$.shapes");

        let (path, _) = reason_at(json!({
            "kind": "reflect",
            "axis": "diagonal",
            "shapes": [{ "kind": "circle", "radius": 1 }]
        }));
        assert_eq!(path, "$.axis");
    }

    #[test]
    fn nested_errors_report_their_path() {
        let (path, reason) = reason_at(json!({
            "kind": "union",
            "shapes": [
                { "kind": "circle", "radius": 1 },
                {
                    "kind": "reflect",
                    "axis": "both",
                    "shapes": [{ "kind": "cone", "dir": "N", "length": 0 }]
                }
            ]
        }));
        assert_eq!(path, "$.shapes[1].shapes[0].length");
        assert!(matches!(
            reason,
            ShapeErrorReason::InvalidField {
                field: "cone.length",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_objects_and_unknown_kinds() {
        assert_eq!(
            reason_at(json!(3)).1,
            ShapeErrorReason::NotAnObject("number")
        );
        assert_eq!(reason_at(json!({ "radius": 3 })).1, ShapeErrorReason::MissingKind);
        assert_eq!(
            reason_at(json!({ "kind": "hexagon" })).1,
            ShapeErrorReason::UnknownKind("hexagon".into())
        );
    }

    #[test]
    fn extent_limit_applies() {
        let parser = ShapeParser::new(4);
        assert!(parser.parse(&json!({ "kind": "circle", "radius": 4 })).is_ok());
        let err = parser
            .parse(&json!({ "kind": "ray", "dirs": ["N"], "min": 1, "max": 5 }))
            .unwrap_err();
        assert!(matches!(err.reason, ShapeErrorReason::ExtentTooLarge { max: 4, .. }));
    }

    #[test]
    fn point_delta_is_bounded_by_the_extent_limit() {
        for (x, y) in [(i64::from(i32::MIN), 0), (0, i64::from(i32::MAX)), (65, 1)] {
            let (path, reason) =
                reason_at(json!({ "kind": "point", "delta": { "x": x, "y": y } }));
            assert_eq!(path, "$.delta");
            assert!(matches!(
                reason,
                ShapeErrorReason::ExtentTooLarge {
                    field: "point.delta",
                    max: 64,
                    ..
                }
            ));
        }

        let parser = ShapeParser::new(3);
        assert_eq!(
            parser
                .parse(&json!({ "kind": "point", "delta": { "x": -3, "y": 3 } }))
                .unwrap(),
            ShapeNode::Point {
                delta: Offset::new(-3, 3)
            }
        );
        assert!(
            parser
                .parse(&json!({ "kind": "point", "delta": { "x": 0, "y": -4 } }))
                .is_err()
        );
    }

    #[test]
    fn text_input_reports_syntax_errors() {
        let err = ShapeParser::default().parse_str("{ kind: circle").unwrap_err();
        assert_eq!(err.path, "$");
        assert!(matches!(err.reason, ShapeErrorReason::Syntax(_)));
    }

    #[test]
    fn to_json_round_trips() {
        let raw = json!({
            "kind": "subtract",
            "shapes": [
                { "kind": "square", "size": 2 },
                {
                    "kind": "reflect",
                    "axis": "vertical",
                    "shapes": [{ "kind": "point", "delta": { "x": 1, "y": 1 } }]
                },
                { "kind": "intersect", "shapes": [{ "kind": "cone", "dir": "NE", "length": 3 }] }
            ]
        });
        let node = parse(raw.clone()).unwrap();
        assert_eq!(node.to_json(), raw);
        assert_eq!(parse(node.to_json()).unwrap(), node);
    }
}
