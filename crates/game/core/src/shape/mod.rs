//! Shape DSL: JSON movement/attack patterns compiled into offset lists.
//!
//! A shape is written as `{"kind": ..., ...fields}` and describes a set of
//! squares relative to a piece:
//!
//! ```text
//! {"kind":"union","shapes":[{"kind":"circle","radius":1},
//!                           {"kind":"ray","dirs":["N"],"min":1,"max":3}]}
//! ```
//!
//! Parsing ([`parse_shape_json`]) validates the whole tree up front; compiling
//! ([`compile_shape`]) is then infallible.

pub mod combinators;
mod compiler;
mod direction;
mod error;
mod node;
mod parser;
pub mod primitives;

pub use compiler::compile_shape;
pub use direction::Direction;
pub use error::{ShapeDefinitionError, ShapeErrorReason};
pub use node::{ReflectAxis, ShapeNode};
pub use parser::ShapeParser;

use crate::state::Offset;

/// Parses a decoded JSON value with the default extent limit.
pub fn parse_shape_json(raw: &serde_json::Value) -> Result<ShapeNode, ShapeDefinitionError> {
    ShapeParser::default().parse(raw)
}

/// Parses shape JSON text with the default extent limit.
pub fn parse_shape_str(raw: &str) -> Result<ShapeNode, ShapeDefinitionError> {
    ShapeParser::default().parse_str(raw)
}

/// Flips every offset along the y axis.
///
/// Used once per piece for the side whose forward direction is south.
pub fn mirror_vertical(offsets: &[Offset]) -> Vec<Offset> {
    offsets.iter().map(|offset| offset.flip_y()).collect()
}
