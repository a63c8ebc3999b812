use serde::{Deserialize, Serialize};

use crate::ability::AbilityParams;
use crate::shape::{ShapeDefinitionError, ShapeNode, ShapeParser};

/// Declarative piece description as stored in content files.
///
/// ```json
/// {
///   "name": "knight",
///   "emoji": "♞",
///   "movement": "{\"kind\":\"reflect\",\"axis\":\"both\",\"shapes\":[...]}",
///   "attack": { "kind": "point", "delta": { "x": 1, "y": 2 } },
///   "abilities": ["Jumping", { "name": "Immobile", "params": {} }]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceBlueprint {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub movement: ShapeSource,
    pub attack: ShapeSource,
    #[serde(default)]
    pub abilities: Vec<AbilitySpec>,
}

/// Shape JSON either embedded as a string or written inline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSource {
    Encoded(String),
    Inline(serde_json::Value),
}

impl ShapeSource {
    pub fn parse(&self, parser: &ShapeParser) -> Result<ShapeNode, ShapeDefinitionError> {
        match self {
            ShapeSource::Encoded(raw) => parser.parse_str(raw),
            ShapeSource::Inline(value) => parser.parse(value),
        }
    }
}

impl From<ShapeNode> for ShapeSource {
    fn from(node: ShapeNode) -> Self {
        ShapeSource::Inline(node.to_json())
    }
}

/// Ability reference inside a blueprint: a bare name or a name with params.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbilitySpec {
    Name(String),
    WithParams {
        name: String,
        #[serde(default)]
        params: AbilityParams,
    },
}

impl AbilitySpec {
    pub fn name(&self) -> &str {
        match self {
            AbilitySpec::Name(name) | AbilitySpec::WithParams { name, .. } => name,
        }
    }

    /// Params for the constructor; empty for the bare-name form.
    pub fn params(&self) -> AbilityParams {
        match self {
            AbilitySpec::Name(_) => AbilityParams::new(),
            AbilitySpec::WithParams { params, .. } => params.clone(),
        }
    }
}
