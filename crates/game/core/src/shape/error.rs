//! Shape definition errors.

use crate::error::{ErrorSeverity, GameError};

/// Malformed or out-of-range shape JSON.
///
/// `path` points at the offending value using a JSONPath-like notation rooted
/// at `$`, e.g. `$.shapes[1].radius`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid shape at `{path}`: {reason}")]
pub struct ShapeDefinitionError {
    pub path: String,
    pub reason: ShapeErrorReason,
}

impl ShapeDefinitionError {
    pub fn new(path: impl Into<String>, reason: ShapeErrorReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeErrorReason {
    /// The raw text is not JSON at all.
    #[error("not valid JSON: {0}")]
    Syntax(String),

    #[error("shape node must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("shape node is missing a \"kind\" string")]
    MissingKind,

    #[error("unknown shape kind \"{0}\"")]
    UnknownKind(String),

    /// A field has the wrong type or violates its range constraint.
    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// A numeric extent is larger than the configured limit.
    #[error("{field} = {value} exceeds the maximum extent {max}")]
    ExtentTooLarge {
        field: &'static str,
        value: u64,
        max: u32,
    },
}

impl GameError for ShapeDefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self.reason {
            ShapeErrorReason::Syntax(_) => "SHAPE_SYNTAX",
            ShapeErrorReason::NotAnObject(_) => "SHAPE_NOT_AN_OBJECT",
            ShapeErrorReason::MissingKind => "SHAPE_MISSING_KIND",
            ShapeErrorReason::UnknownKind(_) => "SHAPE_UNKNOWN_KIND",
            ShapeErrorReason::InvalidField { .. } => "SHAPE_INVALID_FIELD",
            ShapeErrorReason::ExtentTooLarge { .. } => "SHAPE_EXTENT_TOO_LARGE",
        }
    }
}
