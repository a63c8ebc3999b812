//! Common error infrastructure for playground-core.
//!
//! Domain errors (`ShapeDefinitionError`, `Rejection`, `EngineError`, ...) live
//! next to the code that produces them. This module only holds the shared
//! classification used by callers to decide how to react.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may simply try something else (another target square)
/// - **Validation**: the input itself is malformed and must be fixed
/// - **Internal**: an inconsistency that points at a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - retry with a different command.
    ///
    /// Examples: path blocked, target square occupied
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: malformed shape JSON, unknown ability name
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: ability handler fault, board index desync
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all playground-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable identifiers meant for tests and UI mapping
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
