//! Error types for rule compilation, interpolation, and rendering.

use thiserror::Error;

/// Error raised while resolving an interpolation against a render context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    /// The interpolation referenced a value that isn't in the context
    #[error("interpolation value '{path}' is not defined in the render context")]
    MissingValue { path: String },
    /// A template expression failed to evaluate
    #[error("failed to evaluate expression '{expr}': {message}")]
    Expression { expr: String, message: String },
    /// An interpolation function reported its own failure
    #[error("{0}")]
    Custom(String),
}

impl InterpolationError {
    /// Creates a custom error from any message.
    pub fn custom(message: impl Into<String>) -> Self {
        InterpolationError::Custom(message.into())
    }
}

/// Error raised while compiling a rule template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Tagged-template parts don't line up with the interpolations
    #[error("expected {expected} template strings for {interpolations} interpolations, got {actual}")]
    Arity {
        expected: usize,
        interpolations: usize,
        actual: usize,
    },
    /// An interpolation expression is not valid syntax
    #[error("invalid expression '{expr}': {message}")]
    Syntax { expr: String, message: String },
    /// A `{{` opened at `offset` was never closed
    #[error("unterminated interpolation starting at byte {offset}")]
    Unterminated { offset: usize },
}

/// Error returned by render operations on global styles.
///
/// Every variant is scoped to the single render, mount, or unmount event
/// that produced it; none of them leave the shared sheet half-written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobalStyleError {
    /// An interpolation could not be resolved, so nothing was inserted
    #[error("global style {id}: {source}")]
    Interpolation {
        id: String,
        #[source]
        source: InterpolationError,
    },
    /// No stylesheet was reachable from the render environment
    #[error("global style {id}: no stylesheet is available in the render environment")]
    PortUnavailable { id: String },
    /// The rule template itself could not be compiled
    #[error(transparent)]
    Template(#[from] TemplateError),
}
