//! Error types for the loan risk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each failure class has its own error enum; `Error` is the root.

use thiserror::Error;

/// The top-level error type for all assessment operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Collaborator faults ---
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    // --- Tool / map marshaling errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Malformed numeric fields ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// A fault raised by an in-process collaborator binding.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("{collaborator} failed: {reason}")]
    Failed { collaborator: String, reason: String },

    #[error("{0} is unavailable")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn failed(collaborator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            collaborator: collaborator.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while translating between domain entities and tool maps.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Missing required field '{field}' for tool {tool}")]
    MissingField { tool: String, field: String },

    #[error("Invalid field '{field}' for tool {tool}: {reason}")]
    InvalidField {
        tool: String,
        field: String,
        reason: String,
    },
}

impl ToolError {
    pub fn missing(tool: &str, field: &str) -> Self {
        Self::MissingField {
            tool: tool.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid(tool: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            tool: tool.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Numeric fields that failed conversion. Never coerced to a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Risk score {0} is outside the 0-100 scale")]
    ScoreOutOfRange(f64),

    #[error("Risk score is not a finite number")]
    NonFiniteScore,

    #[error("Field '{field}' in {context} is not a finite number: {value}")]
    InvalidNumber {
        context: String,
        field: String,
        value: String,
    },
}
