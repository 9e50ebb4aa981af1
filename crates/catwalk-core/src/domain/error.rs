// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so they can be reported more than once)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid tastic definition '{tastic_type}': {reason}")]
    InvalidDefinition { tastic_type: String, reason: String },

    #[error("Duplicate field '{field}' in schema of '{tastic_type}'")]
    DuplicateField { tastic_type: String, field: String },

    #[error("Invalid node '{node_id}': {reason}")]
    InvalidNode { node_id: String, reason: String },

    #[error("Invalid action override for '{namespace}/{action}': {reason}")]
    InvalidActionOverride {
        namespace: String,
        action: String,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDefinition { tastic_type, reason } => vec![
                format!("Check the definition of tastic '{}'", tastic_type),
                format!("Details: {}", reason),
            ],
            Self::DuplicateField { field, .. } => vec![
                format!("Field '{}' is declared twice", field),
                "Field names must be unique across all schema groups".into(),
            ],
            Self::InvalidNode { node_id, .. } => vec![
                format!("Check the streams declared on node '{}'", node_id),
                "Every stream needs a unique, non-empty streamId".into(),
            ],
            Self::InvalidActionOverride { .. } => vec![
                "Overrides map namespace -> action -> controller name".into(),
                "Controller names must not be empty".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDefinition { .. }
            | Self::DuplicateField { .. }
            | Self::InvalidNode { .. }
            | Self::InvalidActionOverride { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
}
