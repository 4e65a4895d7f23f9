// ============================================================================
// domain/error.rs - DOMAIN VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside `CoreError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes its root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Empty path")]
    EmptyPath,

    #[error("Duplicate path in generated output: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Manifest Errors
    // ========================================================================
    #[error("manifest is not valid JSON: {reason}")]
    MalformedManifest { reason: String },

    #[error("manifest has no direct dependencies (not an application manifest)")]
    MissingDirectDependencies,

    // ========================================================================
    // Document Errors
    // ========================================================================
    #[error("front-matter could not be parsed: {reason}")]
    MalformedFrontMatter { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AbsolutePathNotAllowed { path } | Self::PathEscapesRoot { path } => vec![
                format!("Offending path: {}", path),
                "Generated files must stay inside the source directory".into(),
            ],
            Self::DuplicatePath { path } => vec![
                format!("The engine produced '{}' more than once", path),
                "Check that no two documents map to the same module".into(),
            ],
            Self::MissingDirectDependencies => vec![
                "Add a \"dependencies\": { \"direct\": { ... } } section".into(),
                "Package manifests cannot be used as a host project".into(),
            ],
            Self::MalformedFrontMatter { .. } => vec![
                "Front-matter must be YAML between two '---' lines (or TOML between '+++')".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. }
            | Self::EmptyPath
            | Self::DuplicatePath { .. } => ErrorCategory::Internal,
            Self::MalformedManifest { .. }
            | Self::MissingDirectDependencies
            | Self::MalformedFrontMatter { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
