//! Application layer errors.
//!
//! These errors represent failures in build orchestration, not data
//! validation. Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running a build.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Host or engine manifest unusable.
    #[error("Invalid manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    /// The external constraint solver failed or produced garbage.
    #[error("Dependency resolution failed: {reason}")]
    DependencyResolutionFailed { reason: String },

    /// The engine could not be compiled or loaded.
    #[error("Engine build failed: {reason}")]
    EngineBuildFailed { reason: String },

    /// An action of an effect request failed.
    #[error("Effect '{handler}' failed for {file_path}: {reason}")]
    EffectExecutionFailed {
        file_path: String,
        handler: String,
        reason: String,
    },

    /// An auxiliary tool (e.g. the formatter) failed.
    #[error("{tool} failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// The user declined the overwrite confirmation.
    #[error("User cancelled")]
    UserCancelled,

    /// The confirmation prompt could not be shown or answered.
    #[error("Confirmation prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// The engine reported a failure or went away.
    #[error("Engine terminated: {reason}")]
    EngineTerminated { reason: String },

    /// An input document could not be read.
    #[error("Failed to load document {path}: {reason}")]
    DocumentLoad { path: PathBuf, reason: String },

    /// The input glob does not compile.
    #[error("Invalid input glob '{pattern}': {reason}")]
    InvalidInputGlob { pattern: String, reason: String },

    /// A handler received arguments it cannot use.
    #[error("Invalid arguments for '{handler}': {reason}")]
    InvalidEffectArgs { handler: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Filesystem adapter lock poisoned.
    #[error("Filesystem lock poisoned")]
    StoreLockError,

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ManifestInvalid { path, .. } => vec![
                format!("Check the manifest at {}", path.display()),
                "The host manifest must declare \"dependencies\": { \"direct\": { ... } }".into(),
            ],
            Self::DependencyResolutionFailed { .. } => vec![
                "Your direct dependencies conflict with the versions mattergen needs".into(),
                "Ensure the solver (elm-json by default) is installed and in your PATH".into(),
            ],
            Self::EngineBuildFailed { .. } => vec![
                "Check the compiler output above for details".into(),
                "Ensure the compiler (elm by default) is installed and in your PATH".into(),
                "Check that your entry document compiles on its own".into(),
            ],
            Self::EffectExecutionFailed { file_path, .. } => vec![
                format!("Check the front-matter of {}", file_path),
                "Referenced files (images, attachments) must exist".into(),
            ],
            Self::UserCancelled => vec!["No files were changed".into()],
            Self::PromptFailed { .. } => vec![
                "Pass --yes to skip the confirmation in non-interactive runs".into(),
            ],
            Self::EngineTerminated { .. } => vec![
                "The engine rejected your content; see the reason above".into(),
            ],
            Self::DocumentLoad { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check that the file is UTF-8 text".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::InvalidInputGlob { pattern, .. } => vec![
                format!("Fix the input glob '{}' in your configuration", pattern),
                "Example: **/*.md".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ManifestInvalid { .. } => ErrorCategory::Validation,
            Self::DependencyResolutionFailed { .. }
            | Self::EngineBuildFailed { .. }
            | Self::ToolFailed { .. } => ErrorCategory::Toolchain,
            Self::EffectExecutionFailed { .. } | Self::InvalidEffectArgs { .. } => {
                ErrorCategory::Validation
            }
            Self::UserCancelled => ErrorCategory::Cancelled,
            Self::EngineTerminated { .. } => ErrorCategory::Engine,
            Self::DocumentLoad { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError | Self::PromptFailed { .. } => {
                ErrorCategory::Internal
            }
            Self::AdapterNotConfigured { .. } | Self::InvalidInputGlob { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}
