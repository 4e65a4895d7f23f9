//! Built-in effect handler plugins.
//!
//! - `image`: copy an image next to the generated code, applying transforms
//! - `copy`: plain file copy

mod copy;
mod images;

use std::io;
use std::path::{Component, Path, PathBuf};

use mattergen_core::{
    application::{ApplicationError, HandlerRegistry},
    domain::BuildConfig,
    error::CoreError,
};
use serde_json::Value;
use thiserror::Error;

pub use self::copy::CopyHandler;
pub use self::images::ImageHandler;

/// Registry with every built-in handler.
pub fn builtin_handlers() -> HandlerRegistry {
    HandlerRegistry::new().with(ImageHandler).with(CopyHandler)
}

/// Failure inside a built-in handler.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("{0}")]
    Args(#[from] serde_json::Error),

    #[error("invalid arguments for '{function}': {args}")]
    Transform { function: String, args: Value },

    #[error("{} is outside the project", .path.display())]
    OutsideProject { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("handler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl EffectError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn into_core(self, handler: &str) -> CoreError {
        match self {
            Self::Args(_) | Self::Transform { .. } | Self::OutsideProject { .. } => {
                ApplicationError::InvalidEffectArgs {
                    handler: handler.to_string(),
                    reason: self.to_string(),
                }
                .into()
            }
            Self::Io { ref path, .. } | Self::Image { ref path, .. } => {
                ApplicationError::FilesystemError {
                    path: path.clone(),
                    reason: self.to_string(),
                }
                .into()
            }
            Self::Join(_) => CoreError::Internal {
                message: self.to_string(),
            },
        }
    }
}

/// Join and resolve `.`/`..` lexically, without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Normalize `path` and reject it unless it stays below the project root.
fn within_project(config: &BuildConfig, path: &Path) -> Result<PathBuf, EffectError> {
    let root = normalize(&config.project_root);
    let path = normalize(path);
    match path.strip_prefix(&root) {
        Ok(rest) if !rest.components().any(|c| c == Component::ParentDir) => Ok(path),
        _ => Err(EffectError::OutsideProject { path }),
    }
}

async fn ensure_parent(path: &Path) -> Result<(), EffectError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(EffectError::io(parent)),
        _ => Ok(()),
    }
}
