//! Core domain layer for mattergen.
//!
//! Pure data and validation: manifests, input records, effect requests,
//! generated output and the engine message protocol. All I/O happens behind
//! the ports in `crate::application::ports`.
//!
//! - **No I/O**: no filesystem, process or network calls
//! - **Validated on construction**: `RelativePath`, `OutputSet`, `Manifest`
//! - **Wire types are serde types**: message shapes are defined once, here

pub mod config;
pub mod entities;
pub mod error;
pub mod message;

pub use config::{BuildConfig, EngineLayout};
pub use entities::{
    RelativePath,
    document::{FrontMatter, InputRecord},
    effect::{Action, EffectRequest},
    manifest::{Constraint, Dependencies, Manifest, ResolvedVersions, VersionMap},
    output::{GeneratedFile, OutputSet},
};
pub use error::{DomainError, ErrorCategory};
pub use message::{DisplayLevel, DisplayMessage, EngineFlags, EngineMessage, HostMessage};
