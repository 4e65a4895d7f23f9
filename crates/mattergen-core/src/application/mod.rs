//! Application layer for mattergen.
//!
//! This layer contains:
//! - **Services**: one build, split into resolver, launcher, bridge,
//!   effect executor and staging/commit
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; manifest rules,
//! path validation and the wire format live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod workspace;

// Re-export main services
pub use services::{
    BridgeOutcome, BuildReport, BuildService, BuildServiceBuilder, CommitReport, Committer,
    DependencyResolver, EffectExecutor, EngineLauncher, HandlerRegistry, LaunchedEngine,
    MessageBridge, StagedOutput, StagingArea,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CompileJob, Compiler, Confirmer, DependencySolver, DisplaySink, DocumentSource,
    EffectHandler, EngineHandle, EngineLoader, Filesystem, Formatter,
};

pub use error::ApplicationError;
pub use workspace::Workspace;
