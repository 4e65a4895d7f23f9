//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `mattergen-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations and workspaces
//!   - `DependencySolver`, `Compiler`, `Formatter`: external toolchain
//!   - `EngineLoader`: starts the generation engine
//!   - `DocumentSource`: input discovery
//!   - `EffectHandler`: side-effect plugins
//!   - `Confirmer`, `DisplaySink`: user interaction
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CompileJob, Compiler, Confirmer, DependencySolver, DisplaySink, DocumentSource,
    EffectHandler, EngineGuard, EngineHandle, EngineLoader, Filesystem, Formatter,
};

#[cfg(test)]
pub use output::{
    MockCompiler, MockConfirmer, MockDependencySolver, MockFilesystem, MockFormatter,
};
