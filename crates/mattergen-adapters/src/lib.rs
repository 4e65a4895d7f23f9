//! Infrastructure adapters for mattergen.
//!
//! This crate implements the ports defined in `mattergen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod documents;
pub mod effects;
pub mod engine;
pub mod filesystem;
pub mod toolchain;

// Re-export commonly used adapters
pub use documents::{GlobDocumentSource, MemoryDocumentSource};
pub use effects::{CopyHandler, ImageHandler, builtin_handlers};
pub use engine::{EngineProgram, InProcessEngineLoader, ProcessEngineLoader};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use toolchain::{CommandCompiler, CommandFormatter, CommandSolver, ToolCommand};
