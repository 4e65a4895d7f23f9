//! Application services - orchestrate one build.
//!
//! Leaves first: [`DependencyResolver`] merges manifests, [`EngineLauncher`]
//! builds and starts the engine, [`MessageBridge`] runs the message
//! exchange (dispatching to [`EffectExecutor`]), and [`StagingArea`] plus
//! [`Committer`] materialize the output. [`BuildService`] wires them up.

pub mod bridge;
pub mod build_service;
pub mod effects;
pub mod launcher;
pub mod resolver;
pub mod staging;

pub use bridge::{BridgeOutcome, DEFAULT_LOAD_CONCURRENCY, MessageBridge};
pub use build_service::{BuildReport, BuildService, BuildServiceBuilder};
pub use effects::{EffectExecutor, HandlerRegistry};
pub use launcher::{EngineLauncher, LaunchedEngine};
pub use resolver::DependencyResolver;
pub use staging::{CommitReport, Committer, StagedOutput, StagingArea};
