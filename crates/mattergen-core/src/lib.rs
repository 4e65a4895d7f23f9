//! Mattergen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the mattergen
//! content pipeline, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          mattergen-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (BuildService, MessageBridge, ...)     │
//! │         Orchestrates one build          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Solver, Compiler, Engine)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   mattergen-adapters (Infrastructure)   │
//! │ (LocalFilesystem, ProcessEngine, etc.)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Data)        │
//! │ (Manifest, InputRecord, OutputSet, ...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mattergen_core::{application::BuildService, domain::BuildConfig};
//!
//! # async fn run(filesystem: std::sync::Arc<dyn mattergen_core::application::ports::Filesystem>) {
//! let config = BuildConfig::new(".");
//! let service = BuildService::builder(config)
//!     .filesystem(filesystem)
//!     // .solver(..).compiler(..).engine_loader(..).documents(..)
//!     // .confirmer(..).formatter(..).display(..)
//!     .build()
//!     .unwrap();
//! let report = service.build().await.unwrap();
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildReport, BuildService, HandlerRegistry,
        ports::{
            Compiler, Confirmer, DependencySolver, DisplaySink, DocumentSource, EffectHandler,
            EngineLoader, Filesystem, Formatter,
        },
    };
    pub use crate::domain::{
        Action, BuildConfig, DisplayLevel, DisplayMessage, EffectRequest, EngineFlags,
        EngineMessage, GeneratedFile, HostMessage, InputRecord, Manifest, OutputSet,
    };
    pub use crate::error::{CoreError, CoreResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
