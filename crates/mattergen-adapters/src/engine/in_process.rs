use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mattergen_core::{
    application::ports::{EngineHandle, EngineLoader},
    domain::{EngineFlags, EngineMessage, HostMessage},
    error::CoreResult,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use super::TaskGuard;

/// An engine implemented in Rust, run as a tokio task.
///
/// Used by tests and embedders that do not need a separate process.
#[async_trait]
pub trait EngineProgram: Send + Sync + 'static {
    async fn run(
        &self,
        flags: EngineFlags,
        inbox: UnboundedReceiver<HostMessage>,
        outbox: UnboundedSender<EngineMessage>,
    );
}

/// Loads an [`EngineProgram`]; the artifact path is ignored.
#[derive(Clone)]
pub struct InProcessEngineLoader {
    program: Arc<dyn EngineProgram>,
}

impl InProcessEngineLoader {
    pub fn new(program: impl EngineProgram) -> Self {
        Self {
            program: Arc::new(program),
        }
    }
}

#[async_trait]
impl EngineLoader for InProcessEngineLoader {
    async fn load(&self, artifact: &Path, flags: &EngineFlags) -> CoreResult<EngineHandle> {
        debug!(artifact = %artifact.display(), "Starting in-process engine");
        let (host_tx, host_rx) = unbounded_channel();
        let (engine_tx, engine_rx) = unbounded_channel();

        let program = Arc::clone(&self.program);
        let flags = flags.clone();
        let task = tokio::spawn(async move {
            program.run(flags, host_rx, engine_tx).await;
        });

        Ok(EngineHandle::new(host_tx, engine_rx).with_guard(TaskGuard(task)))
    }
}
