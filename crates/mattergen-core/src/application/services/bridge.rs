//! The message exchange with a running engine.
//!
//! One loop multiplexes three sources of progress on a single task:
//!
//! - the input feed (documents loaded concurrently, sent in order),
//! - in-flight effect requests,
//! - inbound engine messages.
//!
//! The loop ends on `writeFiles` (success) or `terminate` (failure).

use std::collections::HashMap;
use std::path::PathBuf;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, FuturesUnordered, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use super::effects::EffectExecutor;
use crate::{
    application::{
        ApplicationError,
        ports::{DisplaySink, DocumentSource, EngineHandle},
    },
    domain::{EngineMessage, GeneratedFile, HostMessage, OutputSet},
    error::{CoreError, CoreResult},
};

/// Documents loaded ahead of the one currently being sent.
pub const DEFAULT_LOAD_CONCURRENCY: usize = 16;

/// Result of a completed exchange.
#[derive(Debug)]
pub struct BridgeOutcome {
    pub output: OutputSet,
    pub inputs_sent: usize,
    pub effects_performed: usize,
}

/// Outstanding effect requests per owning file.
#[derive(Debug, Default)]
struct EffectLedger {
    outstanding: HashMap<String, usize>,
    performed: usize,
}

impl EffectLedger {
    fn open(&mut self, file_path: &str) {
        *self.outstanding.entry(file_path.to_string()).or_default() += 1;
    }

    /// Record a finished request. Every close must match an earlier open.
    fn close(&mut self, file_path: &str) -> CoreResult<()> {
        let Some(count) = self.outstanding.get_mut(file_path) else {
            return Err(CoreError::Internal {
                message: format!("effect for {file_path} finished but was never requested"),
            });
        };
        *count -= 1;
        if *count == 0 {
            self.outstanding.remove(file_path);
        }
        self.performed += 1;
        Ok(())
    }

    fn outstanding(&self) -> usize {
        self.outstanding.values().sum()
    }
}

pub struct MessageBridge<'a> {
    documents: &'a dyn DocumentSource,
    executor: EffectExecutor<'a>,
    display: &'a dyn DisplaySink,
    load_concurrency: usize,
}

impl<'a> MessageBridge<'a> {
    pub fn new(
        documents: &'a dyn DocumentSource,
        executor: EffectExecutor<'a>,
        display: &'a dyn DisplaySink,
    ) -> Self {
        Self {
            documents,
            executor,
            display,
            load_concurrency: DEFAULT_LOAD_CONCURRENCY,
        }
    }

    pub fn load_concurrency(mut self, n: usize) -> Self {
        self.load_concurrency = n.max(1);
        self
    }

    /// Drive the exchange until the engine writes files or terminates.
    ///
    /// Every `performEffect` is answered by exactly one `effectsPerformed`
    /// unless the build aborts first. Requests still running when
    /// `writeFiles` arrives are finished and acknowledged before returning.
    #[instrument(skip_all, fields(inputs = paths.len()))]
    pub async fn run(
        &self,
        handle: EngineHandle,
        paths: Vec<PathBuf>,
    ) -> CoreResult<BridgeOutcome> {
        let (sender, mut receiver, _guard) = handle.into_parts();

        let feed = self.feed(&sender, paths);
        tokio::pin!(feed);
        let mut feeding = true;
        let mut inputs_sent = 0;

        let mut pending: FuturesUnordered<BoxFuture<'_, CoreResult<String>>> =
            FuturesUnordered::new();
        let mut ledger = EffectLedger::default();

        loop {
            tokio::select! {
                sent = &mut feed, if feeding => {
                    inputs_sent = sent?;
                    feeding = false;
                    debug!(inputs_sent, "All inputs sent");
                }

                Some(done) = pending.next(), if !pending.is_empty() => {
                    let file_path = done?;
                    ledger.close(&file_path)?;
                    send(&sender, HostMessage::EffectsPerformed(file_path))?;
                }

                message = receiver.recv() => match message {
                    Some(EngineMessage::Show(messages)) => {
                        for message in &messages {
                            self.display.show(message);
                        }
                    }
                    Some(EngineMessage::PerformEffect(request)) => {
                        debug!(file = %request.file_path, "Effect requested");
                        ledger.open(&request.file_path);
                        pending.push(self.executor.execute(request).boxed());
                    }
                    Some(EngineMessage::WriteFiles(files)) => {
                        if feeding {
                            warn!("Engine wrote files before all inputs were sent");
                        }
                        if !pending.is_empty() {
                            debug!(outstanding = ledger.outstanding(), "Draining effects");
                        }
                        while let Some(done) = pending.next().await {
                            let file_path = done?;
                            ledger.close(&file_path)?;
                            if sender.send(HostMessage::EffectsPerformed(file_path)).is_err() {
                                debug!("Engine stopped listening before acknowledgement");
                            }
                        }
                        return finish(files, inputs_sent, ledger.performed);
                    }
                    Some(EngineMessage::Terminate(reason)) => {
                        let reason = EngineMessage::describe_reason(&reason);
                        warn!(%reason, "Engine terminated");
                        return Err(ApplicationError::EngineTerminated { reason }.into());
                    }
                    None => {
                        return Err(ApplicationError::EngineTerminated {
                            reason: "engine closed the channel without a result".into(),
                        }
                        .into());
                    }
                },
            }
        }
    }

    /// Load documents concurrently, send `add` for each in order, then
    /// `noMoreInputFiles` once every load has completed.
    async fn feed(
        &self,
        sender: &UnboundedSender<HostMessage>,
        paths: Vec<PathBuf>,
    ) -> CoreResult<usize> {
        let documents = self.documents;
        let mut loads = stream::iter(paths)
            .map(|path| async move { documents.load(&path).await })
            .buffered(self.load_concurrency);

        let mut sent = 0;
        while let Some(record) = loads.next().await {
            send(sender, HostMessage::Add(record?))?;
            sent += 1;
        }

        send(sender, HostMessage::NoMoreInputFiles(sent))?;
        Ok(sent)
    }
}

fn send(sender: &UnboundedSender<HostMessage>, message: HostMessage) -> CoreResult<()> {
    sender.send(message).map_err(|_| {
        CoreError::from(ApplicationError::EngineTerminated {
            reason: "engine stopped accepting messages".into(),
        })
    })
}

fn finish(
    files: Vec<GeneratedFile>,
    inputs_sent: usize,
    effects_performed: usize,
) -> CoreResult<BridgeOutcome> {
    let output = OutputSet::new(files)?;
    info!(files = output.len(), effects_performed, "Engine wrote files");
    Ok(BridgeOutcome {
        output,
        inputs_sent,
        effects_performed,
    })
}
