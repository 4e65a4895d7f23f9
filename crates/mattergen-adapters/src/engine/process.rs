use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use mattergen_core::{
    application::{
        ApplicationError,
        ports::{EngineHandle, EngineLoader},
    },
    domain::{EngineFlags, EngineMessage, HostMessage},
    error::{CoreError, CoreResult},
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, instrument, warn};

use super::TaskGuard;
use crate::toolchain::ToolCommand;

/// Runs the compiled engine as a child process speaking JSON lines.
///
/// Started as `[runner] <artifact> --flags <json>`. Host messages go to the
/// child's stdin, engine messages are read from its stdout, one per line.
/// Stderr is inherited. The child is killed when the handle is dropped.
#[derive(Debug, Clone, Default)]
pub struct ProcessEngineLoader {
    runner: Option<ToolCommand>,
}

impl ProcessEngineLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter that executes the artifact, e.g. `node`.
    pub fn with_runner(runner: ToolCommand) -> Self {
        Self {
            runner: Some(runner),
        }
    }

    pub fn runner(&self) -> Option<&ToolCommand> {
        self.runner.as_ref()
    }
}

/// Everything that must die with the engine.
struct ProcessGuard {
    _child: Child,
    _writer: TaskGuard,
    _reader: TaskGuard,
}

#[async_trait]
impl EngineLoader for ProcessEngineLoader {
    #[instrument(skip_all, fields(artifact = %artifact.display()))]
    async fn load(&self, artifact: &Path, flags: &EngineFlags) -> CoreResult<EngineHandle> {
        let flags = serde_json::to_string(flags).map_err(|e| CoreError::Internal {
            message: format!("encoding engine flags: {}", e),
        })?;

        let mut cmd = match &self.runner {
            Some(runner) => {
                let mut cmd = Command::new(runner.program());
                cmd.args(runner.args()).arg(artifact);
                cmd
            }
            None => Command::new(artifact),
        };
        cmd.arg("--flags")
            .arg(flags)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            CoreError::from(ApplicationError::EngineBuildFailed {
                reason: format!("failed to start engine: {}", e),
            })
        })?;
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(CoreError::Internal {
                message: "engine stdio was not captured".into(),
            });
        };
        info!(pid = child.id(), "Engine started");

        let (host_tx, host_rx) = unbounded_channel();
        let (engine_tx, engine_rx) = unbounded_channel();
        let guard = ProcessGuard {
            _child: child,
            _writer: TaskGuard(tokio::spawn(write_messages(stdin, host_rx))),
            _reader: TaskGuard(tokio::spawn(read_messages(stdout, engine_tx))),
        };

        Ok(EngineHandle::new(host_tx, engine_rx).with_guard(guard))
    }
}

async fn write_messages(mut stdin: ChildStdin, mut messages: UnboundedReceiver<HostMessage>) {
    while let Some(message) = messages.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to encode host message");
                break;
            }
        };
        line.push('\n');
        if stdin.write_all(line.as_bytes()).await.is_err() || stdin.flush().await.is_err() {
            debug!("Engine stdin closed");
            break;
        }
    }
}

/// Forward decoded lines; a line that does not decode ends the exchange
/// with a `terminate`.
async fn read_messages(stdout: ChildStdout, messages: UnboundedSender<EngineMessage>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        let message = match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match serde_json::from_str::<EngineMessage>(&line) {
                Ok(message) => message,
                Err(e) => terminate(format!("malformed engine message: {}", e)),
            },
            Ok(None) => {
                debug!("Engine stdout closed");
                break;
            }
            Err(e) => terminate(format!("reading engine output: {}", e)),
        };

        let last = matches!(message, EngineMessage::Terminate(_));
        if messages.send(message).is_err() || last {
            break;
        }
    }
}

fn terminate(reason: String) -> EngineMessage {
    EngineMessage::Terminate(Value::String(reason))
}
