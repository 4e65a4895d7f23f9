//! Shared fixtures: a scripted engine and recording adapters.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mattergen_adapters::EngineProgram;
use mattergen_core::{
    application::ports::{CompileJob, Compiler, Confirmer, DependencySolver, DisplaySink, EffectHandler, Formatter},
    domain::{
        Action, BuildConfig, Constraint, DisplayMessage, EffectRequest, EngineFlags, EngineMessage,
        GeneratedFile, HostMessage, ResolvedVersions,
    },
    error::CoreResult,
};
use serde_json::{Value, json};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub const HOST_MANIFEST: &str = r#"{
    "type": "application",
    "source-directories": ["src"],
    "dependencies": {
        "direct": { "elm/core": "1.0.5", "elm/html": "1.0.0" },
        "indirect": { "elm/virtual-dom": "1.0.3" }
    }
}"#;

pub const ENGINE_MANIFEST: &str = r#"{
    "type": "application",
    "source-directories": ["src", "../src"],
    "dependencies": {
        "direct": { "elm/core": "1.0.5", "elm/json": "1.1.3" },
        "indirect": {}
    }
}"#;

pub fn image_document(title: &str) -> String {
    format!("---\ntitle: {title}\nimage: hero.png\n---\nBody of {title}\n")
}

/// Engine that emits one module per document and one image effect per
/// document whose front-matter names an image.
pub struct SiteEngine {
    pub log: Arc<Mutex<Vec<HostMessage>>>,
    /// Extra action appended to every effect request.
    pub extra_action: Option<Action>,
}

impl SiteEngine {
    pub fn new() -> (Self, Arc<Mutex<Vec<HostMessage>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: Arc::clone(&log),
                extra_action: Some(Action::new("video", json!({ "codec": "av1" }))),
            },
            log,
        )
    }
}

fn module_name(file_path: &str) -> String {
    let stem = Path::new(file_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => stem,
    }
}

#[async_trait]
impl EngineProgram for SiteEngine {
    async fn run(
        &self,
        _flags: EngineFlags,
        mut inbox: UnboundedReceiver<HostMessage>,
        outbox: UnboundedSender<EngineMessage>,
    ) {
        let mut files = Vec::new();
        let mut expected = None;
        let (mut requested, mut acknowledged) = (0, 0);

        while let Some(message) = inbox.recv().await {
            self.log.lock().unwrap().push(message.clone());
            match message {
                HostMessage::Add(record) => {
                    let module = module_name(&record.file_path);
                    files.push(GeneratedFile::new(
                        format!("Content/{module}.elm"),
                        format!("module Content.{module} exposing (..)\n"),
                    ));
                    if let Some(Value::String(image)) = record.file_frontmatter.data.get("image") {
                        let mut actions = vec![Action::new(
                            "image",
                            json!({
                                "paths": {
                                    "copyFromBase": record.file_path,
                                    "copyFromPath": image,
                                    "copyToPath": "public/images",
                                    "fileName": format!("{}.png", module.to_lowercase())
                                },
                                "manipulations": [{ "function": "width", "args": 100 }]
                            }),
                        )];
                        actions.extend(self.extra_action.clone());
                        requested += 1;
                        let _ = outbox.send(EngineMessage::PerformEffect(EffectRequest {
                            file_path: record.file_path.clone(),
                            actions,
                        }));
                    }
                }
                HostMessage::NoMoreInputFiles(count) => expected = Some(count),
                HostMessage::EffectsPerformed(_) => acknowledged += 1,
            }

            if expected == Some(files.len()) && acknowledged == requested {
                let _ = outbox.send(EngineMessage::Show(vec![
                    DisplayMessage::info(format!("{} documents", files.len())),
                    DisplayMessage::success("Content generated"),
                ]));
                let _ = outbox.send(EngineMessage::WriteFiles(files.clone()));
                break;
            }
        }
    }
}

/// Engine that rejects the first document it sees.
pub struct RejectingEngine;

#[async_trait]
impl EngineProgram for RejectingEngine {
    async fn run(
        &self,
        _flags: EngineFlags,
        mut inbox: UnboundedReceiver<HostMessage>,
        outbox: UnboundedSender<EngineMessage>,
    ) {
        while let Some(message) = inbox.recv().await {
            if let HostMessage::Add(record) = message {
                let _ = outbox.send(EngineMessage::Terminate(json!(format!(
                    "{}: missing required field 'title'",
                    record.file_path
                ))));
                break;
            }
        }
    }
}

/// Solver that pins every requested name plus one transitive package.
pub struct FixedSolver;

impl DependencySolver for FixedSolver {
    fn solve(&self, extra: &[Constraint], _manifest: &Path) -> CoreResult<ResolvedVersions> {
        let mut versions: ResolvedVersions = ResolvedVersions::default();
        for c in extra {
            versions.0.insert(c.name.clone(), c.version.clone());
        }
        versions.0.insert("elm/json".into(), "1.1.3".into());
        versions.0.insert("elm/virtual-dom".into(), "1.0.3".into());
        Ok(versions)
    }
}

/// Compiler that only records its jobs; optionally writes the artifact.
#[derive(Default)]
pub struct RecordingCompiler {
    pub jobs: Mutex<Vec<CompileJob>>,
    pub write_artifact: bool,
}

impl Compiler for RecordingCompiler {
    fn compile(&self, job: &CompileJob) -> CoreResult<()> {
        if self.write_artifact {
            std::fs::write(&job.artifact, "// compiled engine").map_err(|e| {
                mattergen_core::error::CoreError::Internal {
                    message: e.to_string(),
                }
            })?;
        }
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

pub struct FixedConfirmer {
    pub answer: bool,
    pub asked: Mutex<Vec<PathBuf>>,
}

impl FixedConfirmer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, target: &Path) -> CoreResult<bool> {
        self.asked.lock().unwrap().push(target.to_path_buf());
        Ok(self.answer)
    }
}

pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, _dir: &Path) -> CoreResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct CollectingDisplay(pub Mutex<Vec<DisplayMessage>>);

impl DisplaySink for CollectingDisplay {
    fn show(&self, message: &DisplayMessage) {
        self.0.lock().unwrap().push(message.clone());
    }
}

/// Stands in for the `image` plugin where no real files exist.
#[derive(Clone, Default)]
pub struct RecordingImageHandler {
    pub calls: Arc<Mutex<Vec<Value>>>,
}

#[async_trait]
impl EffectHandler for RecordingImageHandler {
    fn name(&self) -> &str {
        "image"
    }

    async fn perform(&self, _config: &BuildConfig, args: &Value) -> CoreResult<()> {
        self.calls.lock().unwrap().push(args.clone());
        Ok(())
    }
}

/// Always-failing `image` plugin.
pub struct BrokenImageHandler;

#[async_trait]
impl EffectHandler for BrokenImageHandler {
    fn name(&self) -> &str {
        "image"
    }

    async fn perform(&self, _config: &BuildConfig, _args: &Value) -> CoreResult<()> {
        Err(mattergen_core::application::ApplicationError::FilesystemError {
            path: PathBuf::from("hero.png"),
            reason: "No such file".into(),
        }
        .into())
    }
}
