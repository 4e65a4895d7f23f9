use std::process::Stdio;

use mattergen_core::{
    application::{
        ApplicationError,
        ports::{CompileJob, Compiler},
    },
    error::CoreResult,
};
use tracing::instrument;

use super::{ToolCommand, run};

/// Compiler invoked as `<tool> <entry> --output <artifact>` from the job's
/// working directory.
///
/// Diagnostics go straight to the user's terminal.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    tool: ToolCommand,
}

impl CommandCompiler {
    pub fn new(tool: ToolCommand) -> Self {
        Self { tool }
    }
}

impl Default for CommandCompiler {
    fn default() -> Self {
        Self::new(ToolCommand::new("elm").arg("make"))
    }
}

impl Compiler for CommandCompiler {
    #[instrument(skip_all, fields(tool = %self.tool, entry = %job.entry.display()))]
    fn compile(&self, job: &CompileJob) -> CoreResult<()> {
        let mut cmd = self.tool.command();
        cmd.arg(&job.entry)
            .arg("--output")
            .arg(&job.artifact)
            .current_dir(&job.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        run(&self.tool, &mut cmd).map(|_| ()).map_err(|e| {
            ApplicationError::EngineBuildFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use mattergen_core::error::CoreError;
    use tempfile::TempDir;

    #[test]
    fn runs_in_working_dir_and_writes_artifact() {
        let tmp = TempDir::new().unwrap();
        // $1 = entry, $3 = artifact
        let tool = ToolCommand::new("sh")
            .arg("-c")
            .arg(r#"test -f "$1" && cp "$1" "$3""#)
            .arg("compiler");
        std::fs::write(tmp.path().join("Main.elm"), "main").unwrap();

        let job = CompileJob {
            working_dir: tmp.path().to_path_buf(),
            entry: "Main.elm".into(),
            artifact: tmp.path().join("engine.js"),
        };
        CommandCompiler::new(tool).compile(&job).unwrap();

        assert_eq!(std::fs::read_to_string(&job.artifact).unwrap(), "main");
    }

    #[test]
    fn non_zero_exit_is_a_build_failure() {
        let tmp = TempDir::new().unwrap();
        let job = CompileJob {
            working_dir: tmp.path().to_path_buf(),
            entry: "Main.elm".into(),
            artifact: tmp.path().join("engine.js"),
        };

        let err = CommandCompiler::new(ToolCommand::new("false"))
            .compile(&job)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Application(ApplicationError::EngineBuildFailed { .. })
        ));
    }
}
