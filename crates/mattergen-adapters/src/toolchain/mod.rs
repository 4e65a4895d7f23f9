//! External toolchain adapters: constraint solver, compiler and formatter.
//!
//! Each runs a configured command line to completion with
//! `std::process::Command`; a non-zero exit is an error.

mod compiler;
mod formatter;
mod solver;

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::process::{Command, ExitStatus, Output, Stdio};

use thiserror::Error;
use tracing::debug;

pub use compiler::CommandCompiler;
pub use formatter::CommandFormatter;
pub use solver::CommandSolver;

/// A program plus leading arguments, e.g. `elm make`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Split a whitespace-separated command line. `None` when empty.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A `Command` with the configured program and leading arguments.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Why a tool invocation failed.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}{}", detail_suffix(.detail))]
    Failed {
        program: String,
        status: ExitStatus,
        detail: String,
    },

    #[error("unexpected output from '{program}': {reason}")]
    Output { program: String, reason: String },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}

/// Run `cmd` to completion, failing on spawn errors and non-zero exits.
pub(crate) fn run(tool: &ToolCommand, cmd: &mut Command) -> Result<Output, ToolError> {
    debug!(command = ?cmd, "Running tool");
    let output = cmd.output().map_err(|source| ToolError::Spawn {
        program: tool.program.clone(),
        source,
    })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(ToolError::Failed {
            program: tool.program.clone(),
            status: output.status,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

pub(crate) fn quiet<S: AsRef<OsStr>>(cmd: &mut Command, args: impl IntoIterator<Item = S>) {
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_args() {
        let tool = ToolCommand::parse("elm-format --elm-version=0.19 --yes").unwrap();
        assert_eq!(tool.program(), "elm-format");
        assert_eq!(tool.args(), ["--elm-version=0.19", "--yes"]);
        assert_eq!(tool.to_string(), "elm-format --elm-version=0.19 --yes");
        assert!(ToolCommand::parse("   ").is_none());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let tool = ToolCommand::new("mattergen-no-such-tool");
        let err = run(&tool, &mut tool.command()).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
        assert!(err.to_string().contains("mattergen-no-such-tool"));
    }
}
