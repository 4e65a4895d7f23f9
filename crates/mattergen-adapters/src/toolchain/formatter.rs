use std::path::Path;

use mattergen_core::{
    application::{ApplicationError, ports::Formatter},
    error::CoreResult,
};
use tracing::instrument;

use super::{ToolCommand, quiet, run};

/// Formatter invoked as `<tool> <dir>` with all output discarded.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    tool: ToolCommand,
}

impl CommandFormatter {
    pub fn new(tool: ToolCommand) -> Self {
        Self { tool }
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new(
            ToolCommand::new("elm-format")
                .arg("--elm-version=0.19")
                .arg("--yes"),
        )
    }
}

impl Formatter for CommandFormatter {
    #[instrument(skip_all, fields(tool = %self.tool, dir = %dir.display()))]
    fn format(&self, dir: &Path) -> CoreResult<()> {
        let mut cmd = self.tool.command();
        quiet(&mut cmd, [dir]);
        run(&self.tool, &mut cmd).map(|_| ()).map_err(|e| {
            ApplicationError::ToolFailed {
                tool: self.tool.program().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn reports_failure_without_panicking() {
        let formatter = CommandFormatter::new(ToolCommand::new("false"));
        assert!(formatter.format(Path::new("/tmp")).is_err());
    }

    #[test]
    fn succeeds_when_tool_succeeds() {
        let formatter = CommandFormatter::new(ToolCommand::new("true"));
        assert!(formatter.format(Path::new("/tmp")).is_ok());
    }
}
