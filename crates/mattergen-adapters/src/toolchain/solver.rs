use std::path::Path;
use std::process::Stdio;

use mattergen_core::{
    application::{ApplicationError, ports::DependencySolver},
    domain::{Constraint, ResolvedVersions, VersionMap},
    error::{CoreError, CoreResult},
};
use serde_json::Value;
use tracing::instrument;

use super::{ToolCommand, ToolError, run};

/// Solver invoked as `<tool> solve --extra <name@constraint>... -- <manifest>`.
///
/// Stdout must be a JSON object of name → version; the split
/// `{ "direct": {..}, "indirect": {..} }` shape is flattened.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    tool: ToolCommand,
}

impl CommandSolver {
    pub fn new(tool: ToolCommand) -> Self {
        Self { tool }
    }
}

impl Default for CommandSolver {
    fn default() -> Self {
        Self::new(ToolCommand::new("elm-json"))
    }
}

impl DependencySolver for CommandSolver {
    #[instrument(skip_all, fields(tool = %self.tool, extra = extra.len()))]
    fn solve(&self, extra: &[Constraint], manifest: &Path) -> CoreResult<ResolvedVersions> {
        let mut cmd = self.tool.command();
        cmd.arg("solve");
        if !extra.is_empty() {
            cmd.arg("--extra");
            cmd.args(extra.iter().map(Constraint::to_string));
        }
        cmd.arg("--").arg(manifest).stdin(Stdio::null());

        let output = run(&self.tool, &mut cmd).map_err(failed)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_solution(&stdout)
            .map(ResolvedVersions)
            .map_err(|reason| {
                failed(ToolError::Output {
                    program: self.tool.program().to_string(),
                    reason,
                })
            })
    }
}

fn failed(err: ToolError) -> CoreError {
    ApplicationError::DependencyResolutionFailed {
        reason: err.to_string(),
    }
    .into()
}

/// Read solver output, flat or split into `direct`/`indirect`.
pub(crate) fn parse_solution(text: &str) -> Result<VersionMap, String> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| e.to_string())?;
    let Value::Object(map) = value else {
        return Err("expected a JSON object".into());
    };

    let is_split = map.contains_key("direct") && map.values().all(Value::is_object);
    let sections: Vec<&serde_json::Map<String, Value>> = if is_split {
        map.values().filter_map(Value::as_object).collect()
    } else {
        vec![&map]
    };

    let mut versions = VersionMap::new();
    for section in sections {
        for (name, version) in section {
            let version = version
                .as_str()
                .ok_or_else(|| format!("version of '{}' is not a string", name))?;
            versions.insert(name.clone(), version.to_string());
        }
    }
    Ok(versions)
}
