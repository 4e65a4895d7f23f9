//! Implementation of the `mattergen build` command.
//!
//! Responsibility: turn configuration and flags into a `BuildConfig`, wire
//! the adapters into a `BuildService`, drive it on a current-thread runtime
//! and report the result. No build logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument};

use mattergen_adapters::{
    CommandCompiler, CommandFormatter, CommandSolver, GlobDocumentSource, LocalFilesystem,
    ProcessEngineLoader, ToolCommand, builtin_handlers,
};
use mattergen_core::{
    application::{BuildReport, BuildService},
    domain::BuildConfig,
};

use crate::{
    cli::{BuildArgs, GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::{ConsoleDisplay, OutputManager},
    prompt::TerminalConfirmer,
};

/// Printed once the content directory has been replaced.
pub const SUCCESS_BANNER: &str = "All files written";

/// Execute the `mattergen build` command.
///
/// 1. Resolve the project directory and effective configuration
/// 2. Assemble the adapters
/// 3. Run the build (the confirmation happens inside it)
/// 4. Report what was written
#[instrument(skip_all)]
pub fn execute(
    args: BuildArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project_root = resolve_project(&global.project)?;
    let build_config = build_config(&args, &config, &project_root);
    let load_concurrency = args
        .jobs
        .map(usize::from)
        .unwrap_or(config.engine.load_concurrency)
        .max(1);

    let engine_loader = engine_loader(&args, &config)?;
    let documents = GlobDocumentSource::from_config(&build_config)?;

    let output = Arc::new(output);
    let progress = output.spinner("Generating content");

    let service = BuildService::builder(build_config)
        .filesystem(Arc::new(LocalFilesystem::new()))
        .solver(Arc::new(CommandSolver::new(tool(
            "solver",
            &config.toolchain.solver,
        )?)))
        .compiler(Arc::new(CommandCompiler::new(tool(
            "compiler",
            &config.toolchain.compiler,
        )?)))
        .engine_loader(Arc::new(engine_loader))
        .documents(Arc::new(documents))
        .confirmer(Arc::new(TerminalConfirmer::new(progress.clone())))
        .formatter(Arc::new(CommandFormatter::new(tool(
            "formatter",
            &config.toolchain.formatter,
        )?)))
        .display(Arc::new(ConsoleDisplay::new(
            Arc::clone(&output),
            progress.clone(),
        )))
        .handlers(builtin_handlers())
        .load_concurrency(load_concurrency)
        .build()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_cli_context(|| "Failed to start the async runtime")?;
    let result = runtime.block_on(service.build());
    progress.finish_and_clear();

    let report = result.with_cli_context(|| "building content")?;
    info!(build_id = %report.build_id, files = report.files_written, "Build finished");
    print_report(&report, &output)
}

fn print_report(report: &BuildReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "buildId": report.build_id.to_string(),
            "target": report.target.display().to_string(),
            "inputs": report.inputs,
            "effectsPerformed": report.effects_performed,
            "filesWritten": report.files_written,
            "formatted": report.formatted,
            "elapsedMs": report.elapsed().num_milliseconds(),
        }))?;
        return Ok(());
    }

    output.banner(SUCCESS_BANNER)?;
    output.info(&format!(
        "{} files from {} documents into {} ({} ms)",
        report.files_written,
        report.inputs,
        report.target.display(),
        report.elapsed().num_milliseconds(),
    ))?;
    if !report.formatted {
        output.warning("The formatter failed; generated files were left unformatted")?;
    }
    Ok(())
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn resolve_project(dir: &Path) -> CliResult<PathBuf> {
    if !dir.is_dir() {
        return Err(CliError::ProjectNotFound {
            path: dir.to_path_buf(),
        });
    }
    std::fs::canonicalize(dir)
        .with_cli_context(|| format!("Failed to resolve project directory '{}'", dir.display()))
}

/// Configured values with this run's flags applied on top.
fn build_config(args: &BuildArgs, config: &AppConfig, project_root: &Path) -> BuildConfig {
    let mut build = config.to_build_config(project_root).assume_yes(args.yes);
    if let Some(input) = &args.input {
        build.input_dir = input.clone();
    }
    if let Some(glob) = &args.glob {
        build.input_glob = glob.clone();
    }
    if let Some(dir) = &args.engine_dir {
        build.engine.root = dir.clone();
    }
    build
}

/// `--runner` must name a command; a blank configured runner means the
/// artifact is executed directly.
fn engine_loader(args: &BuildArgs, config: &AppConfig) -> CliResult<ProcessEngineLoader> {
    if let Some(line) = args.runner.as_deref() {
        let runner = ToolCommand::parse(line).ok_or_else(|| CliError::InvalidInput {
            message: "the engine runner command is empty".into(),
            source: None,
        })?;
        return Ok(ProcessEngineLoader::with_runner(runner));
    }
    Ok(config
        .engine
        .runner
        .as_deref()
        .and_then(ToolCommand::parse)
        .map_or_else(ProcessEngineLoader::new, ProcessEngineLoader::with_runner))
}

fn tool(name: &str, line: &str) -> CliResult<ToolCommand> {
    ToolCommand::parse(line).ok_or_else(|| CliError::ConfigError {
        message: format!("toolchain.{name} must name a command"),
        source: None,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildArgs {
        BuildArgs {
            yes: false,
            input: None,
            glob: None,
            engine_dir: None,
            runner: None,
            jobs: None,
        }
    }

    #[test]
    fn flags_override_configuration() {
        let args = BuildArgs {
            yes: true,
            input: Some(PathBuf::from("posts")),
            glob: Some("*.markdown".into()),
            engine_dir: Some(PathBuf::from("engine")),
            ..args()
        };
        let build = build_config(&args, &AppConfig::default(), Path::new("/site"));

        assert!(build.assume_yes);
        assert_eq!(build.input_root(), PathBuf::from("/site/posts"));
        assert_eq!(build.input_glob, "*.markdown");
        assert_eq!(build.engine_root(), PathBuf::from("/site/engine"));
    }

    #[test]
    fn configuration_used_without_flags() {
        let build = build_config(&args(), &AppConfig::default(), Path::new("/site"));
        assert!(!build.assume_yes);
        assert_eq!(build.input_glob, "**/*.md");
        assert_eq!(build.content_dir(), PathBuf::from("/site/src/Content"));
    }

    #[test]
    fn empty_tool_command_is_a_config_error() {
        assert!(matches!(
            tool("solver", "   "),
            Err(CliError::ConfigError { .. })
        ));
        assert_eq!(tool("compiler", "elm make").unwrap().program(), "elm");
    }

    #[test]
    fn engine_runner_comes_from_flag_or_config() {
        let config = AppConfig::default();
        assert_eq!(
            engine_loader(&args(), &config).unwrap().runner().map(ToolCommand::program),
            Some("node")
        );

        let flagged = BuildArgs {
            runner: Some("deno run".into()),
            ..args()
        };
        assert_eq!(
            engine_loader(&flagged, &config).unwrap().runner().map(ToolCommand::program),
            Some("deno")
        );

        let blank = BuildArgs {
            runner: Some(" ".into()),
            ..args()
        };
        assert!(matches!(
            engine_loader(&blank, &config),
            Err(CliError::InvalidInput { .. })
        ));
    }

    #[test]
    fn blank_configured_runner_executes_directly() {
        let mut config = AppConfig::default();
        config.engine.runner = Some(String::new());
        assert!(engine_loader(&args(), &config).unwrap().runner().is_none());
    }

    #[test]
    fn missing_project_is_not_found() {
        let err = resolve_project(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CliError::ProjectNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
