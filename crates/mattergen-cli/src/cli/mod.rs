//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "mattergen",
    bin_name = "mattergen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate typed source modules from front-matter documents",
    long_about = "mattergen feeds the front-matter of your content documents to a \
                  generation engine and writes the modules it produces into your \
                  source tree, after asking for confirmation.",
    after_help = "EXAMPLES:\n\
        \x20 mattergen build\n\
        \x20 mattergen -C site build --yes\n\
        \x20 mattergen build --input posts --glob '**/*.markdown'\n\
        \x20 mattergen completions bash > /usr/share/bash-completion/completions/mattergen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate content modules from the project's documents.
    #[command(
        visible_alias = "b",
        about = "Generate content modules",
        after_help = "EXAMPLES:\n\
            \x20 mattergen build\n\
            \x20 mattergen build --yes --jobs 32\n\
            \x20 mattergen build --engine-dir ./engine --runner node"
    )]
    Build(BuildArgs),

    /// Write a default `mattergen.toml`.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 mattergen init           # mattergen.toml in the project\n\
            \x20 mattergen init --global  # user-wide config"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 mattergen completions bash > ~/.local/share/bash-completion/completions/mattergen\n\
            \x20 mattergen completions zsh  > ~/.zfunc/_mattergen\n\
            \x20 mattergen completions fish > ~/.config/fish/completions/mattergen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 mattergen config get project.input_glob\n\
            \x20 mattergen config list\n\
            \x20 mattergen config path"
    )]
    Config(ConfigCommands),
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Arguments for `mattergen build`. Each flag overrides its configuration
/// value for this run only.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Skip the overwrite confirmation.
    #[arg(short = 'y', long = "yes", help = "Overwrite without asking")]
    pub yes: bool,

    /// Directory scanned for documents, relative to the project.
    #[arg(short = 'i', long = "input", value_name = "DIR", help = "Input directory")]
    pub input: Option<PathBuf>,

    /// Glob selecting documents inside the input directory.
    #[arg(short = 'g', long = "glob", value_name = "PATTERN", help = "Input glob")]
    pub glob: Option<String>,

    /// Engine source directory.
    #[arg(long = "engine-dir", value_name = "DIR", help = "Engine source directory")]
    pub engine_dir: Option<PathBuf>,

    /// Interpreter for the compiled engine, e.g. `node`.
    #[arg(long = "runner", value_name = "COMMAND", help = "Engine runner command")]
    pub runner: Option<String>,

    /// How many documents are read concurrently.
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Concurrent document loads"
    )]
    pub jobs: Option<u16>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `mattergen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location instead of the project.
    #[arg(long = "global", help = "Create global configuration")]
    pub global: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `mattergen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `mattergen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `project.input_glob`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_command() {
        let cli = Cli::parse_from([
            "mattergen", "-C", "site", "build", "--yes", "--glob", "**/*.markdown", "-j", "4",
        ]);
        assert_eq!(cli.global.project, PathBuf::from("site"));
        match cli.command {
            Commands::Build(args) => {
                assert!(args.yes);
                assert_eq!(args.glob.as_deref(), Some("**/*.markdown"));
                assert_eq!(args.jobs, Some(4));
                assert!(args.engine_dir.is_none());
            }
            other => panic!("expected Build command, got {other:?}"),
        }
    }

    #[test]
    fn build_alias() {
        let cli = Cli::parse_from(["mattergen", "b"]);
        assert!(matches!(cli.command, Commands::Build(_)));
    }

    #[test]
    fn project_defaults_to_current_dir() {
        let cli = Cli::parse_from(["mattergen", "config", "path"]);
        assert_eq!(cli.global.project, PathBuf::from("."));
    }

    #[test]
    fn zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["mattergen", "build", "--jobs", "0"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["mattergen", "--quiet", "--verbose", "build"]);
        assert!(result.is_err());
    }
}
