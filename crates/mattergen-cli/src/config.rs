//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only ever sees the [`BuildConfig`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied by the `build` command)
//! 2. Environment variables, `MATTERGEN__<SECTION>__<KEY>`
//! 3. `--config FILE`, or `mattergen.toml` in the project directory
//! 4. The global config file (see [`AppConfig::global_config_path`])
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use mattergen_core::domain::{BuildConfig, EngineLayout};
use serde::{Deserialize, Serialize};

/// Per-project configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "mattergen.toml";

const ENV_PREFIX: &str = "MATTERGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where documents come from and where generated modules go.
    pub project: ProjectConfig,
    /// Engine sources and how to run the compiled engine.
    pub engine: EngineConfig,
    /// External commands.
    pub toolchain: ToolchainConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub input_dir: PathBuf,
    pub input_glob: String,
    pub source_dir: PathBuf,
    pub content_module: String,
    pub entry_document: PathBuf,
    pub manifest: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine sources; the per-user data directory when unset.
    pub root: Option<PathBuf>,
    pub program_dir: PathBuf,
    pub library_dir: Option<PathBuf>,
    pub manifest: PathBuf,
    pub entry: PathBuf,
    /// Interpreter for the compiled artifact. Empty runs the artifact
    /// directly.
    pub runner: Option<String>,
    pub load_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub solver: String,
    pub compiler: String,
    pub formatter: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let build = BuildConfig::new(".");
        Self {
            input_dir: build.input_dir,
            input_glob: build.input_glob,
            source_dir: build.source_dir,
            content_module: build.content_module,
            entry_document: build.entry_document,
            manifest: build.host_manifest,
        }
    }
}

/// The compiler emits JavaScript, which is not executable on its own.
pub const DEFAULT_RUNNER: &str = "node";

impl Default for EngineConfig {
    fn default() -> Self {
        let layout = EngineLayout::default();
        Self {
            root: None,
            program_dir: layout.program_dir,
            library_dir: layout.library_dir,
            manifest: layout.manifest,
            entry: layout.entry,
            runner: Some(DEFAULT_RUNNER.into()),
            load_concurrency: mattergen_core::application::services::DEFAULT_LOAD_CONCURRENCY,
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            solver: "elm-json".into(),
            compiler: "elm make".into(),
            formatter: "elm-format --elm-version=0.19 --yes".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration for the project at `project_dir`.
    ///
    /// An explicit `config_file` must exist; the project and global files
    /// are optional.
    pub fn load(config_file: Option<&Path>, project_dir: &Path) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to encode default configuration")?;

        let local = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(project_dir.join(PROJECT_CONFIG_FILE)).required(false),
        };

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(Self::global_config_path()).required(false))
            .add_source(local)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user-wide configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.mattergen.toml` in the current directory.
    pub fn global_config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "mattergen", "mattergen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".mattergen.toml"))
    }

    /// Engine sources used when `engine.root` is not configured.
    pub fn default_engine_dir() -> PathBuf {
        directories::ProjectDirs::from("dev", "mattergen", "mattergen")
            .map(|d| d.data_dir().join("engine"))
            .unwrap_or_else(|| PathBuf::from(".mattergen/engine"))
    }

    /// The core build configuration for a project rooted at `project_root`.
    pub fn to_build_config(&self, project_root: &Path) -> BuildConfig {
        let project = &self.project;
        let engine = &self.engine;

        BuildConfig {
            project_root: project_root.to_path_buf(),
            input_dir: project.input_dir.clone(),
            input_glob: project.input_glob.clone(),
            source_dir: project.source_dir.clone(),
            content_module: project.content_module.clone(),
            entry_document: project.entry_document.clone(),
            host_manifest: project.manifest.clone(),
            engine: EngineLayout {
                root: engine.root.clone().unwrap_or_else(Self::default_engine_dir),
                program_dir: engine.program_dir.clone(),
                library_dir: engine.library_dir.clone(),
                manifest: engine.manifest.clone(),
                entry: engine.entry.clone(),
            },
            assume_yes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_mirror_build_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.project.input_glob, "**/*.md");
        assert_eq!(cfg.project.content_module, "Content");
        assert_eq!(cfg.toolchain.compiler, "elm make");
        assert!(!cfg.output.no_color);
        assert!(cfg.engine.load_concurrency > 0);
    }

    #[test]
    fn default_engine_runs_under_node() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.engine.runner.as_deref(), Some(DEFAULT_RUNNER));
    }

    #[test]
    fn project_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(PROJECT_CONFIG_FILE),
            "[project]\ninput_dir = \"posts\"\n\n[engine]\nroot = \"vendor/engine\"\nrunner = \"node\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(None, tmp.path()).unwrap();
        assert_eq!(cfg.project.input_dir, PathBuf::from("posts"));
        assert_eq!(cfg.project.source_dir, PathBuf::from("src"));
        assert_eq!(cfg.engine.runner.as_deref(), Some("node"));

        let build = cfg.to_build_config(tmp.path());
        assert_eq!(build.input_root(), tmp.path().join("posts"));
        assert_eq!(build.engine_root(), tmp.path().join("vendor/engine"));
    }

    #[test]
    fn explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing), tmp.path()).is_err());
    }

    #[test]
    fn unset_engine_root_uses_data_dir() {
        let build = AppConfig::default().to_build_config(Path::new("/site"));
        assert_eq!(build.engine.root, AppConfig::default_engine_dir());
        assert!(!build.assume_yes);
    }

    #[test]
    fn default_config_serialises_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[project]"));
        assert!(text.contains("input_glob = \"**/*.md\""));
    }
}
