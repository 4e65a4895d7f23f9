//! `mattergen config`: inspect the effective configuration.

use std::path::PathBuf;

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, PROJECT_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            // Values are for scripts; print them even in quiet mode.
            println!("{}", get_config_value(&config, &key)?);
        }

        ConfigCommands::List => {
            output.print("# Effective configuration")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            println!("{}", active_config_path(&global).display());
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `project.input_glob`. Unset values print
/// as the empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let tree = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    let value = key
        .split('.')
        .try_fold(&tree, |node, part| node.get(part))
        .ok_or_else(unknown)?;

    match value {
        Value::Object(_) => Err(unknown()),
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// The file that settings come from, in override order.
fn active_config_path(global: &GlobalArgs) -> PathBuf {
    if let Some(path) = &global.config {
        return path.clone();
    }
    let local = global.project.join(PROJECT_CONFIG_FILE);
    if local.exists() {
        local
    } else {
        AppConfig::global_config_path()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "project.input_glob").unwrap(), "**/*.md");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "engine.runner").unwrap(), "node");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn sections_are_not_values() {
        assert!(get_config_value(&AppConfig::default(), "project").is_err());
    }

    #[test]
    fn project_file_is_active_when_present() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            project: tmp.path().to_path_buf(),
            output_format: OutputFormat::Plain,
        };
        assert_eq!(active_config_path(&global), AppConfig::global_config_path());

        std::fs::write(tmp.path().join(PROJECT_CONFIG_FILE), "").unwrap();
        assert_eq!(
            active_config_path(&global),
            tmp.path().join(PROJECT_CONFIG_FILE)
        );
    }
}
