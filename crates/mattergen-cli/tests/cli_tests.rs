use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `mattergen` invocation isolated from the user's own configuration.
fn mattergen(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mattergen").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_DATA_HOME", home.path().join(".local/share"))
        .env_remove("RUST_LOG")
        .env_remove("MATTERGEN__PROJECT__INPUT_GLOB");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn completions_are_generated() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mattergen"));
}

#[test]
fn quiet_and_verbose_conflict() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .args(["--quiet", "--verbose", "config", "list"])
        .assert()
        .code(2);
}

#[test]
fn config_get_prints_defaults() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .args(["config", "get", "project.input_glob"])
        .assert()
        .success()
        .stdout("**/*.md\n");
}

#[test]
fn environment_overrides_defaults() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .env("MATTERGEN__PROJECT__INPUT_GLOB", "*.markdown")
        .args(["config", "get", "project.input_glob"])
        .assert()
        .success()
        .stdout("*.markdown\n");
}

#[test]
fn project_file_overrides_defaults() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("mattergen.toml"),
        "[project]\ncontent_module = \"Pages\"\n",
    )
    .unwrap();

    mattergen(&home)
        .args(["config", "get", "project.content_module"])
        .assert()
        .success()
        .stdout("Pages\n");
}

#[test]
fn unknown_config_key_is_a_configuration_error() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .args(["config", "get", "project.nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn init_writes_project_config_once() {
    let home = TempDir::new().unwrap();
    mattergen(&home).arg("init").assert().success();
    assert!(home.path().join("mattergen.toml").exists());

    mattergen(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_project_directory_is_not_found() {
    let home = TempDir::new().unwrap();
    mattergen(&home)
        .args(["-C", "does-not-exist", "build", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn package_manifest_terminates_the_build() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("elm.json"),
        r#"{ "type": "package", "dependencies": { "indirect": { "elm/core": "1.0.5" } } }"#,
    )
    .unwrap();

    mattergen(&home)
        .args(["build", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Content generation terminated"))
        .stderr(predicate::str::contains("Invalid manifest"));

    assert!(!home.path().join("src/Content").exists());
}
