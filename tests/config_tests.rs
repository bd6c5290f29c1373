use std::fs;
use std::sync::Mutex;

use clap::Parser;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use synodupe::actions::DeleteMode;
use synodupe::cli::{Cli, OutputFormat};
use synodupe::config::{Config, ENV_PREFIX};
use synodupe::duplicates::SplitGroupPolicy;
use synodupe::report::RowPolicy;
use tempfile::tempdir;

// Environment variables are process-wide
static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert!(config.strip_path_whitespace);
}

#[test]
fn test_config_load_from_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
dry_run = true
delete_mode = "trash"
malformed_rows = "skip"
split_groups = "replace"
strip_path_whitespace = false
output = "json"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();

    assert!(config.dry_run);
    assert_eq!(config.delete_mode, DeleteMode::Trash);
    assert_eq!(config.malformed_rows, RowPolicy::Skip);
    assert_eq!(config.split_groups, SplitGroupPolicy::Replace);
    assert!(!config.strip_path_whitespace);
    assert!(!config.strict);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "strict = true\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();

    assert!(config.strict);
    assert!(config.strip_path_whitespace);
    assert_eq!(config.delete_mode, DeleteMode::Permanent);
}

#[test]
fn test_config_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "delete_mode = \"permanent\"\n").unwrap();

    std::env::set_var("SYNODUPE_DELETE_MODE", "trash");
    std::env::set_var("SYNODUPE_DRY_RUN", "true");

    let config: Config = Config::figment(&config_path).extract().unwrap();

    std::env::remove_var("SYNODUPE_DELETE_MODE");
    std::env::remove_var("SYNODUPE_DRY_RUN");

    assert_eq!(config.delete_mode, DeleteMode::Trash);
    assert!(config.dry_run);
}

#[test]
fn test_config_env_only() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("SYNODUPE_MALFORMED_ROWS", "skip");

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("SYNODUPE_MALFORMED_ROWS");

    assert_eq!(config.malformed_rows, RowPolicy::Skip);
}

#[test]
fn test_config_invalid_toml_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "delete_mode = \"shred\"").unwrap();

    // Figment itself rejects the unknown variant
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let result: Result<Config, _> = figment.extract();
    assert!(result.is_err());

    // The loader refuses it instead of falling back to defaults
    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_config_invalid_key_keeps_dry_run_fatal() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "dry_run = true\noutput = \"xml\"\n").unwrap();

    // A bad neighbouring key must not turn a configured dry run into a real one
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_run_app_rejects_invalid_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "dry_run = true\ndelete_mode = \"shred\"\n").unwrap();

    let keeper = temp_dir.path().join("a.bin");
    let copy = temp_dir.path().join("b.bin");
    fs::write(&keeper, b"x").unwrap();
    fs::write(&copy, b"x").unwrap();
    let report = temp_dir.path().join("report.csv");
    fs::write(
        &report,
        format!(
            "Group\tShared Folder\tFile\tSize(Byte)\n1\tv\t{}\t1\n1\tv\t{}\t1\n",
            keeper.display(),
            copy.display()
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "synodupe",
        "--no-color",
        "-f",
        report.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ])
    .unwrap();

    let err = synodupe::run_app(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load configuration"));
    assert!(copy.exists());
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_path_is_toml() {
    if let Ok(path) = Config::config_path() {
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
