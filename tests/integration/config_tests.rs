use clap::Parser;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use mimedupe::cli::{Cli, OutputFormat};
use mimedupe::config::Config;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.io_threads, 4);
    assert_eq!(config.classifier_program, "file");
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("MIMEDUPE_IO_THREADS", "16");
    std::env::set_var("MIMEDUPE_RECURSIVE", "true");
    std::env::set_var("MIMEDUPE_OUTPUT", "json");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("MIMEDUPE_").split("__"));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.io_threads, 16);
    assert!(config.recursive);
    assert_eq!(config.output, OutputFormat::Json);

    std::env::remove_var("MIMEDUPE_IO_THREADS");
    std::env::remove_var("MIMEDUPE_RECURSIVE");
    std::env::remove_var("MIMEDUPE_OUTPUT");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
recursive = true
mime_filters = ["image/jpeg", "image/png"]
io_threads = 8
classifier_program = "/usr/local/bin/file"
output = "json"
show_types = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert!(config.recursive);
    assert_eq!(config.mime_filters, vec!["image/jpeg", "image/png"]);
    assert_eq!(config.io_threads, 8);
    assert_eq!(config.classifier_program, "/usr/local/bin/file");
    assert_eq!(config.output, OutputFormat::Json);
    assert!(config.show_types);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "show_types = true\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert!(config.show_types);
    assert!(config.mime_filters.is_empty());
    assert_eq!(config.classifier_program, "file");
}

#[test]
fn test_config_explicit_file_through_load() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "mime_filters = [\"text/plain\"]\nclassifier_program = \"file\"\n",
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.mime_filters, vec!["text/plain"]);
}

#[test]
fn test_config_invalid_value_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "show_types = \"definitely\"\n").unwrap();

    let result = Config::load(Some(&config_path));

    assert!(result.is_err());
}

#[test]
fn test_config_malformed_toml_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "mime_filters = [unterminated\n").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_cli_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "mime_filters = [\"text/plain\"]\n").unwrap();

    let mut config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::try_parse_from(["mimedupe", "-m", "image/gif", "--show-types"]).unwrap();
    config.apply_cli(&cli);

    assert_eq!(config.mime_filters, vec!["image/gif"]);
    assert!(config.show_types);
}

#[test]
fn test_default_config_path_is_toml() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with("config.toml"));
    }
}
