mod common;

use std::path::PathBuf;

use common::*;
use playwright_suite::config::{BrowserType, ConfigError, EnvConfig, RunnerConfig};

#[test]
fn test_default_runner_config() {
    let config = RunnerConfig::default();
    assert_eq!(config.test_timeout_ms, 1_200_000);
    assert_eq!(config.expect_timeout_ms, 5_000);
    assert_eq!(config.browser, BrowserType::Chromium);
    assert_eq!(config.api_base_url, "https://petstore.swagger.io");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.output_dir, PathBuf::from("./logs/Playwright"));
    assert!(config.sync.enabled);
    assert_eq!(config.sync.concurrency, 4);
    assert_eq!(config.sync.call_timeout_ms, 30_000);
    assert_eq!(
        config.sidecar.script,
        PathBuf::from("extensions/playwright/server.js")
    );
}

#[test]
fn test_load_minimal_config() {
    let dir = create_test_dir();
    write_file(dir.path(), "e2e.yaml", "workers: 8");

    let config = RunnerConfig::load(dir.path().join("e2e.yaml")).unwrap();
    assert_eq!(config.workers, 8);
    assert_eq!(config.test_timeout_ms, 1_200_000);
}

#[test]
fn test_load_full_config() {
    let dir = create_test_dir();
    write_file(
        dir.path(),
        "e2e.yaml",
        r#"
test_timeout_ms: 60000
retries: 1
workers: 2
browser: firefox
headless: false
api_base_url: "http://localhost:8080"
logging:
  level: debug
  output_dir: ./out
sync:
  enabled: false
  call_timeout_ms: 500
sidecar:
  node: /usr/local/bin/node
  launch_args: ["--start-maximized"]
"#,
    );

    let config = RunnerConfig::load(dir.path().join("e2e.yaml")).unwrap();
    assert_eq!(config.test_timeout_ms, 60_000);
    assert_eq!(config.retries, 1);
    assert_eq!(config.workers, 2);
    assert_eq!(config.browser, BrowserType::Firefox);
    assert!(!config.headless);
    assert_eq!(config.api_base_url, "http://localhost:8080");
    assert_eq!(config.logging.level, "debug");
    assert!(!config.sync.enabled);
    assert_eq!(config.sync.concurrency, 4);
    assert_eq!(config.sync.call_timeout_ms, 500);
    assert_eq!(config.sidecar.node, "/usr/local/bin/node");
    assert_eq!(config.sidecar.launch_args, vec!["--start-maximized"]);
}

#[test]
fn test_missing_runner_config_falls_back_to_defaults() {
    let dir = create_test_dir();
    let config = RunnerConfig::load_or_default(dir.path().join("e2e.yaml")).unwrap();
    assert_eq!(config.test_timeout_ms, 1_200_000);

    let err = RunnerConfig::load(dir.path().join("e2e.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_invalid_yaml_is_reported() {
    let dir = create_test_dir();
    write_file(dir.path(), "e2e.yaml", "workers: [not, a, number]");

    let err = RunnerConfig::load(dir.path().join("e2e.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_load_env_config_file() {
    let dir = create_test_dir();
    write_file(
        dir.path(),
        "envConfig.json",
        r#"{
            "QA": { "BASE_URL": "https://qa.example.com", "NAUKARI_USERNAME": "qa-user" },
            "UAT": { "BASE_URL": "https://uat.example.com" },
            "AzureDevOps": {
                "USERNAME": "qa",
                "PAT_TOKEN": "pat",
                "BASE_URL": "https://dev.azure.com/org",
                "PROJECT": "Licensing"
            }
        }"#,
    );

    let config = EnvConfig::load(dir.path().join("envConfig.json")).unwrap();
    assert_eq!(config.environment_names(), vec!["QA", "UAT"]);
    assert_eq!(config.azure_devops.as_ref().map(|a| a.project.as_str()), Some("Licensing"));

    let qa = config.active_profile(Some("QA")).unwrap();
    assert_eq!(qa.var("NAUKARI_USERNAME").as_deref(), Some("qa-user"));

    let err = config.active_profile(Some("PROD")).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownEnvironment { .. }));
}

#[test]
fn test_env_config_without_azure_block() {
    let config = EnvConfig::from_json(r#"{ "QA": { "BASE_URL": "https://qa" } }"#).unwrap();
    assert!(config.azure_devops.is_none());
    assert_eq!(config.profile("QA").unwrap().base_url, "https://qa");
}
