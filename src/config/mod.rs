//! Configuration loading
//!
//! - `env` - environment-keyed profiles and Azure DevOps credentials (`envConfig.json`)
//! - `runner` - suite run settings (`e2e.yaml`) and HTTP client settings

use std::path::PathBuf;

pub mod env;
pub mod runner;

pub use env::{selected_environment, AzureDevOpsConfig, EnvConfig, EnvProfile};
pub use runner::{
    BrowserType, LogConfig, RunnerConfig, SidecarConfig, SyncConfig, WebAuthConfig, WebConfig,
    WebRetryConfig,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown environment '{name}' (available: {available:?})")]
    UnknownEnvironment { name: String, available: Vec<String> },

    #[error("No environment selected; set ENVIRONMENT or pass --env")]
    NoEnvironmentSelected,
}
