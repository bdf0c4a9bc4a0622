//! Environment profiles
//!
//! `envConfig.json` maps environment names to their variables and carries a
//! separate `AzureDevOps` block for the test plan sync:
//!
//! ```json
//! {
//!   "QA": { "BASE_URL": "https://qa.example.com", "USERNAME": "qa@example.com", "PASSWORD": "..." },
//!   "AzureDevOps": { "USERNAME": "me", "PAT_TOKEN": "...", "BASE_URL": "https://dev.azure.com/org", "PROJECT": "Suite" }
//! }
//! ```
//!
//! The active profile is chosen by `ENVIRONMENT` (or the legacy
//! `environmentToRun`), and individual values can be overridden with
//! `E2E_`-prefixed process variables such as `E2E_BASE_URL`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConfigError;

/// Variables selecting the active environment, in lookup order
pub const ENVIRONMENT_VARS: [&str; 2] = ["ENVIRONMENT", "environmentToRun"];

const OVERRIDE_PREFIX: &str = "E2E_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(rename = "AzureDevOps", default)]
    pub azure_devops: Option<AzureDevOpsConfig>,

    #[serde(flatten)]
    pub environments: HashMap<String, EnvProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EnvProfile {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub useremail: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Any other per-environment variables
    #[serde(flatten)]
    pub vars: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AzureDevOpsConfig {
    pub username: String,
    pub pat_token: String,
    pub base_url: String,
    pub project: String,
}

impl EnvConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn profile(&self, name: &str) -> Result<&EnvProfile, ConfigError> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available: self.environment_names(),
            })
    }

    pub fn environment_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.environments.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the active profile, applying process overrides on top
    pub fn active_profile(&self, explicit: Option<&str>) -> Result<EnvProfile, ConfigError> {
        let name = match explicit {
            Some(name) => name.to_string(),
            None => selected_environment().ok_or(ConfigError::NoEnvironmentSelected)?,
        };
        let mut profile = self.profile(&name)?.clone();
        profile.apply_overrides(|key| std::env::var(format!("{}{}", OVERRIDE_PREFIX, key)).ok());
        Ok(profile)
    }
}

/// Name of the environment selected through the process environment
pub fn selected_environment() -> Option<String> {
    ENVIRONMENT_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

impl EnvProfile {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Look up an extra variable as a string
    pub fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BASE_URL") {
            self.base_url = v;
        }
        let optional = [
            ("USERNAME", &mut self.username),
            ("USEREMAIL", &mut self.useremail),
            ("PASSWORD", &mut self.password),
            ("ROLE", &mut self.role),
            ("TENANT_ID", &mut self.tenant_id),
            ("CLIENT_ID", &mut self.client_id),
            ("CLIENT_SECRET", &mut self.client_secret),
        ];
        for (key, slot) in optional {
            if let Some(v) = lookup(key) {
                *slot = Some(v);
            }
        }
    }
}
