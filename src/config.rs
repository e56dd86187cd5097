//! Configuration Management
//!
//! Persisted defaults for the `resource-client` binary.

use anyhow::{Context, Result};
use resource_client::EndpointVersion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const BASE_URL_ENV: &str = "RESOURCE_CLIENT_BASE_URL";
pub const JWT_ENV: &str = "MAJOR_JWT_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub endpoint: Option<EndpointVersion>,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("resource-client").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            },
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("No config directory on this platform")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(path)
    }

    /// Merge newly given values over the saved ones
    pub fn update(&mut self, base_url: Option<String>, application_id: Option<String>, endpoint: Option<EndpointVersion>) {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if application_id.is_some() {
            self.application_id = application_id;
        }
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
    }

    /// Effective base URL (CLI > environment > config)
    pub fn effective_base_url(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, std::env::var(BASE_URL_ENV).ok(), self.base_url.as_deref())
    }

    /// Effective application id (CLI > config)
    pub fn effective_application_id(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, None, self.application_id.as_deref())
    }

    pub fn effective_endpoint(&self, cli: Option<EndpointVersion>) -> EndpointVersion {
        cli.or(self.endpoint).unwrap_or_default()
    }
}

/// JWT from the CLI flag, else the environment
pub fn effective_jwt(cli: Option<&str>) -> Option<String> {
    pick(cli, std::env::var(JWT_ENV).ok(), None)
}

fn pick(cli: Option<&str>, env: Option<String>, saved: Option<&str>) -> Option<String> {
    cli.map(str::to_string)
        .or(env.filter(|v| !v.is_empty()))
        .or_else(|| saved.map(str::to_string))
}
