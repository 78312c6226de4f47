use anyhow::{Context, Result};
use log::warn;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Connection settings for the analysis service.
///
/// `username`/`password` is a fixed credential pair shared by every client and
/// sent as basic auth on each request. It is a known weakness of the service,
/// not a per-user secret; deployments beyond a trusted network need
/// per-session tokens instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            username: "admin".into(),
            password: "admin123".into(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolves `path` against the base URL. A missing trailing slash on the
    /// base is tolerated so `.../api` and `.../api/` behave the same.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .with_context(|| format!("Invalid service base URL '{}'", self.base_url))?;
        base.join(path)
            .with_context(|| format!("Failed to build endpoint '{path}' from {base}"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    client: ClientConfig,
}

/// Optional JSON overrides for the client configuration.
pub struct SettingsStore {
    path: PathBuf,
    data: UserSettings,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring invalid settings in {}: {err}; using defaults",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn client_config(&self) -> ClientConfig {
        self.data.client.clone()
    }
}
