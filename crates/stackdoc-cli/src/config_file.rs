use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileHostEntry {
    pub name: String,
    pub url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub hosts: Vec<FileHostEntry>,
    pub output_dir: Option<PathBuf>,
    pub output_format: Option<String>,
    pub schedule_time: Option<String>,
    pub timezone: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub max_backups: Option<usize>,
    pub include_compose_files: Option<bool>,
    pub include_templates: Option<bool>,
    pub include_registries: Option<bool>,
    pub include_auth_settings: Option<bool>,
    pub include_license_info: Option<bool>,
    pub include_users_teams: Option<bool>,
    pub include_images: Option<bool>,
    pub include_deployments: Option<bool>,
}

/// Reads `path` by extension: `.toml` as TOML, `.yml`/`.yaml` as YAML,
/// anything else as JSON.
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let parsed = match extension.as_str() {
        "toml" => toml::from_str(&raw).map_err(anyhow::Error::from),
        "yml" | "yaml" => serde_yaml::from_str(&raw).map_err(anyhow::Error::from),
        _ => serde_json::from_str(&raw).map_err(anyhow::Error::from),
    };
    parsed.with_context(|| format!("failed to parse config file {}", path.display()))
}
