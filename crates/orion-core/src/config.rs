//! Configuration loading.
//!
//! All settings live in `{config_root}/config/main.yaml`. A missing file is
//! not an error; every section has workable defaults and the API key can
//! come from `ORION_API_KEY`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const API_KEY_ENV: &str = "ORION_API_KEY";

fn default_app_id() -> String {
    "default-titan-app".to_string()
}

fn default_completion_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MainConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub vault: VaultSettings,
    #[serde(default)]
    pub voice: VoiceSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Falls back to `ORION_API_KEY` when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            completion_model: default_completion_model(),
            image_model: default_image_model(),
        }
    }
}

impl ProviderSettings {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub custom_token: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_token: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            program: None,
            voice: None,
            locale: default_locale(),
        }
    }
}

/// Loads `{root}/config/main.yaml`, returning defaults when the file does
/// not exist and an error when it exists but cannot be parsed.
pub fn load_main_config(config_root: &Path) -> Result<MainConfig> {
    let path = config_root.join("config").join("main.yaml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(MainConfig::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: MainConfig =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

impl MainConfig {
    /// Human-readable problems a `validate` run should surface. An empty
    /// result means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.provider.resolve_api_key().is_none() {
            issues.push(format!(
                "no API key: set provider.api_key or the {API_KEY_ENV} environment variable"
            ));
        }
        if self.app.app_id.trim().is_empty() {
            issues.push("app.app_id must not be empty".to_string());
        }
        if self.vault.enabled && self.vault.base_url.is_none() {
            issues.push("vault.enabled requires vault.base_url".to_string());
        }
        if self.vault.poll_interval_secs == 0 {
            issues.push("vault.poll_interval_secs must be at least 1".to_string());
        }
        issues
    }
}
