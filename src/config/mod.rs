//! Layered configuration: built-in defaults, an optional TOML file in the
//! platform config directory, then environment overrides on top.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream model API credential. Usually supplied via `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    pub gateway: GatewayConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Production mode serves the static single-page bundle for non-API paths.
    pub production: bool,
    pub static_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            production: false,
            static_dir: PathBuf::from("dist"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 1000,
            max_retries: 3,
        }
    }
}

impl Config {
    /// Load the config file when present, otherwise start from defaults;
    /// environment overrides win either way.
    pub fn load_or_init() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parse config file {}", path.display()))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "maverick").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(key) = get("OPENAI_API_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = Some(key.to_string());
            }
        }
        if let Some(port) = get("PORT").and_then(|p| p.trim().parse().ok()) {
            self.gateway.port = port;
        }
        if let Some(env) = get("MAVERICK_ENV") {
            self.gateway.production = env.trim().eq_ignore_ascii_case("production");
        }
    }
}
