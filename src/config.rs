use crate::ev::types::Side;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_FILE: &str = ".env";
const API_URL_ENV: &str = "NFL_EV_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ev_service: EvServiceConfig,
    #[serde(default)]
    pub defaults: FormDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_ms() -> u64 { 10_000 }

impl Default for EvServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

impl EvServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Initial form contents, and the fallback for any numeric field left
/// empty or unparseable at submission time.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormDefaults {
    pub slug: String,
    pub side: Side,
    pub fee_cost: f64,
    pub quarter: u8,
    pub clock: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_has_ball: bool,
    pub yardline: String,
    pub down: u8,
    pub ydstogo: u8,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            slug: String::new(),
            side: Side::HomeYes,
            fee_cost: 0.01,
            quarter: 1,
            clock: "15:00".to_string(),
            home_score: 0,
            away_score: 0,
            home_has_ball: true,
            yardline: String::new(),
            down: 1,
            ydstogo: 10,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = sanitize_value(&url);
            if !url.is_empty() {
                self.ev_service.base_url = url;
            }
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env_lines(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// KEY=VALUE pairs from a dotenv file. Comments, blank lines and quotes are
/// stripped.
fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    // Strip BOM if present (common on Windows-created files)
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

/// Strip carriage returns, BOM, and other invisible chars from a value.
fn sanitize_value(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
