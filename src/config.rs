// Client configuration: defaults, then an optional JSON file, then
// environment overrides. CLI flags are applied last by the binary via
// `with_overrides`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_CONFIG: &str = "ROADSCAN_CONFIG";
pub const ENV_API_URL: &str = "ROADSCAN_API_URL";
pub const ENV_TIMEOUT_MS: &str = "ROADSCAN_TIMEOUT_MS";

#[derive(Debug, Deserialize, Default)]
struct ClientConfigFile {
    api_url: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL the `/detect`, `/health` and `/model-info` paths hang off.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Load from `explicit_path`, else `$ROADSCAN_CONFIG`, else the per-user
    /// config file if it exists; then apply environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG).ok().map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));
        let file_cfg = match path.as_deref() {
            Some(path) => read_config_file(path)?,
            None => ClientConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ClientConfigFile) -> Self {
        let defaults = ClientConfig::default();
        ClientConfig {
            api_url: file.api_url.unwrap_or(defaults.api_url),
            timeout: file
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.api_url = url;
        }
        if let Ok(ms) = std::env::var(ENV_TIMEOUT_MS) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("{} must be an integer number of milliseconds", ENV_TIMEOUT_MS))?;
            self.timeout = Duration::from_millis(ms);
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(ms) = timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&mut self) -> Result<()> {
        let trimmed = self.api_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!("api_url must be an http(s) URL, got {:?}", self.api_url));
        }
        self.api_url = trimmed;
        if self.timeout.is_zero() {
            return Err(anyhow!("timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roadscan").join("config.json"))
}

fn read_config_file(path: &Path) -> Result<ClientConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parsing config file {}", path.display()))
}
