use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

pub const ENV_STORE_URL: &str = "SUPABASE_URL";
pub const ENV_STORE_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ENV_STORE_TABLE: &str = "SUPABASE_TABLE";
pub const ENV_PROVIDER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_PROVIDER_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_PROVIDER_UNITS: &str = "OPENWEATHER_UNITS";
pub const ENV_BIND: &str = "WEATHER_API_BIND";

pub const DEFAULT_TABLE: &str = "weather_requests";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_UNITS: &str = "metric";

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

/// Hosted datastore (Supabase) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

/// Weather provider (OpenWeatherMap) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
        }
    }
}

/// Service configuration: optional TOML file, overridden by the environment.
///
/// Example TOML:
/// ```toml
/// [server]
/// bind = "127.0.0.1:8000"
///
/// [store]
/// url = "https://project.supabase.co"
/// table = "weather_requests"
///
/// [provider]
/// units = "metric"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub provider: ProviderConfig,
}

impl Config {
    /// Load the file (explicit path, else the platform default if it exists),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_file_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_STORE_URL) {
            self.store.url = Some(v);
        }
        if let Some(v) = get(ENV_STORE_SERVICE_KEY) {
            self.store.service_key = Some(v);
        }
        if let Some(v) = get(ENV_STORE_TABLE) {
            self.store.table = v;
        }
        if let Some(v) = get(ENV_PROVIDER_API_KEY) {
            self.provider.api_key = Some(v);
        }
        if let Some(v) = get(ENV_PROVIDER_BASE_URL) {
            self.provider.base_url = v;
        }
        if let Some(v) = get(ENV_PROVIDER_UNITS) {
            self.provider.units = v;
        }
        if let Some(v) = get(ENV_BIND) {
            self.server.bind = v
                .parse()
                .with_context(|| format!("Invalid {ENV_BIND} address: {v}"))?;
        }

        Ok(())
    }

    pub fn store_url(&self) -> Result<&str> {
        require(self.store.url.as_deref(), "datastore URL", ENV_STORE_URL)
    }

    pub fn store_service_key(&self) -> Result<&str> {
        require(
            self.store.service_key.as_deref(),
            "datastore service key",
            ENV_STORE_SERVICE_KEY,
        )
    }

    pub fn provider_api_key(&self) -> Result<&str> {
        require(
            self.provider.api_key.as_deref(),
            "weather provider API key",
            ENV_PROVIDER_API_KEY,
        )
    }
}

fn require<'a>(value: Option<&'a str>, what: &str, env: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        anyhow!(
            "No {what} configured.\n\
             Hint: set the `{env}` environment variable."
        )
    })
}
