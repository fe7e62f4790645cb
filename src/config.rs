//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! Configuration is read once at startup. The backend base URL is resolved
//! from it a single time and handed to the data client; nothing reads the
//! environment afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Endpoint used for local development and when no page origin is known
pub const LOCAL_DEV_ENDPOINT: &str = "http://localhost:8000";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the backend is reached when the dashboard is not on localhost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Same host as the page, on the backend port
    #[default]
    Direct,
    /// A path on the page origin, routed by a reverse proxy
    ReverseProxy,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Direct => "direct",
            BackendMode::ReverseProxy => "reverse_proxy",
        }
    }
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(BackendMode::Direct),
            "reverse_proxy" | "reverse-proxy" | "proxy" => Ok(BackendMode::ReverseProxy),
            other => Err(format!("Unknown backend mode: {}", other)),
        }
    }
}

/// Weather-station backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Explicit base URL; wins over everything else
    #[serde(default)]
    pub url: Option<String>,

    /// Origin the dashboard is reached through (e.g. "http://weatherpi.local")
    #[serde(default)]
    pub page_origin: Option<String>,

    #[serde(default)]
    pub mode: BackendMode,

    #[serde(default = "default_backend_port")]
    pub port: u16,

    #[serde(default = "default_proxy_path")]
    pub proxy_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_port() -> u16 {
    8000
}

fn default_proxy_path() -> String {
    "/api".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            page_origin: None,
            mode: BackendMode::default(),
            port: default_backend_port(),
            proxy_path: default_proxy_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    /// Resolve the backend base URL
    ///
    /// 1. An explicit `url` always wins.
    /// 2. With a page origin: localhost pages use the local dev endpoint;
    ///    other hosts use `http://{host}:{port}` or `{origin}{proxy_path}`
    ///    depending on `mode`.
    /// 3. Without a page origin: the local dev endpoint.
    ///
    /// Trailing slashes are removed.
    pub fn resolve_base_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = non_blank(self.url.as_deref()) {
            return Ok(trim_url(url));
        }

        let Some(origin) = non_blank(self.page_origin.as_deref()) else {
            return Ok(LOCAL_DEV_ENDPOINT.to_string());
        };

        let parsed = reqwest::Url::parse(origin).map_err(|e| ConfigError::InvalidUrl {
            url: origin.to_string(),
            error: e.to_string(),
        })?;

        let host = parsed.host_str().ok_or_else(|| ConfigError::InvalidUrl {
            url: origin.to_string(),
            error: "page origin has no host".to_string(),
        })?;

        if host == "localhost" || host == "127.0.0.1" {
            return Ok(LOCAL_DEV_ENDPOINT.to_string());
        }

        match self.mode {
            BackendMode::Direct => Ok(format!("http://{}:{}", host, self.port)),
            BackendMode::ReverseProxy => {
                let path = self.proxy_path.trim_matches('/');
                let origin = parsed.origin().ascii_serialization();
                if path.is_empty() {
                    Ok(origin)
                } else {
                    Ok(format!("{}/{}", origin, path))
                }
            }
        }
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("weatherdash").join("config.toml")),
            Some(PathBuf::from("/etc/weatherdash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Backend overrides
        if let Some(url) = lookup("WEATHERDASH_API_URL") {
            self.backend.url = Some(url);
        }
        if let Some(origin) = lookup("WEATHERDASH_PAGE_ORIGIN") {
            self.backend.page_origin = Some(origin);
        }
        if let Some(mode) = lookup("WEATHERDASH_BACKEND_MODE") {
            match mode.parse() {
                Ok(mode) => self.backend.mode = mode,
                Err(e) => tracing::warn!("Ignoring WEATHERDASH_BACKEND_MODE: {}", e),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("WEATHERDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("WEATHERDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid URL {url:?}: {error}")]
    InvalidUrl { url: String, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Weatherdash Configuration
#
# Environment variables override these settings:
# - WEATHERDASH_API_URL
# - WEATHERDASH_PAGE_ORIGIN
# - WEATHERDASH_BACKEND_MODE
# - WEATHERDASH_LOG_LEVEL
# - WEATHERDASH_LOG_FORMAT

[backend]
# Explicit backend base URL (takes precedence over everything below)
# url = "http://weatherpi.local:8000"

# Address the dashboard is reached through. Without it the local
# development endpoint (http://localhost:8000) is used.
# page_origin = "http://weatherpi.local"

# direct: http://<page host>:<port>
# reverse_proxy: <page origin><proxy_path>
mode = "direct"
port = 8000
proxy_path = "/api"

# Request timeout in seconds
request_timeout_secs = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
