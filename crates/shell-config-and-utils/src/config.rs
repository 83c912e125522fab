//! Configuration management for the shell.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default backend API base URL (can be overridden at compile time via SOHWAGI_API_URL).
pub const DEFAULT_API_URL: &str = match option_env!("SOHWAGI_API_URL") {
    Some(url) => url,
    None => "https://api.sohwagi.app",
};

/// Default web app URL loaded into the embedded view
/// (can be overridden at compile time via SOHWAGI_WEB_APP_URL).
pub const DEFAULT_WEB_APP_URL: &str = match option_env!("SOHWAGI_WEB_APP_URL") {
    Some(url) => url,
    None => "https://sohwagi.app",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How long the splash screen stays up before the auto-login check.
pub const DEFAULT_SPLASH_DURATION_MS: u64 = 1_000;

/// Main shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Backend API base URL, without trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Remote web app URL shown once a session exists.
    #[serde(default = "default_web_app_url")]
    pub web_app_url: String,
    /// Splash interval in milliseconds.
    #[serde(default = "default_splash_duration_ms")]
    pub splash_duration_ms: u64,
    /// Optional per-request HTTP timeout. `None` keeps the client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_web_app_url() -> String {
    DEFAULT_WEB_APP_URL.to_string()
}

fn default_splash_duration_ms() -> u64 {
    DEFAULT_SPLASH_DURATION_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_url: default_api_url(),
            web_app_url: default_web_app_url(),
            splash_duration_ms: DEFAULT_SPLASH_DURATION_MS,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `SOHWAGI_*` overrides from the given lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = non_empty("SOHWAGI_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(url) = non_empty("SOHWAGI_API_URL") {
            self.api_url = url;
        }
        if let Some(url) = non_empty("SOHWAGI_WEB_APP_URL") {
            self.web_app_url = url;
        }
    }

    /// Check that both URLs parse and use http(s).
    pub fn validate(&self) -> CoreResult<()> {
        for raw in [&self.api_url, &self.web_app_url] {
            let url = Url::parse(raw)?;
            if !matches!(url.scheme(), "https" | "http") {
                return Err(CoreError::Config(format!(
                    "Unsupported URL scheme in {}",
                    raw
                )));
            }
        }
        Ok(())
    }

    /// Backend base URL with any trailing slash removed.
    pub fn api_base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Get the web app URL as a parsed URL.
    pub fn web_app_url(&self) -> CoreResult<Url> {
        Url::parse(&self.web_app_url).map_err(CoreError::from)
    }

    /// Splash interval as a `Duration`.
    pub fn splash_duration(&self) -> Duration {
        Duration::from_millis(self.splash_duration_ms)
    }

    /// Per-request timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
