//! Configuration loading for NewsLens.
//! Reads newslens.toml from the current directory or the path in the
//! NEWSLENS_CONFIG env var. A `.yaml`/`.yml` path is parsed as YAML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const CONFIG_ENV: &str = "NEWSLENS_CONFIG";
pub const BACKEND_URL_ENV: &str = "NEWSLENS_BACKEND_URL";
pub const BIND_ENV: &str = "NEWSLENS_BIND";
pub const DEFAULT_CONFIG_FILE: &str = "newslens.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_backend_url()     -> String { "http://127.0.0.1:8000".to_string() }
fn default_request_timeout() -> u64    { 30 }
fn default_connect_timeout() -> u64    { 10 }

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
}

/// Event-channel reconnect backoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// `None` or `0` retries for as long as the session is active.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u32>,
}

fn default_initial_delay() -> u64         { 3_000 }
fn default_multiplier()    -> f64         { 2.0 }
fn default_max_delay()     -> u64         { 30_000 }
fn default_max_attempts()  -> Option<u32> { Some(10) }

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconnectConfig {
    pub fn initial_delay(&self) -> Duration { Duration::from_millis(self.initial_delay_ms) }
    pub fn max_delay(&self) -> Duration { Duration::from_millis(self.max_delay_ms) }

    /// Attempt cap with `0` normalised to unbounded.
    pub fn attempt_limit(&self) -> Option<u32> {
        self.max_attempts.filter(|n| *n > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_alert_dismiss")]
    pub alert_dismiss_secs: u64,
    #[serde(default = "default_progress_min_display")]
    pub progress_min_display_ms: u64,
    #[serde(default = "default_progress_step")]
    pub progress_step_ms: u64,
    /// Capacity of the browser fan-out channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_alert_dismiss()        -> u64   { 5 }
fn default_progress_min_display() -> u64   { 1_500 }
fn default_progress_step()        -> u64   { 800 }
fn default_event_buffer()         -> usize { 256 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_dismiss_secs: default_alert_dismiss(),
            progress_min_display_ms: default_progress_min_display(),
            progress_step_ms: default_progress_step(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl UiConfig {
    pub fn alert_dismiss(&self) -> Duration { Duration::from_secs(self.alert_dismiss_secs) }
    pub fn progress_min_display(&self) -> Duration {
        Duration::from_millis(self.progress_min_display_ms)
    }
    pub fn progress_step(&self) -> Duration { Duration::from_millis(self.progress_step_ms) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:3001".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}


impl Config {
    /// Load configuration.
    /// Checks NEWSLENS_CONFIG first, then newslens.toml in the current
    /// directory. A missing default file yields defaults; a missing file
    /// named explicitly by NEWSLENS_CONFIG is an error. Env overrides are
    /// applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => {
                info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Config::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.bind = bind.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".into()));
        }
        if self.reconnect.multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "reconnect.multiplier must be >= 1.0, got {}",
                self.reconnect.multiplier
            )));
        }
        if self.reconnect.max_delay_ms < self.reconnect.initial_delay_ms {
            return Err(ConfigError::Invalid(
                "reconnect.max_delay_ms must be >= reconnect.initial_delay_ms".into(),
            ));
        }
        if self.ui.event_buffer == 0 {
            return Err(ConfigError::Invalid("ui.event_buffer must be positive".into()));
        }
        Ok(())
    }
}
