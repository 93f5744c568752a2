//! Shared configuration for the shopdash CLI and embedders.
//!
//! TOML profiles merged with `SHOPDASH_` environment variables, the
//! credential backend each profile persists its token in, and
//! translation to `shopdash_core::DashboardConfig`.

mod credentials;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopdash_core::config::{
    DEFAULT_ALERT_AUTO_CLOSE, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_PAGER_NEIGHBOURS,
};
use shopdash_core::{DashboardConfig, TlsVerification};

pub use credentials::{
    CredentialBackend, FileCredentialStore, KeyringCredentialStore, credential_store_for,
};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "shopdash";
const APPLICATION: &str = "shopdash";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile by name, falling back to `default_profile`.
    ///
    /// An unconfigured `default` profile resolves to the built-in
    /// defaults so a fresh install works without a config file.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned();

        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if name == "default" => Ok((name, Profile::default())),
            None => Err(ConfigError::UnknownProfile { name }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Seconds before a success alert closes itself.
    #[serde(default = "default_alert_auto_close")]
    pub alert_auto_close: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            page_size: default_page_size(),
            alert_auto_close: default_alert_auto_close(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_alert_auto_close() -> u64 {
    DEFAULT_ALERT_AUTO_CLOSE.as_secs()
}

/// A named API profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://api.escuelajs.co/api/v1/").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_products_path")]
    pub products_path: String,

    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    /// Override the page size.
    pub page_size: Option<u32>,

    /// Where the session token is kept between runs.
    #[serde(default)]
    pub credential_backend: CredentialBackend,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            products_path: default_products_path(),
            auth_path: default_auth_path(),
            page_size: None,
            credential_backend: CredentialBackend::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_products_path() -> String {
    "products".into()
}
fn default_auth_path() -> String {
    "auth".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push(APPLICATION);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for file-backed credentials.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` merged with `SHOPDASH_` variables.
///
/// Nested keys use a double underscore: `SHOPDASH_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHOPDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(DashboardConfig {
        api_url,
        products_path: profile.products_path.clone(),
        auth_path: profile.auth_path.clone(),
        page_size,
        pager_neighbours: DEFAULT_PAGER_NEIGHBOURS,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        alert_auto_close: Duration::from_secs(defaults.alert_auto_close),
    })
}
