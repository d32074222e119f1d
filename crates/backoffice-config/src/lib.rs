//! Shared configuration for backoffice tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `backoffice_api::TransportConfig` plus the table and
//! navigation settings of `backoffice_core`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use backoffice_api::{TlsMode, TransportConfig};
use backoffice_core::{GuardConfig, HistoryMode, Pagination, TableConfig};

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "backoffice";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

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
    /// Name of the profile to use: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Router history mode for front ends that link into the admin UI.
    #[serde(default)]
    pub history: HistoryMode,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_search_inline_count")]
    pub search_inline_count: usize,

    /// Page-loading flag delay for hosts that run a `NavigationGuard`.
    /// The CLI has no navigation and ignores it.
    #[serde(default = "default_loading_delay_ms")]
    pub loading_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            history: HistoryMode::default(),
            page_size: default_page_size(),
            search_inline_count: default_search_inline_count(),
            loading_delay_ms: default_loading_delay_ms(),
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
    10
}
fn default_search_inline_count() -> usize {
    3
}
fn default_loading_delay_ms() -> u64 {
    500
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "https://admin.example.com").
    pub base_url: String,

    /// Username for `login`.
    pub username: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,

    pub insecure: Option<bool>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("rs", "backoffice", "backoffice").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("backoffice");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, then `BACKOFFICE_*` environment variables.
///
/// Nested keys use a double underscore, e.g.
/// `BACKOFFICE_DEFAULTS__PAGE_SIZE=20`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BACKOFFICE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
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

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Resolve a bearer token from the credential chain (no CLI flag step):
/// `token_env`, then the system keyring, then plaintext `token`.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    debug!(profile = profile_name, "token stored in keyring");
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate a profile's base URL.
pub fn profile_base_url(profile: &Profile) -> Result<url::Url, ConfigError> {
    profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })
}

/// Build a `TransportConfig` from a profile, falling back to `defaults`.
pub fn profile_to_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig::default()
        .with_tls(tls)
        .with_timeout(Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)))
}

pub fn table_config(defaults: &Defaults) -> TableConfig {
    TableConfig {
        pagination: Pagination {
            page_size: defaults.page_size,
            ..Pagination::default()
        },
        search_inline_count: defaults.search_inline_count,
    }
}

/// Guard settings for hosts with client-side navigation.
pub fn guard_config(defaults: &Defaults) -> GuardConfig {
    GuardConfig {
        loading_delay: Duration::from_millis(defaults.loading_delay_ms),
    }
}
