//! Session setup: config profile + global flags → authenticated client.
//!
//! Core never sees profiles; it receives a built `ApiClient` and
//! `TableConfig`.

use std::sync::Arc;

use secrecy::SecretString;

use backoffice_api::ApiClient;
use backoffice_config::{self as config, Config, ConfigError, Defaults, Profile};
use backoffice_core::TableConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a backend-bound command needs.
pub struct Session {
    pub client: Arc<ApiClient>,
    pub profile_name: String,
    pub base_url: String,
    pub defaults: Defaults,
}

impl Session {
    /// Table settings, with the page size overridden when given.
    pub fn table_config(&self, page_size: Option<u32>) -> TableConfig {
        let mut table = config::table_config(&self.defaults);
        if let Some(size) = page_size {
            table.pagination.page_size = size;
        }
        table
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.profile_name(global.profile.as_deref()).to_owned()
}

/// Build a session. With `require_token`, a missing token is an error;
/// otherwise the client starts unauthenticated (e.g. for `login`).
pub fn connect(global: &GlobalOpts, require_token: bool) -> Result<Session, CliError> {
    let cfg = config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.base_url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config::config_path().display().to_string(),
            });
        }
    };
    apply_overrides(&mut profile, global);

    let base_url = config::profile_base_url(&profile)?;
    let transport = config::profile_to_transport(&profile, &cfg.defaults);
    let client = ApiClient::new(base_url.as_str(), &transport)?;

    if let Some(token) = resolve_token(global, &profile, &profile_name, require_token)? {
        client.set_token(token);
    }
    tracing::debug!(profile = %profile_name, url = %base_url, "session ready");

    Ok(Session {
        client: Arc::new(client),
        profile_name,
        base_url: profile.base_url,
        defaults: cfg.defaults,
    })
}

/// Flag > env > profile, for everything a flag can override.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// `--token` first, then the profile's credential chain.
fn resolve_token(
    global: &GlobalOpts,
    profile: &Profile,
    profile_name: &str,
    require_token: bool,
) -> Result<Option<SecretString>, CliError> {
    if let Some(ref token) = global.token {
        return Ok(Some(SecretString::from(token.clone())));
    }
    match config::resolve_token(profile, profile_name) {
        Ok(token) => Ok(Some(token)),
        Err(ConfigError::NoToken { .. }) if !require_token => Ok(None),
        Err(ConfigError::NoToken { profile }) => Err(CliError::NoToken { profile }),
        Err(other) => Err(other.into()),
    }
}
