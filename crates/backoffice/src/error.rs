//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use backoffice_config::ConfigError;
use backoffice_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(backoffice::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(backoffice::auth_failed),
        help("Log in again with: backoffice login --profile {profile}")
    )]
    AuthFailed { message: String, profile: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(backoffice::no_token),
        help(
            "Log in with: backoffice login\n\
             Or set BACKOFFICE_TOKEN / run: backoffice config set-token"
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(backoffice::not_found),
        help("Run: backoffice {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .code.map(|c| format!(" ({c})")).unwrap_or_default())]
    #[diagnostic(code(backoffice::api_error))]
    ApiError { code: Option<i64>, message: String },

    #[error("Operation '{operation}' is not supported for {resource}")]
    #[diagnostic(code(backoffice::unsupported))]
    Unsupported { operation: String, resource: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(backoffice::validation))]
    Validation { field: String, reason: String },

    #[error("Form is invalid")]
    #[diagnostic(
        code(backoffice::invalid_form),
        help("{details}\nSet fields with --set KEY=VALUE or --from-file.")
    )]
    InvalidForm { details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(backoffice::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: backoffice config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(backoffice::no_config),
        help(
            "Create a profile with: backoffice config init\n\
             Or pass --base-url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(backoffice::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(backoffice::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(backoffice::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(backoffice::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::InvalidForm { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Config(err) => config_exit_code(err),
            _ => exit_code::GENERAL,
        }
    }

    /// Name the profile in authentication help text.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }
}

fn config_exit_code(err: &ConfigError) -> i32 {
    match err {
        ConfigError::NoToken { .. } => exit_code::AUTH,
        ConfigError::Validation { .. } | ConfigError::ProfileNotFound { .. } => exit_code::USAGE,
        _ => exit_code::GENERAL,
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::Timeout { .. } => CliError::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{} list", entity_type.to_lowercase()),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Unsupported {
                operation,
                resource,
            } => CliError::Unsupported {
                operation,
                resource,
            },

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::OperationFailed { message } => CliError::ApiError {
                code: None,
                message,
            },

            CoreError::Api { message, code, .. } => CliError::ApiError { code, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<backoffice_api::Error> for CliError {
    fn from(err: backoffice_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
