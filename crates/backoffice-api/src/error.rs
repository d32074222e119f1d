use thiserror::Error;

/// Top-level error type for the `backoffice-api` crate.
///
/// Covers every failure mode of the admin REST surface: authentication,
/// transport, the `{code, message, data}` envelope, and payload decoding.
/// `backoffice-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the bearer token was rejected (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API envelope ────────────────────────────────────────────────
    /// Non-success response from the backend.
    ///
    /// `message` follows the backend's envelope first, then the transport
    /// message, then the literal `"Error"`.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    // ── Request validation ──────────────────────────────────────────
    /// A query parameter failed client-side validation before sending.
    #[error("Invalid query parameter {field}: {reason}")]
    InvalidQuery { field: &'static str, reason: String },

    /// The resource does not expose this operation.
    #[error("{resource} does not support {operation}")]
    UnsupportedOperation {
        resource: &'static str,
        operation: &'static str,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and logging in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Message suitable for showing to an operator.
    ///
    /// For envelope errors this is the backend's own message without the
    /// HTTP status decoration.
    pub fn display_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Authentication { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_not_missing_records() {
        let err = Error::Api {
            status: 503,
            code: None,
            message: "busy".into(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn display_message_strips_status() {
        let err = Error::Api {
            status: 400,
            code: Some(4000),
            message: "用户名已存在".into(),
        };
        assert_eq!(err.display_message(), "用户名已存在");
    }

    #[test]
    fn rejected_token_counts_as_expired_auth() {
        let err = Error::Authentication {
            message: "token expired".into(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.display_message(), "token expired");
    }
}
