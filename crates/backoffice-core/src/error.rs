// ── Core error types ──
//
// Errors surfaced by the table, form and routing layers. Transport
// failures from `backoffice-api` are folded into domain variants by the
// `From` impl below, so hosts never match on HTTP details.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The backend did not answer within the transport timeout.
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} on {resource}")]
    Unsupported { operation: String, resource: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Envelope code reported by the backend, if any.
        code: Option<i64>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message an operator should see, without the variant prefix.
    pub fn display_message(&self) -> String {
        match self {
            Self::AuthenticationFailed { message }
            | Self::InvalidInput { message }
            | Self::OperationFailed { message }
            | Self::Api { message, .. }
            | Self::Config { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<backoffice_api::Error> for CoreError {
    fn from(err: backoffice_api::Error) -> Self {
        use backoffice_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "Record".into(),
                identifier: message,
            },
            ApiError::Api {
                status,
                code,
                message,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            ApiError::InvalidQuery { field, reason } => CoreError::InvalidInput {
                message: format!("{field}: {reason}"),
            },
            ApiError::UnsupportedOperation {
                resource,
                operation,
            } => CoreError::Unsupported {
                operation: operation.into(),
                resource: resource.into(),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_errors_keep_backend_message() {
        let err: CoreError = backoffice_api::Error::Api {
            status: 400,
            code: Some(4000),
            message: "用户名已存在".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { code: Some(4000), .. }));
        assert_eq!(err.display_message(), "用户名已存在");
    }

    #[test]
    fn missing_records_become_not_found() {
        let err: CoreError = backoffice_api::Error::Api {
            status: 404,
            code: None,
            message: "Not Found".into(),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn timeout_message_names_the_request_not_a_duration() {
        let err = CoreError::Timeout {
            url: "http://localhost/api/v1/posts?page=1".into(),
        };
        assert_eq!(
            err.display_message(),
            "Request timed out: http://localhost/api/v1/posts?page=1"
        );
    }

    #[test]
    fn invalid_query_is_invalid_input() {
        let err: CoreError = backoffice_api::Error::InvalidQuery {
            field: "page",
            reason: "page numbers start at 1".into(),
        }
        .into();
        assert_eq!(err.display_message(), "page: page numbers start at 1");
    }
}
