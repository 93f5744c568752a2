// ── Core error types ──
//
// User-facing errors from shopdash-core. Consumers never match on raw
// HTTP plumbing: the `From<shopdash_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so fetch state can carry the last failure alongside its data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Credential store error: {message}")]
    CredentialStore { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Short text for an alert banner: the server's own message when
    /// there is one, otherwise the full error description.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Api { message, .. }
            | Self::AuthenticationFailed { message }
            | Self::ValidationFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopdash_api::Error> for CoreError {
    fn from(err: shopdash_api::Error) -> Self {
        use shopdash_api::Error as ApiError;

        match err {
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
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
            ApiError::MissingCredential => CoreError::AuthenticationFailed {
                message: "no credential available -- sign in first".into(),
            },
            ApiError::Status {
                status: 401 | 403,
                message,
                ..
            } => CoreError::AuthenticationFailed { message },
            ApiError::Status {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            ApiError::Status {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
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

    fn status(code: u16, message: &str) -> shopdash_api::Error {
        shopdash_api::Error::Status {
            status: code,
            message: message.into(),
            body: String::new(),
        }
    }

    #[test]
    fn status_codes_map_to_domain_variants() {
        assert!(CoreError::from(status(401, "Unauthorized")).is_auth());
        assert!(CoreError::from(status(403, "Forbidden")).is_auth());
        assert!(CoreError::from(status(404, "gone")).is_not_found());
        assert_eq!(
            CoreError::from(status(400, "price must be positive")),
            CoreError::Api {
                message: "price must be positive".into(),
                status: Some(400),
            }
        );
    }

    #[test]
    fn missing_credential_is_auth_failure() {
        assert!(CoreError::from(shopdash_api::Error::MissingCredential).is_auth());
    }

    #[test]
    fn alert_message_uses_server_text() {
        let err = CoreError::from(status(500, "Internal Server Error"));
        assert_eq!(err.alert_message(), "Internal Server Error");
        assert_eq!(CoreError::Timeout.alert_message(), "Request timed out");
    }
}
