use thiserror::Error;

/// Top-level error type for the `shopdash-api` crate.
///
/// Covers every failure mode of the resource client: transport, HTTP
/// status, and malformed bodies. Status codes are carried raw --
/// `shopdash-core` decides what they mean for the domain.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The endpoint requires a bearer credential and the request context has none.
    #[error("No credential available for an authenticated endpoint")]
    MissingCredential,

    // ── Status ──────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the JSON error payload when
    /// present, otherwise from the canonical status text.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the credential is missing, expired, or rejected.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::MissingCredential) || matches!(self.status(), Some(401 | 403))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never produced a response
    /// (connection refused, timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
