//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use shopdash_config::ConfigError;
use shopdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API at {url}")]
    #[diagnostic(
        code(shopdash::connection_failed),
        help(
            "Check the API URL and your network connection.\n\
             Override it with --api-url or set api_url in your profile.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(shopdash::timeout),
        help("Increase the timeout with --timeout or check the API's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(shopdash::auth_failed),
        help("Sign in again with: shopdash login")
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(code(shopdash::not_signed_in), help("Sign in with: shopdash login"))]
    NotSignedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shopdash::not_found),
        help("Run: shopdash {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", status_suffix(.status))]
    #[diagnostic(code(shopdash::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("Credential storage failed: {message}")]
    #[diagnostic(
        code(shopdash::credential_store),
        help("Set credential_backend = \"file\" in your profile if no keyring is available.")
    )]
    CredentialStore { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopdash::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopdash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopdash config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(shopdash::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shopdash::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(shopdash::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotSignedIn => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: "products list".into(),
                resource_type: entity_type,
                identifier,
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::CredentialStore { message } => CliError::CredentialStore { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => {
                let cfg = shopdash_config::load_config_or_default();
                let mut names: Vec<_> = cfg.profiles.into_keys().collect();
                names.sort();
                CliError::ProfileNotFound {
                    name,
                    available: if names.is_empty() {
                        "(none)".into()
                    } else {
                        names.join(", ")
                    },
                }
            }
            other => CliError::Config(other),
        }
    }
}
