use thiserror::Error;

/// Top-level error type for the `domus-api` crate.
///
/// Two failure channels matter to consumers: transport-level errors
/// (connection refused, bad JSON, unexpected status) and command errors
/// reported by the server through the `{error: "..."}` body. `domus-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session cookie has expired.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status without a parseable `error` body
    /// (e.g. the plain-text 403 from admin routes).
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Application ─────────────────────────────────────────────────
    /// The server rejected a command via the `{error: "..."}` envelope.
    /// May arrive with either a 2xx or a 4xx status.
    #[error("{message}")]
    Command { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the session is gone and
    /// re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient transport error worth
    /// retrying on the next poll tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The server's command-rejection message, if this is one.
    pub fn command_message(&self) -> Option<&str> {
        match self {
            Self::Command { message } => Some(message),
            _ => None,
        }
    }
}
