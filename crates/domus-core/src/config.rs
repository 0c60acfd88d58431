// ── Client configuration ──

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Everything the controller needs to reach and poll a server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the dashboard server.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Background poll cadence. Zero disables polling entirely.
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default poll cadence, matching the dashboard's 2-second refresh.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Disable the background poll loop (used for one-shot CLI calls).
    pub fn without_polling(mut self) -> Self {
        self.poll_interval = Duration::ZERO;
        self
    }

    pub fn polling_enabled(&self) -> bool {
        !self.poll_interval.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClientConfig {
        ClientConfig::new(
            Url::parse("http://127.0.0.1:8080").expect("valid url"),
            "alice",
            SecretString::from("secret"),
        )
    }

    #[test]
    fn defaults_match_dashboard_cadence() {
        let cfg = sample();
        assert_eq!(cfg.poll_interval, Duration::from_millis(2000));
        assert!(cfg.polling_enabled());
    }

    #[test]
    fn without_polling_zeroes_interval() {
        let cfg = sample().without_polling();
        assert!(!cfg.polling_enabled());
    }
}
