//! Shared configuration for the domus CLI and TUI.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `domus_core::ClientConfig`. Both binaries depend on
//! this crate — the CLI adds flag-aware overrides on top.

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

use domus_core::ClientConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' (and no default_profile set)")]
    NoProfile { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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
    /// Look up a profile by explicit name, falling back to
    /// `default_profile`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or_else(|| ConfigError::NoProfile {
                profile: "<unset>".into(),
            })?;
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NoProfile {
                profile: name.into(),
            })?;
        Ok((name, profile))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Per-request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh cadence, milliseconds. Matches the 2-second
    /// dashboard refresh by default.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    2000
}

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "http://192.168.1.50:8080").
    pub server: String,

    /// Login username.
    pub username: String,

    /// Password (plaintext — prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout, seconds.
    pub timeout: Option<u64>,

    /// Override poll cadence, milliseconds.
    pub poll_interval_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "domus", "domus").map_or_else(
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
    p.push("domus");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from a specific file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DOMUS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
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

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve a password from the credential chain (no CLI flag step):
/// profile's `password_env` var, then `DOMUS_PASSWORD`, then plaintext
/// in the profile.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var("DOMUS_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `ClientConfig` from a profile — no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let password = resolve_password(profile, profile_name)?;

    let mut config = ClientConfig::new(url, profile.username.clone(), password);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval = Duration::from_millis(
        profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.poll_interval_ms, 2000);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_parse_and_resolve() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            r#"
            default_profile = "casa"

            [defaults]
            timeout = 5

            [profiles.casa]
            server = "http://192.168.1.50:8080"
            username = "alice"
            password = "hunter2"
            poll_interval_ms = 500
            "#,
        );
        let cfg = load_config_from(&path).expect("load");

        let (name, profile) = cfg.profile(None).expect("default profile");
        assert_eq!(name, "casa");

        let client = profile_to_client_config(profile, name, &cfg.defaults).expect("client config");
        assert_eq!(client.url.as_str(), "http://192.168.1.50:8080/");
        assert_eq!(client.username, "alice");
        assert_eq!(client.password.expose_secret(), "hunter2");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::NoProfile { .. })
        ));
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [profiles.casa]
                server = "http://hub:8080"
                username = "alice"
                password = "plaintext"
                password_env = "DOMUS_TEST_PW_PRECEDENCE"
                "#,
            )?;
            jail.set_env("DOMUS_TEST_PW_PRECEDENCE", "from-env");

            let cfg = load_config_from(Path::new("config.toml")).expect("load");
            let (name, profile) = cfg.profile(Some("casa")).expect("profile");
            let pw = resolve_password(profile, name).expect("password");
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_password_is_an_error() {
        let profile = Profile {
            server: "http://hub:8080".into(),
            username: "alice".into(),
            password: None,
            password_env: None,
            timeout: None,
            poll_interval_ms: None,
        };
        assert!(matches!(
            resolve_password(&profile, "casa"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn round_trips_through_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saved.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "casa".into(),
            Profile {
                server: "http://hub:8080".into(),
                username: "alice".into(),
                password: None,
                password_env: Some("DOMUS_CASA_PASSWORD".into()),
                timeout: None,
                poll_interval_ms: None,
            },
        );
        save_config_to(&cfg, &path).expect("save");

        let loaded = load_config_from(&path).expect("reload");
        assert_eq!(loaded.profiles["casa"].username, "alice");
        assert_eq!(
            loaded.profiles["casa"].password_env.as_deref(),
            Some("DOMUS_CASA_PASSWORD")
        );
    }
}
