//! Profile resolution with CLI flag overrides.
//!
//! Layers: config file profile → DOMUS_* env vars → explicit flags.

use std::time::Duration;

use secrecy::SecretString;

use domus_config as cfgfile;
use domus_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ClientConfig` from the config file, profile, and CLI
/// overrides. One-shot CLI calls never poll.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = cfgfile::load_config_or_default();

    // A profile (named or default) provides the base layer, if one exists.
    let base = match cfg.profile(global.profile.as_deref()) {
        Ok((name, profile)) => {
            Some(cfgfile::profile_to_client_config(profile, name, &cfg.defaults)?)
        }
        // Missing default profile is fine when flags fill the gap; a
        // profile the user explicitly asked for must exist.
        Err(err) if global.profile.is_some() => return Err(err.into()),
        Err(_) => None,
    };

    let mut config = match (base, &global.server) {
        (Some(mut config), server) => {
            if let Some(server) = server {
                config.url = parse_server(server)?;
            }
            config
        }
        (None, Some(server)) => {
            let username = global
                .username
                .clone()
                .or_else(|| std::env::var("DOMUS_USERNAME").ok())
                .ok_or_else(|| CliError::Validation {
                    field: "username".into(),
                    reason: "required when no profile is configured".into(),
                })?;
            let password = flag_password(global)?.ok_or_else(|| CliError::Validation {
                field: "password".into(),
                reason: "set DOMUS_PASSWORD or --password-env".into(),
            })?;
            ClientConfig::new(parse_server(server)?, username, password)
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: cfgfile::config_path().display().to_string(),
            });
        }
    };

    if let Some(username) = &global.username {
        config.username = username.clone();
    }
    if let Some(password) = flag_password(global)? {
        config.password = password;
    }
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    Ok(config.without_polling())
}

fn parse_server(server: &str) -> Result<url::Url, CliError> {
    server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })
}

/// Password taken from `--password-env` or `DOMUS_PASSWORD`, when set.
fn flag_password(global: &GlobalOpts) -> Result<Option<SecretString>, CliError> {
    if let Some(env_name) = &global.password_env {
        let value = std::env::var(env_name).map_err(|_| CliError::Validation {
            field: "password-env".into(),
            reason: format!("environment variable {env_name} is not set"),
        })?;
        return Ok(Some(SecretString::from(value)));
    }
    Ok(std::env::var("DOMUS_PASSWORD").ok().map(SecretString::from))
}
