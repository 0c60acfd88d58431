//! Config command handlers (no server connection required).

use domus_config::{self as cfgfile, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let mut cfg = cfgfile::load_config_or_default();
            // Never echo stored secrets.
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("(redacted)".into());
                }
            }
            let rendered = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.default_profile.clone().unwrap_or_default(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&cfgfile::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            server,
            username,
            name,
        } => {
            let mut cfg = cfgfile::load_config_or_default();
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    server,
                    username,
                    password: None,
                    password_env: Some("DOMUS_PASSWORD".into()),
                    timeout: None,
                    poll_interval_ms: None,
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }
            cfgfile::save_config(&cfg)?;
            if !global.quiet {
                eprintln!(
                    "Profile '{name}' written to {}",
                    cfgfile::config_path().display()
                );
            }
            Ok(())
        }

        ConfigCommand::SetDefault { profile } => {
            let mut cfg = cfgfile::load_config_or_default();
            if !cfg.profiles.contains_key(&profile) {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: format!("no profile named '{profile}'"),
                });
            }
            cfg.default_profile = Some(profile.clone());
            cfgfile::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{profile}'");
            }
            Ok(())
        }
    }
}
