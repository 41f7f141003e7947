//! Config subcommand handlers.

use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;

use bopi_core::{MIN_SCAN_INTERVAL, validate_input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile, profile_to_coordinator_config};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct ProfileEntry {
    name: String,
    default: bool,
    host: String,
    port: u32,
    timeout_secs: u64,
    scan_interval_secs: u64,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: u32,
    #[tabled(rename = "Interval")]
    interval: String,
}

impl From<&ProfileEntry> for ProfileRow {
    fn from(p: &ProfileEntry) -> Self {
        Self {
            marker: if p.default { "*" } else { "" },
            name: p.name.clone(),
            host: p.host.clone(),
            port: p.port,
            interval: format!("{}s", p.scan_interval_secs),
        }
    }
}

fn check_interval(seconds: u64) -> Result<u64, CliError> {
    if Duration::from_secs(seconds) < MIN_SCAN_INTERVAL {
        return Err(CliError::Validation {
            field: "scan_interval".into(),
            reason: format!(
                "must be at least {}s, got {seconds}s",
                MIN_SCAN_INTERVAL.as_secs()
            ),
        });
    }
    Ok(seconds)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            controller,
            controller_port,
            scan_interval,
            no_validate,
        } => {
            let mut cfg = config::load_config(global)?;

            let profile = Profile {
                host: controller.trim().to_owned(),
                port: controller_port,
                timeout: global.timeout,
                scan_interval: scan_interval.map(check_interval).transpose()?,
            };

            if !no_validate {
                let info = validate_input(&profile_to_coordinator_config(&profile, &cfg.defaults))
                    .await?;
                if !global.quiet {
                    eprintln!("Connected to {}", info.title);
                }
            }

            cfg.profiles.insert(name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg, global)?;

            if !global.quiet {
                eprintln!(
                    "Profile '{name}' saved to {}",
                    config::config_path(global).display()
                );
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config(global)?;
            let out = output::render_single(global.output, &cfg, |c| {
                toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable config: {e}"))
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config(global)?;
            let default = config::active_profile_name(global, &cfg);

            let mut entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| {
                    let resolved = profile_to_coordinator_config(profile, &cfg.defaults);
                    ProfileEntry {
                        name: name.clone(),
                        default: *name == default,
                        host: resolved.host,
                        port: resolved.port,
                        timeout_secs: resolved.timeout_secs,
                        scan_interval_secs: resolved.scan_interval.as_secs(),
                    }
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let out =
                output::render_list(global.output, &entries, |p| ProfileRow::from(p), |p| {
                    p.name.clone()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config(global)?;
            cfg.profile(Some(&name))?;
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg, global)?;

            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetInterval { seconds } => {
            let seconds = check_interval(seconds)?;
            let mut cfg = config::load_config(global)?;
            let name = config::active_profile_name(global, &cfg);

            let (name, _) = cfg.profile(Some(&name))?;
            if let Some(profile) = cfg.profiles.get_mut(&name) {
                profile.scan_interval = Some(seconds);
            }
            config::save_config(&cfg, global)?;

            if !global.quiet {
                eprintln!("Profile '{name}' now polls every {seconds}s");
            }
            Ok(())
        }
    }
}
