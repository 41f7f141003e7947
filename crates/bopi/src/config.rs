//! CLI configuration -- thin wrapper around `bopi_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --host, --port, --timeout).

use std::path::PathBuf;

use bopi_core::CoordinatorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bopi_config::{Config, Profile, profile_to_coordinator_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `BOPI_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(bopi_config::config_path)
}

pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(bopi_config::load_config_from(&config_path(global))?)
}

pub fn save_config(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    bopi_config::save_config_to(cfg, &config_path(global))?;
    Ok(())
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `CoordinatorConfig` from the config file, profile, and flags.
///
/// Flag overrides take priority over profile values. Without a matching
/// profile, `--host` alone is enough.
pub fn resolve_coordinator_config(global: &GlobalOpts) -> Result<CoordinatorConfig, CliError> {
    let cfg = load_config(global)?;
    let profile_name = active_profile_name(global, &cfg);

    let mut resolved = match cfg.profile(Some(&profile_name)) {
        Ok((_, profile)) => profile_to_coordinator_config(profile, &cfg.defaults),
        // An explicitly requested profile must exist.
        Err(err) if global.profile.is_some() => return Err(err.into()),
        Err(_) => {
            let host = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path(global).display().to_string(),
            })?;
            profile_to_coordinator_config(&Profile::new(host), &cfg.defaults)
        }
    };

    if let Some(ref host) = global.host {
        resolved.host.clone_from(host);
    }
    if let Some(port) = global.port {
        resolved.port = port;
    }
    if let Some(timeout) = global.timeout {
        resolved.timeout_secs = timeout;
    }

    tracing::debug!(profile = %profile_name, host = %resolved.host, "resolved controller config");
    Ok(resolved)
}
