// ── Device setup ──
//
// Validation of user-supplied connection settings and the setup/unload
// lifecycle of one device registration.

use bopi_api::{BopiClient, ConfigField};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CoordinatorConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;

/// Result of successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Display title, also used as the unique id of the registration.
    pub title: String,
}

/// Why a set of connection settings was rejected.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid host")]
    InvalidHost(#[source] bopi_api::Error),

    #[error("Invalid port")]
    InvalidPort(#[source] bopi_api::Error),

    #[error("Invalid timeout")]
    InvalidTimeout(#[source] bopi_api::Error),

    #[error("Invalid configuration")]
    InvalidConfig(#[source] bopi_api::Error),

    #[error("Cannot connect to the controller")]
    CannotConnect(#[source] bopi_api::Error),

    #[error("Timed out connecting to the controller")]
    ConnectionTimeout(#[source] bopi_api::Error),

    #[error("Unexpected error")]
    Unknown(#[source] bopi_api::Error),
}

impl SetupError {
    /// Translation key of the error, as shown next to the form.
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::InvalidHost(_) => "invalid_host",
            Self::InvalidPort(_) => "invalid_port",
            Self::InvalidTimeout(_) => "invalid_timeout",
            Self::InvalidConfig(_) => "invalid_config",
            Self::CannotConnect(_) => "cannot_connect",
            Self::ConnectionTimeout(_) => "connection_timeout",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Form field the error belongs to; `base` for form-wide errors.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidHost(_) => "host",
            Self::InvalidPort(_) => "port",
            Self::InvalidTimeout(_) => "timeout",
            _ => "base",
        }
    }
}

fn config_error(err: bopi_api::Error) -> SetupError {
    match err.config_field() {
        Some(ConfigField::Host) => SetupError::InvalidHost(err),
        Some(ConfigField::Port) => SetupError::InvalidPort(err),
        Some(ConfigField::Timeout) => SetupError::InvalidTimeout(err),
        None => SetupError::InvalidConfig(err),
    }
}

/// Check that `config` describes a reachable controller.
///
/// Builds a client (rejecting bad host/port/timeout values) and performs
/// one fetch.
pub async fn validate_input(config: &CoordinatorConfig) -> Result<EntryInfo, SetupError> {
    let client = BopiClient::new(&config.host, config.port, config.timeout_secs)
        .map_err(config_error)?;

    client.get_sensors_state().await.map_err(|err| match err {
        bopi_api::Error::Timeout { .. } => SetupError::ConnectionTimeout(err),
        bopi_api::Error::Connection { .. } => SetupError::CannotConnect(err),
        bopi_api::Error::Config { .. } => config_error(err),
        bopi_api::Error::Validation { .. } => SetupError::Unknown(err),
    })?;

    debug!(host = %config.host, "connection settings validated");
    Ok(EntryInfo {
        title: config.title(),
    })
}

/// Set up one device registration: build the coordinator, perform the
/// first refresh, and start scheduled polling.
pub async fn setup_entry(config: &CoordinatorConfig) -> Result<Coordinator, CoreError> {
    let coordinator = Coordinator::from_config(config)?;
    coordinator.first_refresh().await?;
    coordinator.start().await?;
    info!(title = %config.title(), "device set up");
    Ok(coordinator)
}

/// Tear a device registration down.
pub async fn unload_entry(coordinator: &Coordinator) {
    coordinator.shutdown().await;
    info!(host = %coordinator.host(), "device unloaded");
}
