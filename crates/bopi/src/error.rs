//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `SetupError` and `ConfigError` into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bopi_config::ConfigError;
use bopi_core::{CoreError, FailureKind, SetupError, UpdateFailed};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not reach the controller: {reason}")]
    #[diagnostic(
        code(bopi::connection_failed),
        help(
            "Check that the controller is powered on and reachable.\n\
             Try: bopi validate --host <address>"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("{reason}")]
    #[diagnostic(
        code(bopi::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { reason: String },

    #[error("{reason}")]
    #[diagnostic(
        code(bopi::invalid_response),
        help("The controller answered with something other than a sensors state.")
    )]
    InvalidResponse { reason: String },

    #[error("Controller unavailable: {reason}")]
    #[diagnostic(code(bopi::unavailable))]
    Unavailable { reason: String },

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Setup check failed ({key}): {source}")]
    #[diagnostic(code(bopi::setup), help("Offending field: {field}"))]
    Setup {
        key: &'static str,
        field: &'static str,
        #[source]
        source: SetupError,
    },

    // ── Entities ─────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bopi::not_found),
        help("Run: bopi {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Operation '{operation}' is not supported on '{entity}'")]
    #[diagnostic(
        code(bopi::unsupported),
        help("The controller's local API is read-only; relays can only be observed.")
    )]
    Unsupported { operation: String, entity: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bopi::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bopi::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bopi config init --name {name} --controller <address>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(bopi::no_config),
        help(
            "Create a profile with: bopi config init --controller <address>\n\
             Or pass --host / set BOPI_HOST.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(bopi::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(bopi::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            Self::Setup { source, .. } => match source {
                SetupError::CannotConnect(_) => exit_code::CONNECTION,
                SetupError::ConnectionTimeout(_) => exit_code::TIMEOUT,
                SetupError::Unknown(_) => exit_code::GENERAL,
                _ => exit_code::USAGE,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<UpdateFailed> for CliError {
    fn from(err: UpdateFailed) -> Self {
        let reason = err.reason().to_owned();
        match err.kind() {
            FailureKind::Timeout => CliError::Timeout { reason },
            FailureKind::Connection => CliError::ConnectionFailed { reason },
            FailureKind::InvalidResponse => CliError::InvalidResponse { reason },
            FailureKind::Configuration => CliError::Validation {
                field: "config".into(),
                reason,
            },
            FailureKind::Unavailable => CliError::Unavailable { reason },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { field, reason } => CliError::Validation { field, reason },

            CoreError::NotReady { source } | CoreError::UpdateFailed(source) => source.into(),

            CoreError::ShutDown => CliError::Unavailable {
                reason: "coordinator has been shut down".into(),
            },

            CoreError::EntityNotFound { key } => CliError::NotFound {
                resource_type: "entity".into(),
                identifier: key,
                list_command: "state".into(),
            },

            CoreError::InvalidDataPath { path: _, reason } => CliError::Validation {
                field: "path".into(),
                reason,
            },

            CoreError::NotSupported { operation, entity } => {
                CliError::Unsupported { operation, entity }
            }
        }
    }
}

impl From<SetupError> for CliError {
    fn from(err: SetupError) -> Self {
        CliError::Setup {
            key: err.error_key(),
            field: err.field(),
            source: err,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
