// ── Core error types ──
//
// Fetch-time failures from bopi-api never reach consumers raw: they are
// folded into `UpdateFailed`, which the coordinator records and hands to
// every caller that joined the refresh. `CoreError` covers everything else
// (setup, lifecycle, unsupported operations).

use thiserror::Error;

/// Category of a failed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The device did not answer in time.
    Timeout,
    /// The device could not be reached or answered with an error status.
    Connection,
    /// The device answered with something that is not a sensors state.
    InvalidResponse,
    /// The client itself is misconfigured.
    Configuration,
    /// The coordinator was torn down or the refresh task died.
    Unavailable,
}

/// Uniform "update failed" signal produced by a refresh.
///
/// Cheap to clone: every caller that joined an in-flight refresh receives
/// its own copy of the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct UpdateFailed {
    kind: FailureKind,
    reason: String,
}

impl UpdateFailed {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn shut_down() -> Self {
        Self::new(FailureKind::Unavailable, "Coordinator has been shut down")
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable cause, suitable for surfacing to the user.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<bopi_api::Error> for UpdateFailed {
    fn from(err: bopi_api::Error) -> Self {
        match err {
            bopi_api::Error::Timeout { .. } => Self::new(
                FailureKind::Timeout,
                format!("Timeout communicating with API: {err}"),
            ),
            bopi_api::Error::Connection { .. } => Self::new(
                FailureKind::Connection,
                format!("Error connecting to API: {err}"),
            ),
            bopi_api::Error::Validation { .. } => Self::new(
                FailureKind::InvalidResponse,
                format!("Invalid API response: {err}"),
            ),
            bopi_api::Error::Config { .. } => Self::new(
                FailureKind::Configuration,
                format!("Invalid client configuration: {err}"),
            ),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("Device not ready: {source}")]
    NotReady {
        #[source]
        source: UpdateFailed,
    },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Coordinator has been shut down")]
    ShutDown,

    #[error(transparent)]
    UpdateFailed(#[from] UpdateFailed),

    // ── Entity errors ────────────────────────────────────────────────
    #[error("Entity not found: {key}")]
    EntityNotFound { key: String },

    #[error("Invalid data path '{path}': {reason}")]
    InvalidDataPath { path: String, reason: String },

    #[error("Operation not supported: {operation} on '{entity}'")]
    NotSupported { operation: String, entity: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bopi_api::Error> for CoreError {
    fn from(err: bopi_api::Error) -> Self {
        match err {
            bopi_api::Error::Config { field, reason } => CoreError::Config {
                field: field.to_string(),
                reason,
            },
            other => CoreError::UpdateFailed(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bopi_api::ConfigField;

    #[test]
    fn timeout_maps_to_timeout_failure() {
        let failed = UpdateFailed::from(bopi_api::Error::Timeout { timeout_secs: 30 });
        assert_eq!(failed.kind(), FailureKind::Timeout);
        assert!(failed.reason().starts_with("Timeout communicating with API"));
    }

    #[test]
    fn connection_maps_to_connection_failure() {
        let failed = UpdateFailed::from(bopi_api::Error::Connection {
            url: "http://10.0.0.2/api/sensors".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(failed.kind(), FailureKind::Connection);
        assert!(failed.reason().starts_with("Error connecting to API"));
        assert!(failed.reason().contains("connection refused"));
    }

    #[test]
    fn validation_maps_to_invalid_response() {
        let failed = UpdateFailed::from(bopi_api::Error::Validation {
            message: "expected value at line 1".into(),
            body: "<html>".into(),
        });
        assert_eq!(failed.kind(), FailureKind::InvalidResponse);
        assert!(failed.reason().starts_with("Invalid API response"));
    }

    #[test]
    fn config_errors_stay_setup_errors() {
        let err = CoreError::from(bopi_api::Error::Config {
            field: ConfigField::Port,
            reason: "port must be between 1 and 65535, got 0".into(),
        });
        assert!(matches!(err, CoreError::Config { ref field, .. } if field == "port"));
    }
}
