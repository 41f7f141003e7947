use thiserror::Error;

/// A configuration field rejected when building a [`BopiClient`](crate::BopiClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigField {
    Host,
    Port,
    Timeout,
}

/// Top-level error type for the `bopi-api` crate.
///
/// Construction problems surface as [`Error::Config`]; everything else is a
/// fetch-time failure. `bopi-core` folds the fetch-time variants into a single
/// update-failed signal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Setup ───────────────────────────────────────────────────────
    /// A constructor argument is unusable (empty host, port 0, ...).
    #[error("Invalid {field}: {reason}")]
    Config { field: ConfigField, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The device did not answer within the configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection refused, DNS failure, or a non-success HTTP status.
    #[error("Cannot reach {url}: {reason}")]
    Connection { url: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body did not have the expected shape, with the raw
    /// body for debugging.
    #[error("Unexpected response: {message}")]
    Validation { message: String, body: String },
}

impl Error {
    /// The offending configuration field, if this is a setup error.
    pub fn config_field(&self) -> Option<ConfigField> {
        match self {
            Self::Config { field, .. } => Some(*field),
            _ => None,
        }
    }
}
