// ── Runtime device configuration ──
//
// Describes *how* to reach one BoPi controller and how often to poll it.
// Never touches disk: bopi-config (or any other front end) builds a
// `CoordinatorConfig` and hands it in.

use std::time::Duration;

/// Default HTTP port of the controller's local API.
pub const DEFAULT_PORT: u32 = 80;
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default polling interval.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);
/// Shortest polling interval accepted from user configuration.
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for polling a single controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Controller hostname or IP address (no scheme, no port).
    pub host: String,
    pub port: u32,
    pub timeout_secs: u64,
    /// How often to refresh. `Duration::ZERO` disables scheduled polling.
    pub scan_interval: Duration,
}

impl CoordinatorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Title used for the device registration, e.g. `BoPi (10.10.10.1)`.
    pub fn title(&self) -> String {
        format!("BoPi ({})", self.host)
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }
}

/// Raise a user-supplied polling interval to [`MIN_SCAN_INTERVAL`].
pub fn clamp_scan_interval(interval: Duration) -> Duration {
    interval.max(MIN_SCAN_INTERVAL)
}
