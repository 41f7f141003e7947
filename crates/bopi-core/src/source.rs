// ── Remote state source ──
//
// The seam between the coordinator and the device. Production code uses
// `BopiClient`; tests plug in scripted sources.

use std::future::Future;

use bopi_api::{BopiClient, SensorsState};

/// Anything that can fetch the current sensors state of one device.
pub trait StateSource: Send + Sync + 'static {
    /// Host used for unique ids and device identifiers.
    fn host(&self) -> &str;

    /// Fetch the current state. Must not retry; the coordinator's schedule
    /// is the only retry mechanism.
    fn fetch_state(&self) -> impl Future<Output = Result<SensorsState, bopi_api::Error>> + Send;
}

impl StateSource for BopiClient {
    fn host(&self) -> &str {
        BopiClient::host(self)
    }

    async fn fetch_state(&self) -> Result<SensorsState, bopi_api::Error> {
        self.get_sensors_state().await
    }
}
