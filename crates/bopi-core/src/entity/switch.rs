// ── Switch entities ──
//
// Relay states are read-only. The device exposes no documented control
// endpoint, so `turn_on`/`turn_off` always fail with `NotSupported`.

use bopi_api::BopiClient;
use serde::Serialize;

use super::{Availability, DeviceInfo};
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::snapshot::{DataPath, is_truthy};
use crate::source::StateSource;

/// Static description of one relay switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchDescription {
    pub key: &'static str,
    pub translation_key: &'static str,
    /// Dotted path of the relay status in the sensors state.
    pub data_key: &'static str,
    pub icon: &'static str,
}

impl SwitchDescription {
    const fn relay(key: &'static str, data_key: &'static str, icon: &'static str) -> Self {
        Self {
            key,
            translation_key: key,
            data_key,
            icon,
        }
    }
}

pub const SWITCH_DESCRIPTIONS: &[SwitchDescription] = &[
    SwitchDescription::relay("pool_pump", "pool_pump.status", "mdi:pump"),
    SwitchDescription::relay("pool_lights", "pool_lights.status", "mdi:lightbulb"),
    SwitchDescription::relay("relay1", "relay1.status", "mdi:electric-switch"),
    SwitchDescription::relay("relay2", "relay2.status", "mdi:electric-switch"),
    SwitchDescription::relay("relay3", "relay3.status", "mdi:electric-switch"),
    SwitchDescription::relay("relay4", "relay4.status", "mdi:electric-switch"),
];

/// Look up a switch description by entity key.
pub fn find_description(key: &str) -> Option<&'static SwitchDescription> {
    SWITCH_DESCRIPTIONS.iter().find(|d| d.key == key)
}

/// Reader projecting one relay status of the coordinator's snapshot.
pub struct Switch<S: StateSource = BopiClient> {
    coordinator: Coordinator<S>,
    description: &'static SwitchDescription,
    path: DataPath,
    unique_id: String,
}

impl<S: StateSource> Switch<S> {
    pub fn new(coordinator: Coordinator<S>, description: &'static SwitchDescription) -> Self {
        let unique_id = super::unique_id(coordinator.host(), description.key);
        Self {
            coordinator,
            description,
            path: DataPath::from(description.data_key),
            unique_id,
        }
    }

    pub fn key(&self) -> &'static str {
        self.description.key
    }

    pub fn description(&self) -> &'static SwitchDescription {
        self.description
    }

    pub fn data_path(&self) -> &DataPath {
        &self.path
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::for_host(self.coordinator.host())
    }

    pub fn availability(&self) -> Availability {
        super::availability(&self.coordinator)
    }

    /// Relay state from the cached snapshot. Fails closed: no snapshot or a
    /// missing field reads as off.
    pub fn is_on(&self) -> bool {
        self.coordinator
            .current_snapshot()
            .is_some_and(|snapshot| snapshot.lookup(&self.path).is_some_and(is_truthy))
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        Err(self.not_supported("turn_on"))
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        Err(self.not_supported("turn_off"))
    }

    fn not_supported(&self, operation: &str) -> CoreError {
        CoreError::NotSupported {
            operation: operation.into(),
            entity: self.description.key.into(),
        }
    }
}

/// One reader per entry in [`SWITCH_DESCRIPTIONS`].
pub fn switches<S: StateSource>(coordinator: &Coordinator<S>) -> Vec<Switch<S>> {
    SWITCH_DESCRIPTIONS
        .iter()
        .map(|description| Switch::new(coordinator.clone(), description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_switch_reads_a_status_field() {
        for description in SWITCH_DESCRIPTIONS {
            let path = DataPath::from(description.data_key);
            assert_eq!(path.segments().first().map(String::as_str), Some(description.key));
            assert_eq!(path.segments().last().map(String::as_str), Some("status"));
        }
    }

    #[test]
    fn finds_descriptions_by_key() {
        assert_eq!(find_description("relay3").map(|d| d.icon), Some("mdi:electric-switch"));
        assert!(find_description("relay9").is_none());
    }
}
