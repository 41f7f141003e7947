// Wire types for the `/api/sensors` endpoint.
//
// Every field is optional: firmware revisions differ in which probes and
// relays they report. Unknown fields are kept in `extra` so consumers can
// still reach them by path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State of a single relay output (pump, lights, or a generic relay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayState {
    pub status: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelayState {
    pub fn new(status: bool) -> Self {
        Self {
            status,
            extra: Map::new(),
        }
    }
}

/// Full sensor and relay state reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorsState {
    /// Water temperature probe 1 (°C).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp1: Option<f64>,
    /// Water temperature probe 2 (°C).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp2: Option<f64>,
    /// Temperature inside the controller enclosure (°C).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxtemp: Option<f64>,
    /// Relative humidity inside the controller enclosure (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxhumidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phvalue: Option<f64>,
    /// Oxidation-reduction potential (mV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redoxvalue: Option<f64>,
    /// Seconds since the controller booted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_pump: Option<RelayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_lights: Option<RelayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay1: Option<RelayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay2: Option<RelayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay3: Option<RelayState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay4: Option<RelayState>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_land_in_extra() {
        let state: SensorsState = serde_json::from_value(json!({
            "temp1": 24.5,
            "relay1": { "status": true, "name": "Heater" },
            "salinity": 3.2
        }))
        .unwrap();

        assert_eq!(state.temp1, Some(24.5));
        assert!(state.relay1.as_ref().unwrap().status);
        assert_eq!(state.relay1.unwrap().extra["name"], json!("Heater"));
        assert_eq!(state.extra["salinity"], json!(3.2));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let state = SensorsState {
            phvalue: Some(7.2),
            ..SensorsState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value, json!({ "phvalue": 7.2 }));
    }

    #[test]
    fn relay_status_must_be_boolean() {
        let result = serde_json::from_value::<SensorsState>(json!({
            "relay2": { "status": "maybe" }
        }));
        assert!(result.is_err());
    }
}
