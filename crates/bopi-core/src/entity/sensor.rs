// ── Sensor entities ──

use std::fmt;

use bopi_api::BopiClient;
use serde::Serialize;
use serde_json::Value;

use super::{Availability, DeviceInfo};
use crate::coordinator::Coordinator;
use crate::snapshot::DataPath;
use crate::source::StateSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorDeviceClass {
    Temperature,
    Humidity,
    Ph,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// Static description of one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorDescription {
    /// Field name in the sensors state; also the entity key.
    pub key: &'static str,
    pub translation_key: &'static str,
    pub device_class: Option<SensorDeviceClass>,
    pub unit: Option<&'static str>,
    pub state_class: Option<StateClass>,
    pub display_precision: Option<u8>,
}

impl SensorDescription {
    const fn measurement(
        key: &'static str,
        device_class: Option<SensorDeviceClass>,
        unit: Option<&'static str>,
    ) -> Self {
        Self {
            key,
            translation_key: key,
            device_class,
            unit,
            state_class: Some(StateClass::Measurement),
            display_precision: None,
        }
    }
}

pub const SENSOR_DESCRIPTIONS: &[SensorDescription] = &[
    SensorDescription::measurement("temp1", Some(SensorDeviceClass::Temperature), Some("°C")),
    SensorDescription::measurement("temp2", Some(SensorDeviceClass::Temperature), Some("°C")),
    SensorDescription::measurement("boxtemp", Some(SensorDeviceClass::Temperature), Some("°C")),
    SensorDescription::measurement("boxhumidity", Some(SensorDeviceClass::Humidity), Some("%")),
    SensorDescription {
        display_precision: Some(2),
        ..SensorDescription::measurement("phvalue", Some(SensorDeviceClass::Ph), None)
    },
    SensorDescription::measurement("redoxvalue", None, Some("mV")),
    SensorDescription::measurement("uptime", Some(SensorDeviceClass::Duration), Some("s")),
];

/// A scalar sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SensorValue {
    /// Convert a snapshot leaf. Only numbers and text are sensor values.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Render with an optional number of decimals (floats only).
    pub fn display_with(&self, precision: Option<u8>) -> String {
        match (self, precision) {
            (Self::Float(f), Some(p)) => format!("{f:.prec$}", prec = usize::from(p)),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Reader projecting one field of the coordinator's snapshot.
pub struct Sensor<S: StateSource = BopiClient> {
    coordinator: Coordinator<S>,
    description: &'static SensorDescription,
    path: DataPath,
    unique_id: String,
}

impl<S: StateSource> Sensor<S> {
    pub fn new(coordinator: Coordinator<S>, description: &'static SensorDescription) -> Self {
        let unique_id = super::unique_id(coordinator.host(), description.key);
        Self {
            coordinator,
            description,
            path: DataPath::from_key(description.key),
            unique_id,
        }
    }

    pub fn key(&self) -> &'static str {
        self.description.key
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
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

    /// Current reading, or `None` without a snapshot or when the device
    /// does not report this field.
    pub fn native_value(&self) -> Option<SensorValue> {
        let snapshot = self.coordinator.current_snapshot()?;
        snapshot.lookup(&self.path).and_then(SensorValue::from_json)
    }

    /// Reading rendered with the description's display precision.
    pub fn display_value(&self) -> Option<String> {
        self.native_value()
            .map(|v| v.display_with(self.description.display_precision))
    }
}

/// One reader per entry in [`SENSOR_DESCRIPTIONS`].
pub fn sensors<S: StateSource>(coordinator: &Coordinator<S>) -> Vec<Sensor<S>> {
    SENSOR_DESCRIPTIONS
        .iter()
        .map(|description| Sensor::new(coordinator.clone(), description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_scalars() {
        assert_eq!(SensorValue::from_json(&json!(86400)), Some(SensorValue::Integer(86_400)));
        assert_eq!(SensorValue::from_json(&json!(7.21)), Some(SensorValue::Float(7.21)));
        assert_eq!(
            SensorValue::from_json(&json!("ok")),
            Some(SensorValue::Text("ok".into()))
        );
        assert_eq!(SensorValue::from_json(&json!(true)), None);
        assert_eq!(SensorValue::from_json(&json!({ "status": true })), None);
    }

    #[test]
    fn applies_display_precision() {
        assert_eq!(SensorValue::Float(7.2).display_with(Some(2)), "7.20");
        assert_eq!(SensorValue::Integer(7).display_with(Some(2)), "7");
        assert_eq!(SensorValue::Float(24.5).display_with(None), "24.5");
    }

    #[test]
    fn descriptions_cover_every_probe() {
        let keys: Vec<_> = SENSOR_DESCRIPTIONS.iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            ["temp1", "temp2", "boxtemp", "boxhumidity", "phvalue", "redoxvalue", "uptime"]
        );
        let ph = SENSOR_DESCRIPTIONS.iter().find(|d| d.key == "phvalue");
        assert_eq!(ph.and_then(|d| d.display_precision), Some(2));
    }
}
