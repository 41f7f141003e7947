// ── Snapshots and data paths ──
//
// A `Snapshot` is captured once per successful refresh and never mutated
// afterwards. Consumers navigate it with a `DataPath`; any missing segment
// yields `None` instead of an error.

use std::fmt;
use std::str::FromStr;

use bopi_api::SensorsState;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{CoreError, FailureKind, UpdateFailed};

/// Ordered sequence of field names leading to a leaf in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPath(Vec<String>);

impl DataPath {
    /// A single-segment path, as used by sensors (`temp1`, `uptime`, ...).
    pub fn from_key(key: &str) -> Self {
        Self(vec![key.to_owned()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for DataPath {
    /// Split a dotted path without validation. Empty segments simply never
    /// match anything.
    fn from(dotted: &str) -> Self {
        Self(dotted.split('.').map(str::to_owned).collect())
    }
}

impl FromStr for DataPath {
    type Err = CoreError;

    /// Parse a dotted path from user input, rejecting empty segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.split('.').any(str::is_empty) {
            return Err(CoreError::InvalidDataPath {
                path: s.to_owned(),
                reason: "path segments must not be empty".into(),
            });
        }
        Ok(Self::from(s))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Latest state captured from a controller.
#[derive(Debug, Clone)]
pub struct Snapshot {
    host: String,
    sensors_state: SensorsState,
    /// JSON view of `sensors_state`, built once for path lookups.
    fields: Value,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture `sensors_state`. Fails if the state has no JSON view, in
    /// which case no path could be resolved against it.
    pub fn new(
        host: impl Into<String>,
        sensors_state: SensorsState,
    ) -> Result<Self, UpdateFailed> {
        let fields = serde_json::to_value(&sensors_state).map_err(|e| {
            UpdateFailed::new(
                FailureKind::InvalidResponse,
                format!("Invalid API response: {e}"),
            )
        })?;
        Ok(Self {
            host: host.into(),
            sensors_state,
            fields,
            fetched_at: Utc::now(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Typed view of the captured state.
    pub fn sensors_state(&self) -> &SensorsState {
        &self.sensors_state
    }

    /// Untyped view of the captured state, including unknown fields.
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Navigate `path` into the snapshot. Returns `None` if any segment is
    /// missing, traverses a non-object, or ends on `null`.
    pub fn lookup(&self, path: &DataPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.fields, |node, segment| node.get(segment.as_str()))
            .filter(|leaf| !leaf.is_null())
    }
}

/// Truthiness of a leaf value: `false`, `0`, `""`, `[]`, `{}` and `null`
/// are off, everything else is on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bopi_api::RelayState;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        let state: SensorsState = serde_json::from_value(json!({
            "temp1": 24.5,
            "relay1": { "status": true },
            "relay2": { "status": false },
            "filter": { "pressure": { "bar": 1.2 } }
        }))
        .unwrap();
        Snapshot::new("10.10.10.1", state).unwrap()
    }

    #[test]
    fn lookup_navigates_nested_fields() {
        let snap = snapshot();
        assert_eq!(snap.lookup(&"relay1.status".into()), Some(&json!(true)));
        assert_eq!(snap.lookup(&"filter.pressure.bar".into()), Some(&json!(1.2)));
        assert_eq!(snap.lookup(&DataPath::from_key("temp1")), Some(&json!(24.5)));
    }

    #[test]
    fn lookup_fails_closed_on_missing_segments() {
        let snap = snapshot();
        assert_eq!(snap.lookup(&"relay3.status".into()), None);
        assert_eq!(snap.lookup(&"relay1.status.extra".into()), None);
        assert_eq!(snap.lookup(&"temp2".into()), None);
        assert_eq!(snap.lookup(&"".into()), None);
    }

    #[test]
    fn fields_view_keeps_unknown_keys() {
        let snap = snapshot();
        assert_eq!(snap.fields()["temp1"], json!(24.5));
        assert_eq!(snap.fields()["filter"], json!({ "pressure": { "bar": 1.2 } }));
        assert!(snap.fields().get("temp2").is_none());
    }

    #[test]
    fn typed_state_is_preserved() {
        let snap = snapshot();
        assert_eq!(snap.host(), "10.10.10.1");
        assert_eq!(snap.sensors_state().relay1, Some(RelayState::new(true)));
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!("relay1..status".parse::<DataPath>().is_err());
        assert!("".parse::<DataPath>().is_err());

        let path: DataPath = "relay1.status".parse().unwrap();
        assert_eq!(path.segments(), ["relay1", "status"]);
        assert_eq!(path.to_string(), "relay1.status");
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("on")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&Value::Null));
    }
}
