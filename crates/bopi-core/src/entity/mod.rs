// ── Entities ──
//
// Read-only projections of the coordinator's snapshot. Descriptions are
// static; readers hold a coordinator handle and nothing else.

pub mod sensor;
pub mod switch;

use serde::Serialize;

/// Integration domain, used in device identifiers.
pub const DOMAIN: &str = "bopi";

/// Device registry metadata shared by every entity of one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: (String, String),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn for_host(host: &str) -> Self {
        Self {
            identifiers: (DOMAIN.to_owned(), host.to_owned()),
            name: "BoPi Controller".into(),
            manufacturer: "BoPi".into(),
            model: "BoPi Pool Controller".into(),
        }
    }
}

/// Stable id of an entity: `<host>_<key>`.
pub fn unique_id(host: &str, key: &str) -> String {
    format!("{host}_{key}")
}

/// Availability of an entity's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Availability {
    /// No snapshot has been captured yet.
    Unavailable,
    /// The value comes from the latest refresh.
    Fresh,
    /// The latest refresh failed; the value comes from an earlier one.
    Stale,
}

impl Availability {
    pub fn is_available(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

pub(crate) fn availability<S: crate::StateSource>(
    coordinator: &crate::Coordinator<S>,
) -> Availability {
    if coordinator.current_snapshot().is_none() {
        Availability::Unavailable
    } else if coordinator.last_update_success() {
        Availability::Fresh
    } else {
        Availability::Stale
    }
}
