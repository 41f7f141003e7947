//! Polling coordinator and entity layer between `bopi-api` and front ends.
//!
//! - **[`Coordinator`]** owns one device client and a cached [`Snapshot`] of
//!   its sensors state. It refreshes on a timer and on demand. Every refresh
//!   trigger funnels through a single-flight gate, so concurrent requests
//!   share one fetch and snapshot updates are totally ordered.
//!
//! - **Entities** ([`entity`]) are read-only projections of the snapshot:
//!   seven [`Sensor`]s and six relay [`Switch`]es, each addressed by a
//!   [`DataPath`] into the state.
//!
//! - **[`Command`]** is the typed request surface for front ends: forced
//!   refresh and (unsupported) relay control.
//!
//! - **Setup** ([`setup`]) validates connection settings and wires a
//!   coordinator up for one device registration.

pub mod command;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod setup;
pub mod snapshot;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{
    CoordinatorConfig, DEFAULT_PORT, DEFAULT_SCAN_INTERVAL, DEFAULT_TIMEOUT_SECS,
    MIN_SCAN_INTERVAL, clamp_scan_interval,
};
pub use coordinator::Coordinator;
pub use error::{CoreError, FailureKind, UpdateFailed};
pub use setup::{EntryInfo, SetupError, setup_entry, unload_entry, validate_input};
pub use snapshot::{DataPath, Snapshot, is_truthy};
pub use source::StateSource;

pub use entity::sensor::{
    SENSOR_DESCRIPTIONS, Sensor, SensorDescription, SensorDeviceClass, SensorValue, StateClass,
    sensors,
};
pub use entity::switch::{SWITCH_DESCRIPTIONS, Switch, SwitchDescription, switches};
pub use entity::{Availability, DOMAIN, DeviceInfo};

// Wire-level types front ends need without depending on `bopi-api`.
pub use bopi_api::{RelayState, SensorsState};
