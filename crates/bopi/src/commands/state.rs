//! State command handler.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use bopi_core::{Availability, Coordinator, CoordinatorConfig, sensors, switches};

use crate::cli::{GlobalOpts, OutputFormat, StateArgs};
use crate::error::CliError;
use crate::output;

// ── Entity rows ─────────────────────────────────────────────────────

/// One entity's current reading, as rendered by `state` and `watch`.
#[derive(Debug, Serialize)]
pub struct EntityState {
    pub kind: &'static str,
    pub key: &'static str,
    pub unique_id: String,
    /// Sensor reading or relay state; `null` when the device omits it.
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub availability: Availability,
    #[serde(skip)]
    pub display: String,
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Project every sensor and switch of `coordinator` into rows.
pub fn entity_states(coordinator: &Coordinator) -> Vec<EntityState> {
    let sensor_rows = sensors(coordinator).into_iter().map(|sensor| {
        let description = sensor.description();
        let display = match (sensor.display_value(), description.unit) {
            (Some(v), Some(unit)) => format!("{v} {unit}"),
            (Some(v), None) => v,
            (None, _) => "-".into(),
        };
        EntityState {
            kind: "sensor",
            key: sensor.key(),
            unique_id: sensor.unique_id().to_owned(),
            value: serde_json::to_value(sensor.native_value()).unwrap_or(Value::Null),
            unit: description.unit,
            availability: sensor.availability(),
            display,
        }
    });

    let switch_rows = switches(coordinator).into_iter().map(|switch| {
        let on = switch.is_on();
        EntityState {
            kind: "switch",
            key: switch.key(),
            unique_id: switch.unique_id().to_owned(),
            value: Value::Bool(on),
            unit: None,
            availability: switch.availability(),
            display: if on { "on" } else { "off" }.into(),
        }
    });

    sensor_rows.chain(switch_rows).collect()
}

pub fn render_states(
    states: &[EntityState],
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    output::render_list(
        format,
        states,
        |s| EntityRow {
            kind: s.kind,
            key: s.key,
            value: s.display.clone(),
            status: output::availability_label(s.availability, color),
        },
        |s| format!("{}={}", s.key, s.display),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: &CoordinatorConfig,
    args: &StateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let coordinator = super::fetch_once(config).await?;
    let Some(snapshot) = coordinator.current_snapshot() else {
        return Err(CliError::Unavailable {
            reason: "no state captured".into(),
        });
    };

    let out = if args.raw {
        output::render_single(global.output, snapshot.fields(), |v| format!("{v:#}"))?
    } else {
        let states = entity_states(&coordinator);
        render_states(&states, global.output, output::should_color(global.color))?
    };

    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!(
            "{} · fetched {}",
            config.title(),
            snapshot.fetched_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
