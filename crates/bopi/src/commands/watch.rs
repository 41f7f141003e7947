//! Watch command handler: continuous polling.
//!
//! Prints one update per completed refresh until interrupted. Each line
//! read from stdin forces an immediate refresh.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use bopi_core::{
    Availability, Command as CoreCommand, Coordinator, CoordinatorConfig, clamp_scan_interval,
    setup_entry, unload_entry,
};

use super::state::{EntityState, entity_states};
use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Update<'a> {
    host: &'a str,
    fetched_at: Option<DateTime<Utc>>,
    availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_error: Option<String>,
    entities: &'a [EntityState],
}

fn summary_line(update: &Update<'_>, color: bool) -> String {
    let readings = update
        .entities
        .iter()
        .map(|s| format!("{}={}", s.key, s.display))
        .collect::<Vec<_>>()
        .join("  ");

    let mut line = format!(
        "{}  {}  {readings}",
        Utc::now().format("%H:%M:%S"),
        output::availability_label(update.availability, color),
    );
    if let Some(ref err) = update.last_error {
        line.push_str("  (");
        line.push_str(err);
        line.push(')');
    }
    line
}

fn print_update(
    coordinator: &Coordinator,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let states = entity_states(coordinator);
    let update = Update {
        host: coordinator.host(),
        fetched_at: coordinator.current_snapshot().map(|s| s.fetched_at()),
        availability: states
            .first()
            .map_or(Availability::Unavailable, |s| s.availability),
        last_error: coordinator.last_error().map(|e| e.reason().to_owned()),
        entities: &states,
    };

    let out = output::render_single(global.output, &update, |u| summary_line(u, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Forward stdin lines as refresh requests.
///
/// Runs on a plain thread: a blocking stdin read must not hold up runtime
/// shutdown. The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    mut config: CoordinatorConfig,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        config.scan_interval = clamp_scan_interval(Duration::from_secs(secs));
    }

    let coordinator = setup_entry(&config).await?;
    let color = output::should_color(global.color);

    if !global.quiet {
        eprintln!(
            "Watching {} every {}s (Enter refreshes, Ctrl-C stops)",
            config.title(),
            coordinator.update_interval().as_secs()
        );
    }

    let mut updates = coordinator.subscribe();
    updates.borrow_and_update();
    let mut refresh_requests = spawn_stdin_reader();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = 0u64;
    let result = loop {
        if let Err(e) = print_update(&coordinator, global, color) {
            break Err(e);
        }
        printed += 1;
        if args.count.is_some_and(|n| printed >= n) {
            break Ok(());
        }

        // Wait for the next completed refresh.
        let outcome = loop {
            tokio::select! {
                _ = &mut ctrl_c => break None,
                changed = updates.changed() => {
                    updates.borrow_and_update();
                    break Some(changed.is_ok());
                }
                request = refresh_requests.recv(), if stdin_open => match request {
                    Some(()) => {
                        if let Err(e) = coordinator.execute(CoreCommand::Refresh).await {
                            tracing::warn!(error = %e, "refresh request rejected");
                        }
                    }
                    None => stdin_open = false,
                },
            }
        };

        match outcome {
            Some(true) => {}
            Some(false) | None => break Ok(()),
        }
    };

    unload_entry(&coordinator).await;
    result
}
