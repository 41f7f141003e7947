// ── Command API ──
//
// Every request a front end can make against a device goes through the
// `Command` enum. Refresh is the only command with an effect; relay
// control is modelled explicitly as unsupported.

use tracing::debug;

use crate::coordinator::Coordinator;
use crate::entity::switch::{Switch, find_description};
use crate::error::CoreError;
use crate::source::StateSource;

/// All operations a front end can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trigger a refresh without waiting for it.
    Refresh,
    TurnOn { key: String },
    TurnOff { key: String },
}

/// Outcome of a successfully routed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A refresh was started or joined; its outcome is observable through
    /// the coordinator.
    RefreshRequested,
    Ok,
}

pub(crate) async fn route_command<S: StateSource>(
    coordinator: &Coordinator<S>,
    cmd: Command,
) -> Result<CommandResult, CoreError> {
    match cmd {
        Command::Refresh => {
            coordinator.request_refresh();
            debug!(coordinator = %coordinator.name(), "sensor refresh forced");
            Ok(CommandResult::RefreshRequested)
        }
        Command::TurnOn { key } => {
            switch_for(coordinator, &key)?.turn_on().await?;
            Ok(CommandResult::Ok)
        }
        Command::TurnOff { key } => {
            switch_for(coordinator, &key)?.turn_off().await?;
            Ok(CommandResult::Ok)
        }
    }
}

fn switch_for<S: StateSource>(
    coordinator: &Coordinator<S>,
    key: &str,
) -> Result<Switch<S>, CoreError> {
    let description = find_description(key).ok_or_else(|| CoreError::EntityNotFound {
        key: key.to_owned(),
    })?;
    Ok(Switch::new(coordinator.clone(), description))
}
