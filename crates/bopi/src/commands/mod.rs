//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod get;
pub mod state;
pub mod switch;
pub mod validate;
pub mod watch;

use bopi_core::{Coordinator, CoordinatorConfig};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a device command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator_config = config::resolve_coordinator_config(global)?;

    match cmd {
        Command::State(args) => state::handle(&coordinator_config, &args, global).await,
        Command::Get(args) => get::handle(&coordinator_config, &args, global).await,
        Command::Watch(args) => watch::handle(coordinator_config, &args, global).await,
        Command::Validate => validate::handle(&coordinator_config, global).await,
        Command::Switch(args) => switch::handle(&coordinator_config, args, global).await,
        Command::Config(_) => unreachable!("config commands are handled before dispatch"),
    }
}

/// Build a coordinator and fetch once, without scheduling further polls.
pub(crate) async fn fetch_once(config: &CoordinatorConfig) -> Result<Coordinator, CliError> {
    let coordinator = Coordinator::from_config(config)?;
    coordinator.first_refresh().await?;
    Ok(coordinator)
}
