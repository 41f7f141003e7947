//! Switch command handlers.

use bopi_core::{Command as CoreCommand, Coordinator, CoordinatorConfig};

use crate::cli::{GlobalOpts, SwitchArgs, SwitchCommand};
use crate::error::CliError;

pub async fn handle(
    config: &CoordinatorConfig,
    args: SwitchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Relay commands are rejected before any request reaches the device,
    // so no initial fetch is needed.
    let coordinator = Coordinator::from_config(config)?;

    let (cmd, verb) = match args.command {
        SwitchCommand::On { key } => (CoreCommand::TurnOn { key }, "on"),
        SwitchCommand::Off { key } => (CoreCommand::TurnOff { key }, "off"),
    };
    coordinator.execute(cmd).await?;

    if !global.quiet {
        eprintln!("Switch turned {verb}");
    }
    Ok(())
}
