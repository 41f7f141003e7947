//! Get command handler: one value by dotted path.

use bopi_core::{CoordinatorConfig, DataPath};

use crate::cli::{GetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: &CoordinatorConfig,
    args: &GetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let path: DataPath = args.path.parse()?;
    let coordinator = super::fetch_once(config).await?;

    let value = coordinator
        .current_snapshot()
        .and_then(|snapshot| snapshot.lookup(&path).cloned())
        .ok_or_else(|| CliError::NotFound {
            resource_type: "field".into(),
            identifier: path.to_string(),
            list_command: "state --raw".into(),
        })?;

    let out = output::render_single(global.output, &value, |v| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
