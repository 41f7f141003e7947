//! Validate command handler.

use serde::Serialize;

use bopi_core::{CoordinatorConfig, validate_input};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Validated<'a> {
    title: &'a str,
    host: &'a str,
    port: u32,
    timeout_secs: u64,
}

pub async fn handle(config: &CoordinatorConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let info = validate_input(config).await?;

    let result = Validated {
        title: &info.title,
        host: &config.host,
        port: config.port,
        timeout_secs: config.timeout_secs,
    };
    let out = output::render_single(global.output, &result, |r| {
        format!("{} is reachable on port {}", r.title, r.port)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
