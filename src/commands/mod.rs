//! Command dispatch and handlers.

pub mod check;
pub mod report;
pub mod single;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::{self, RunConfig};
use crate::context::ServiceContext;

/// Environment variable naming a cassette file to record a live run into.
pub const RECORD_ENV: &str = "PARLWATCH_RECORD";

/// Dispatch a parsed command to its handler.
///
/// `--replay` serves page traffic from a cassette. Otherwise, when
/// `PARLWATCH_RECORD` is set to a file path, page and clock traffic of the
/// live run is recorded to that cassette.
///
/// # Errors
///
/// Returns an error string if the context cannot be built or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = context_for(cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    let result = match &cli.command {
        Command::Check { resources, leg, curr, data_dir, portal_url } => {
            let run_config = RunConfig {
                portal_url: config::portal_url(portal_url.as_deref()),
                data_dir: config::data_dir(data_dir.as_deref()),
                resources: resources.clone(),
                legislatures: leg.as_deref().map(config::parse_legislature_filter).unwrap_or_default(),
                current_only: *curr,
            };
            runtime.block_on(check::run(&ctx, &run_config))
        }
        Command::Single { page, selector, data_dir } => {
            let data_dir = config::data_dir(data_dir.as_deref());
            runtime.block_on(single::run(&ctx, page, selector, &data_dir))
        }
        Command::Report { data_dir } => report::run(&ctx, &config::data_dir(data_dir.as_deref())),
    };

    // Drop the context first so the cassette is written before we point at it.
    if let Some(path) = ctx.recording_path() {
        drop(ctx);
        eprintln!("Recording saved to: {}", path.display());
    }

    result
}

fn context_for(cli: &Cli) -> Result<ServiceContext, String> {
    if let Some(cassette) = &cli.replay {
        return ServiceContext::replaying(cassette);
    }
    let source = match &cli.command {
        Command::Check { portal_url, .. } => config::portal_url(portal_url.as_deref()),
        Command::Single { page, .. } => page.clone(),
        Command::Report { .. } => return Ok(ServiceContext::live()),
    };
    Ok(match env::var(RECORD_ENV) {
        Ok(path) if !path.is_empty() => ServiceContext::recording(&PathBuf::from(path), &source),
        _ => ServiceContext::live(),
    })
}
