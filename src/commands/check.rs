//! `parlwatch check` command.

use std::time::Instant;

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::report::{self, ChangeReport};
use crate::traverse::detect_all_changes;

/// Execute the `check` command.
///
/// Removes the previous report, walks the portal, writes the new report and
/// prints a summary. A run that fails before completing leaves no report.
///
/// # Errors
///
/// Returns an error string if the configuration is rejected, the portal root
/// cannot be read, or the report cannot be written.
pub async fn run(ctx: &ServiceContext, config: &RunConfig) -> Result<(), String> {
    config.validate().map_err(|e| e.to_string())?;
    let started = Instant::now();
    let report_path = config.report_path();

    report::clear(ctx.fs.as_ref(), &report_path).map_err(|e| e.to_string())?;
    let results = detect_all_changes(ctx, config).await.map_err(|e| e.to_string())?;

    let report = ChangeReport::build(&results);
    report::write(ctx.fs.as_ref(), &report_path, &report).map_err(|e| e.to_string())?;

    let changed = results.iter().filter(|r| r.change.has_changed).count();
    println!("Checked {} documents, {changed} changed.", results.len());
    println!("Report: {}", report_path.display());
    println!("Finished in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}
