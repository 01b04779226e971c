//! `parlwatch report` command.

use std::path::Path;

use crate::config::report_path;
use crate::context::ServiceContext;
use crate::report::load;

/// Execute the `report` command.
///
/// Prints the report of the last completed run, or a notice when there is
/// none.
///
/// # Errors
///
/// Returns an error string if the report exists but cannot be read.
pub fn run(ctx: &ServiceContext, data_dir: &Path) -> Result<(), String> {
    let path = report_path(data_dir);
    match load(ctx.fs.as_ref(), &path).map_err(|e| e.to_string())? {
        Some(report) => println!("{}", report.to_json().map_err(|e| e.to_string())?),
        None => println!("No change report found at {}.", path.display()),
    }
    Ok(())
}
