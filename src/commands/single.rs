//! `parlwatch single` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::traverse::detect_single;

/// Execute the `single` command: check one linked document and print its
/// change record as JSON.
///
/// # Errors
///
/// Returns an error string if the page, the selector, the link or the
/// download fails.
pub async fn run(
    ctx: &ServiceContext,
    page: &str,
    selector: &str,
    data_dir: &Path,
) -> Result<(), String> {
    let record = detect_single(ctx, page, selector, data_dir).await.map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| format!("Failed to serialize change record: {e}"))?;
    println!("{json}");
    Ok(())
}
