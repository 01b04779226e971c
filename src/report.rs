//! Change report: changed document URLs grouped by resource and term.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::discover::legislature::term_code;
use crate::error::MonitorError;
use crate::model::DocumentChangeResult;
use crate::ports::FileSystem;

/// Resource name → term code → URL of the changed document.
///
/// Serializes as the bare nested object, so an empty report is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeReport {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl ChangeReport {
    /// Builds the report from the results of one run.
    ///
    /// Unchanged documents are left out. Documents whose legislature name
    /// carries no term code are grouped under the full name. When several
    /// changed documents share a resource and term, the last one wins.
    #[must_use]
    pub fn build(results: &[DocumentChangeResult]) -> Self {
        let mut entries: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for result in results.iter().filter(|r| r.change.has_changed) {
            let document = &result.document;
            let term = term_code(&document.legislature_name)
                .unwrap_or(document.legislature_name.as_str());
            entries
                .entry(document.resource_name.clone())
                .or_default()
                .insert(term.to_string(), document.url.clone());
        }
        Self { entries }
    }

    /// Returns `true` when no document changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (resource, term) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// URL recorded for `resource` and `term`.
    #[must_use]
    pub fn get(&self, resource: &str, term: &str) -> Option<&str> {
        self.entries.get(resource)?.get(term).map(String::as_str)
    }

    /// Pretty-printed JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes `report` to `path`, replacing any previous content.
///
/// # Errors
///
/// Returns [`MonitorError::Storage`] if the file cannot be written.
pub fn write(fs: &dyn FileSystem, path: &Path, report: &ChangeReport) -> Result<(), MonitorError> {
    let json = report.to_json()?;
    fs.write(path, &json)
        .map_err(|e| MonitorError::Storage { path: path.to_path_buf(), reason: e.to_string() })?;
    info!(path = %path.display(), entries = report.len(), "change report written");
    Ok(())
}

/// Deletes a report left by an earlier run. Missing files are fine.
///
/// # Errors
///
/// Returns [`MonitorError::Storage`] if an existing file cannot be removed.
pub fn clear(fs: &dyn FileSystem, path: &Path) -> Result<(), MonitorError> {
    if !fs.exists(path) {
        return Ok(());
    }
    fs.remove_file(path)
        .map_err(|e| MonitorError::Storage { path: path.to_path_buf(), reason: e.to_string() })?;
    debug!(path = %path.display(), "stale change report removed");
    Ok(())
}

/// Loads the report at `path`, or `None` when there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Option<ChangeReport>, MonitorError> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let contents = fs
        .read_to_string(path)
        .map_err(|e| MonitorError::Storage { path: path.to_path_buf(), reason: e.to_string() })?;
    Ok(Some(serde_json::from_str(&contents)?))
}
