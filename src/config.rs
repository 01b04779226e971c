//! Run configuration passed explicitly into the traversal.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::MonitorError;

/// Open-data landing page of the Portuguese Parliament.
pub const DEFAULT_PORTAL_URL: &str =
    "https://www.parlamento.pt/Cidadania/paginas/dadosabertos.aspx";

/// Default directory holding digests and the report.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// File name of the change report inside the data directory.
pub const REPORT_FILE: &str = "change-report.json";

/// Environment variable overriding the portal URL.
pub const PORTAL_URL_ENV: &str = "PARLWATCH_PORTAL_URL";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PARLWATCH_DATA_DIR";

/// Everything one multi-level run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Portal root page.
    pub portal_url: String,
    /// Directory for digest files and the change report.
    pub data_dir: PathBuf,
    /// Resource allow-list; empty keeps every resource.
    pub resources: Vec<String>,
    /// Upper-cased legislature term codes; empty keeps every term.
    pub legislatures: Vec<String>,
    /// Keep only the first (most recent) legislature of each resource.
    pub current_only: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            resources: Vec::new(),
            legislatures: Vec::new(),
            current_only: false,
        }
    }
}

impl RunConfig {
    /// Path of the change report for this run.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        report_path(&self.data_dir)
    }

    /// Rejects configurations that must not start a traversal.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidConfig`] when `current_only` is combined
    /// with a legislature filter or the portal URL is not absolute.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.current_only && !self.legislatures.is_empty() {
            return Err(MonitorError::InvalidConfig(
                "current-term-only is incompatible with a legislature filter; use one or the other"
                    .into(),
            ));
        }
        Url::parse(&self.portal_url).map_err(|e| {
            MonitorError::InvalidConfig(format!("portal URL {:?} is not valid: {e}", self.portal_url))
        })?;
        Ok(())
    }
}

/// Path of the change report inside `data_dir`.
#[must_use]
pub fn report_path(data_dir: &Path) -> PathBuf {
    data_dir.join(REPORT_FILE)
}

/// Splits a comma-separated list of term codes into trimmed, upper-cased codes.
#[must_use]
pub fn parse_legislature_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Resolves the portal URL: explicit value, then environment, then default.
#[must_use]
pub fn portal_url(explicit: Option<&str>) -> String {
    explicit.map_or_else(
        || std::env::var(PORTAL_URL_ENV).unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string()),
        String::from,
    )
}

/// Resolves the data directory: explicit value, then environment, then default.
#[must_use]
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || std::env::var(DATA_DIR_ENV).map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
        Path::to_path_buf,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_only_conflicts_with_term_filter() {
        let config = RunConfig {
            legislatures: vec!["XV".into()],
            current_only: true,
            ..RunConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn current_only_alone_is_valid() {
        let config = RunConfig { current_only: true, ..RunConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_portal_url_is_rejected() {
        let config = RunConfig { portal_url: "/dadosabertos.aspx".into(), ..RunConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn legislature_filter_is_trimmed_and_upper_cased() {
        assert_eq!(parse_legislature_filter(" xv, XVI ,,xvii"), vec!["XV", "XVI", "XVII"]);
        assert!(parse_legislature_filter("").is_empty());
    }

    #[test]
    fn report_lives_in_data_dir() {
        let config = RunConfig { data_dir: PathBuf::from("/tmp/pw"), ..RunConfig::default() };
        assert_eq!(config.report_path(), PathBuf::from("/tmp/pw/change-report.json"));
    }

    #[test]
    fn explicit_values_win() {
        assert_eq!(portal_url(Some("https://example.com/")), "https://example.com/");
        assert_eq!(data_dir(Some(Path::new("/srv/data"))), PathBuf::from("/srv/data"));
    }
}
