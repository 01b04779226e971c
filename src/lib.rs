//! Change monitor for the XML datasets published on the parliament's
//! open-data portal.
//!
//! A run walks resource pages, legislature folders and document links,
//! digests every document, compares it with the digest stored by the
//! previous run and writes a report of what changed.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod detect;
pub mod digest;
pub mod discover;
pub mod error;
pub mod model;
pub mod ports;
pub mod report;
pub mod telemetry;
#[cfg(test)]
pub(crate) mod testing;
pub mod traverse;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    telemetry::init(cli.verbose);
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_prints_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        assert!(run(["parlwatch", "report", "-d", data_dir]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["parlwatch", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_rejects_conflicting_filters() {
        let err = run(["parlwatch", "check", "--curr", "--leg", "XVII"]).unwrap_err();
        assert!(err.contains("cannot be used with"));
    }
}
