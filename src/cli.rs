//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI parser for `parlwatch`.
#[derive(Debug, Parser)]
#[command(
    name = "parlwatch",
    version,
    about = "Watch the parliament open-data portal for changed XML datasets"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Serve page traffic from a recorded cassette instead of the network.
    #[arg(long, value_name = "CASSETTE", global = true)]
    pub replay: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk resources, legislatures and documents and report what changed.
    Check {
        /// Resource names to check (e.g. Deputados); all when omitted.
        resources: Vec<String>,

        /// Comma-separated legislature term codes (e.g. XV,XVI).
        #[arg(short = 'l', long = "leg", value_name = "TERMS")]
        leg: Option<String>,

        /// Check only the current legislature of each resource.
        #[arg(short = 'c', long = "curr", conflicts_with = "leg")]
        curr: bool,

        /// Directory for digests and the change report.
        #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Portal root page.
        #[arg(long, value_name = "URL")]
        portal_url: Option<String>,
    },
    /// Check the one document linked by a selector on a page.
    Single {
        /// Page holding the link.
        #[arg(long, value_name = "URL")]
        page: String,

        /// CSS selector of the link; the first match is used.
        #[arg(long, value_name = "CSS")]
        selector: String,

        /// Directory for the digest file.
        #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
    /// Print the change report of the last completed run.
    Report {
        /// Directory holding the change report.
        #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_check_with_filters() {
        let cli = Cli::parse_from(["parlwatch", "check", "Deputados", "Sessoes", "-l", "XV,XVI"]);
        match cli.command {
            Command::Check { resources, leg, curr, .. } => {
                assert_eq!(resources, vec!["Deputados", "Sessoes"]);
                assert_eq!(leg.as_deref(), Some("XV,XVI"));
                assert!(!curr);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn current_only_conflicts_with_term_filter() {
        let result = Cli::try_parse_from(["parlwatch", "check", "-c", "-l", "XVII"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["parlwatch", "report", "-vv", "--replay", "run.cassette.yaml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.replay.as_deref(), Some(std::path::Path::new("run.cassette.yaml")));
        assert!(matches!(cli.command, Command::Report { data_dir: None }));
    }

    #[test]
    fn single_requires_page_and_selector() {
        assert!(Cli::try_parse_from(["parlwatch", "single", "--page", "https://example.com/"]).is_err());
        let cli = Cli::parse_from([
            "parlwatch",
            "single",
            "--page",
            "https://example.com/",
            "--selector",
            "a.xml",
        ]);
        assert!(matches!(cli.command, Command::Single { .. }));
    }
}
