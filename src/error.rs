//! Error taxonomy for discovery, detection and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the change-detection core.
///
/// Only [`MonitorError::InvalidConfig`], [`MonitorError::SessionStart`] and
/// [`MonitorError::FatalDiscovery`] escape a multi-level run. The remaining
/// variants are contained by the traversal at the branch or document where
/// they occur.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The run configuration was rejected before any network activity.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The automation session or its page could not be started.
    #[error("failed to start automation session: {0}")]
    SessionStart(String),

    /// The portal root page could not be loaded or queried.
    #[error("failed to read portal root {url}: {reason}")]
    FatalDiscovery {
        /// Root URL being read.
        url: String,
        /// Underlying failure message.
        reason: String,
    },

    /// Discovering children of one resource or legislature failed.
    #[error("failed to discover {level} at {url}: {reason}")]
    Branch {
        /// Which level was being discovered (`legislatures` or `documents`).
        level: &'static str,
        /// Page being read.
        url: String,
        /// Underlying failure message.
        reason: String,
    },

    /// A document fetch returned no response or an empty body.
    #[error("failed to download {url}: {reason}")]
    DownloadFailure {
        /// Document URL.
        url: String,
        /// Underlying failure message.
        reason: String,
    },

    /// A single-document lookup matched no elements.
    #[error("no elements found with selector: {selector}")]
    SelectorMismatch {
        /// Selector that matched nothing.
        selector: String,
    },

    /// The element found by a single-document lookup has no usable link.
    #[error("element matched by {selector} has no usable href")]
    MissingHref {
        /// Selector of the element.
        selector: String,
    },

    /// Reading or writing persisted state failed.
    #[error("storage error at {}: {reason}", path.display())]
    Storage {
        /// File involved.
        path: PathBuf,
        /// Underlying failure message.
        reason: String,
    },

    /// Serializing the change report failed.
    #[error("failed to serialize change report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MonitorError {
    /// Returns `true` for errors that end a whole run rather than one branch.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::SessionStart(_) | Self::FatalDiscovery { .. }
        )
    }
}
