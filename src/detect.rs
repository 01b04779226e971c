//! Change detection for a single document: fetch, digest, compare, persist.

use std::path::Path;

use tracing::debug;

use crate::digest::{sha256_hex, DigestStore};
use crate::error::MonitorError;
use crate::model::{ChangeRecord, Document};
use crate::ports::{Clock, Page, WaitUntil};

/// Runs the fetch-digest-compare-persist cycle against one page handle.
pub struct ChangeDetector<'a> {
    page: &'a dyn Page,
    store: &'a DigestStore<'a>,
    clock: &'a dyn Clock,
}

impl<'a> ChangeDetector<'a> {
    /// Creates a detector that fetches through `page` and persists to `store`.
    #[must_use]
    pub fn new(page: &'a dyn Page, store: &'a DigestStore<'a>, clock: &'a dyn Clock) -> Self {
        Self { page, store, clock }
    }

    /// Checks a discovered document against its digest file.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DownloadFailure`] when the fetch yields nothing,
    /// or [`MonitorError::Storage`] when the digest file cannot be used.
    pub async fn detect(&self, document: &Document) -> Result<ChangeRecord, MonitorError> {
        let path = self.store.path_for(document);
        self.check(&document.url, &path).await
    }

    /// Checks the content at `url` against the digest stored at `digest_path`.
    ///
    /// The digest file is rewritten only when the content changed or was
    /// never seen before.
    ///
    /// # Errors
    ///
    /// Same as [`ChangeDetector::detect`].
    pub async fn check(&self, url: &str, digest_path: &Path) -> Result<ChangeRecord, MonitorError> {
        let content = self.fetch(url).await?;
        let current_digest = sha256_hex(&content);
        let previous_digest = self.store.load(digest_path)?;

        let has_changed = previous_digest.as_deref() != Some(current_digest.as_str());
        if has_changed {
            self.store.save(digest_path, &current_digest)?;
        }
        debug!(url, has_changed, digest = %current_digest, "checked document");

        Ok(ChangeRecord {
            has_changed,
            current_digest,
            previous_digest,
            timestamp: self.clock.now(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, MonitorError> {
        let failure = |reason: String| MonitorError::DownloadFailure { url: url.to_string(), reason };

        let response = self
            .page
            .navigate(url, WaitUntil::Load)
            .await
            .map_err(|e| failure(e.to_string()))?
            .ok_or_else(|| failure("no response".into()))?;

        match response.text() {
            Some(body) if !body.is_empty() => Ok(body.to_string()),
            _ => Err(failure("empty or non-text body".into())),
        }
    }
}
