//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::browser::HttpBrowser;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::{RecordingBrowser, RecordingClock};
use crate::adapters::replaying::{ReplayingBrowser, ReplayingClock};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::browser::Browser;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for stamping change records.
    pub clock: Box<dyn Clock>,
    /// Filesystem for digests and the report.
    pub fs: Box<dyn FileSystem>,
    /// Page-automation engine.
    pub browser: Box<dyn Browser>,
    /// Cassette recorder shared with the recording adapters; written on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, fs: Box<dyn FileSystem>, browser: Box<dyn Browser>) -> Self {
        Self { clock, fs, browser, recorder: None }
    }

    /// Creates a live context: system clock, real disk, HTTP page engine.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveClock), Box::new(LiveFileSystem), Box::new(HttpBrowser::new()))
    }

    /// Creates a live context that records page and clock traffic.
    ///
    /// The cassette is written to `path` when the context is dropped. This
    /// is the mechanism behind the `PARLWATCH_RECORD` environment variable.
    #[must_use]
    pub fn recording(path: &Path, source: &str) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "parlwatch-session", source)));
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            fs: Box::new(LiveFileSystem),
            browser: Box::new(RecordingBrowser::new(
                Box::new(HttpBrowser::new()),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a context that serves page traffic from a cassette file.
    ///
    /// Digests and the report still go to the real disk. The clock is
    /// replayed when the cassette recorded one, and live otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        let clock: Box<dyn Clock> = if cassette.has_port(ReplayingClock::PORT) {
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette)))
        } else {
            Box::new(LiveClock)
        };

        Ok(Self::new(
            clock,
            Box::new(LiveFileSystem),
            Box::new(ReplayingBrowser::new(CassetteReplayer::new(&cassette))),
        ))
    }

    /// Path the cassette will be written to, when recording.
    #[must_use]
    pub fn recording_path(&self) -> Option<PathBuf> {
        let recorder = self.recorder.as_ref()?;
        recorder.lock().ok().map(|guard| guard.path().to_path_buf())
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let written = match recorder.lock() {
            Ok(guard) => guard.write(),
            Err(e) => {
                warn!("cassette recorder lock poisoned: {e}");
                return;
            }
        };
        match written {
            Ok(path) => info!(path = %path.display(), "recording saved"),
            Err(e) => warn!("failed to write cassette: {e}"),
        }
    }
}
