//! Replaying adapter for the page-automation port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Browser, BrowserSession, ElementHandle, Page, PageResponse, PortFuture, WaitUntil};

const PORT: &str = "page";

/// Serves recorded page traffic from a cassette.
///
/// Every session and page shares one replayer, so interactions are served
/// in the order they were recorded. Running past the end of the cassette
/// surfaces as a navigation or query error.
pub struct ReplayingBrowser {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingBrowser {
    /// Creates a replaying browser backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Arc::new(Mutex::new(replayer)) }
    }
}

impl Browser for ReplayingBrowser {
    fn launch(&self) -> PortFuture<'_, Box<dyn BrowserSession>> {
        let replayer = Arc::clone(&self.replayer);
        Box::pin(async move { Ok(Box::new(ReplayingSession { replayer }) as Box<dyn BrowserSession>) })
    }
}

struct ReplayingSession {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl BrowserSession for ReplayingSession {
    fn new_page(&self) -> PortFuture<'_, Box<dyn Page>> {
        let replayer = Arc::clone(&self.replayer);
        Box::pin(async move { Ok(Box::new(ReplayingPage { replayer }) as Box<dyn Page>) })
    }

    fn close(&self) -> PortFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}

struct ReplayingPage {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl Page for ReplayingPage {
    fn navigate(&self, _url: &str, _wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>> {
        let output = next_output(&self.replayer, PORT, "navigate");
        Box::pin(async move { replay_result(output?) })
    }

    fn query(&self, _selector: &str) -> PortFuture<'_, Vec<ElementHandle>> {
        let output = next_output(&self.replayer, PORT, "query");
        Box::pin(async move { replay_result(output?) })
    }
}
