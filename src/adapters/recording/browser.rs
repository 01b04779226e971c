//! Recording adapter for the page-automation port.
//!
//! Only page traffic is captured. Launching, opening pages and closing have
//! no observable output, so the replaying side serves them without a cassette
//! entry.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Browser, BrowserSession, ElementHandle, Page, PageResponse, PortFuture, WaitUntil};

#[derive(Serialize)]
struct NavigateInput<'a> {
    url: &'a str,
    wait: WaitUntil,
}

#[derive(Serialize)]
struct QueryInput<'a> {
    selector: &'a str,
}

/// Records page interactions while delegating to an inner browser.
pub struct RecordingBrowser {
    inner: Box<dyn Browser>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBrowser {
    /// Creates a new recording browser wrapping the given implementation.
    pub fn new(inner: Box<dyn Browser>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Browser for RecordingBrowser {
    fn launch(&self) -> PortFuture<'_, Box<dyn BrowserSession>> {
        let recorder = Arc::clone(&self.recorder);
        Box::pin(async move {
            let inner = self.inner.launch().await?;
            Ok(Box::new(RecordingSession { inner, recorder }) as Box<dyn BrowserSession>)
        })
    }
}

struct RecordingSession {
    inner: Box<dyn BrowserSession>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl BrowserSession for RecordingSession {
    fn new_page(&self) -> PortFuture<'_, Box<dyn Page>> {
        let recorder = Arc::clone(&self.recorder);
        Box::pin(async move {
            let inner = self.inner.new_page().await?;
            Ok(Box::new(RecordingPage { inner, recorder }) as Box<dyn Page>)
        })
    }

    fn close(&self) -> PortFuture<'_, ()> {
        self.inner.close()
    }
}

struct RecordingPage {
    inner: Box<dyn Page>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl Page for RecordingPage {
    fn navigate(&self, url: &str, wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>> {
        let url = url.to_string();
        Box::pin(async move {
            let result = self.inner.navigate(&url, wait).await;
            record_result(&self.recorder, "page", "navigate", &NavigateInput { url: &url, wait }, &result);
            result
        })
    }

    fn query(&self, selector: &str) -> PortFuture<'_, Vec<ElementHandle>> {
        let selector = selector.to_string();
        Box::pin(async move {
            let result = self.inner.query(&selector).await;
            record_result(&self.recorder, "page", "query", &QueryInput { selector: &selector }, &result);
            result
        })
    }
}
