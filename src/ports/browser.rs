//! Page-automation port: the engine that loads pages and answers element queries.
//!
//! The monitor never parses HTML itself. It asks a [`Page`] to navigate and
//! to return the elements matching a CSS selector, and reads attributes,
//! text and markup off the returned [`ElementHandle`] snapshots.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Boxed future type alias used by the automation traits to keep them dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Condition a navigation waits for before it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitUntil {
    /// The document and its subresources finished loading.
    Load,
    /// No network traffic for a short quiet period.
    NetworkIdle,
}

/// Response produced by a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Final URL after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Body decoded as text, or `None` when the resource was not textual.
    pub body: Option<String>,
}

impl PageResponse {
    /// Returns the body text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Snapshot of an element matched by [`Page::query`].
///
/// Handles are plain values: they stay readable after the page navigates
/// elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Attribute names mapped to their values.
    pub attributes: BTreeMap<String, String>,
    /// Concatenated text content of the element.
    pub text_content: String,
    /// Full markup of the element, opening tag through closing tag.
    pub outer_markup: String,
}

impl ElementHandle {
    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the named attribute, or an empty string when it is absent.
    #[must_use]
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or_default()
    }

    /// Returns the trimmed text content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.trim()
    }
}

/// Starts automation sessions.
pub trait Browser: Send + Sync {
    /// Launches a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be started.
    fn launch(&self) -> PortFuture<'_, Box<dyn BrowserSession>>;
}

/// A running automation session that owns pages.
pub trait BrowserSession: Send + Sync {
    /// Opens a new page in this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be created.
    fn new_page(&self) -> PortFuture<'_, Box<dyn Page>>;

    /// Closes the session and every page it opened.
    ///
    /// # Errors
    ///
    /// Returns an error if shutting the engine down fails.
    fn close(&self) -> PortFuture<'_, ()>;
}

/// A single page handle, reused serially across a run.
pub trait Page: Send + Sync {
    /// Navigates to `url` and suspends until `wait` is satisfied.
    ///
    /// Resolves to `None` when the navigation produced no response.
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation fails.
    fn navigate(&self, url: &str, wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>>;

    /// Returns the elements of the current document matching `selector`, in
    /// document order.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded or the selector is invalid.
    fn query(&self, selector: &str) -> PortFuture<'_, Vec<ElementHandle>>;
}
