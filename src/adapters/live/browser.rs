//! Live page-automation adapter: HTTP navigation with `reqwest`, element
//! queries with the streaming `lol_html` rewriter.
//!
//! Pages are not rendered and scripts do not run, so every wait policy is
//! satisfied once the response body has been read.

use std::borrow::Cow;
use std::cell::RefCell;
use std::sync::Mutex;
use std::time::Duration;

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use lol_html::html_content::{Element, TextChunk};
use lol_html::{ElementContentHandlers, HtmlRewriter, OutputSink, Selector, Settings};
use reqwest::Client;
use tracing::debug;

use crate::ports::{
    Browser, BrowserSession, ElementHandle, Page, PageResponse, PortError, PortFuture, WaitUntil,
};

const USER_AGENT: &str = concat!("parlwatch/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Live browser that drives pages over plain HTTP.
pub struct HttpBrowser {
    timeout: Duration,
}

impl HttpBrowser {
    /// Creates a browser with the default request timeout.
    #[must_use]
    pub fn new() -> Self {
        Self { timeout: DEFAULT_TIMEOUT }
    }
}

impl Default for HttpBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser for HttpBrowser {
    fn launch(&self) -> PortFuture<'_, Box<dyn BrowserSession>> {
        let timeout = self.timeout;
        Box::pin(async move {
            let client = Client::builder().user_agent(USER_AGENT).timeout(timeout).build()?;
            Ok(Box::new(HttpSession { client }) as Box<dyn BrowserSession>)
        })
    }
}

/// Session sharing one connection pool across its pages.
struct HttpSession {
    client: Client,
}

impl BrowserSession for HttpSession {
    fn new_page(&self) -> PortFuture<'_, Box<dyn Page>> {
        let client = self.client.clone();
        Box::pin(async move {
            Ok(Box::new(HttpPage { client, loaded: Mutex::new(None) }) as Box<dyn Page>)
        })
    }

    fn close(&self) -> PortFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}

/// Document most recently loaded into a page.
struct LoadedDocument {
    url: String,
    body: String,
}

/// Page holding the last navigated document for subsequent queries.
struct HttpPage {
    client: Client,
    loaded: Mutex<Option<LoadedDocument>>,
}

impl Page for HttpPage {
    fn navigate(&self, url: &str, wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>> {
        let url = url.to_string();
        Box::pin(async move {
            debug!(%url, ?wait, "navigating");
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| -> PortError { format!("navigation to {url} failed: {e}").into() })?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("navigation to {url} failed: HTTP {}", status.as_u16()).into());
            }
            let final_url = response.url().to_string();
            let body = response
                .text()
                .await
                .map_err(|e| -> PortError { format!("failed to read body of {url}: {e}").into() })?;

            *self.loaded.lock().map_err(|_| "page state lock poisoned")? =
                Some(LoadedDocument { url: final_url.clone(), body: body.clone() });

            Ok(Some(PageResponse { url: final_url, status: status.as_u16(), body: Some(body) }))
        })
    }

    fn query(&self, selector: &str) -> PortFuture<'_, Vec<ElementHandle>> {
        let selector = selector.to_string();
        Box::pin(async move {
            let loaded = self.loaded.lock().map_err(|_| "page state lock poisoned")?;
            let document = loaded.as_ref().ok_or("no page loaded")?;
            let elements = extract_elements(&document.body, &selector)?;
            debug!(url = %document.url, %selector, count = elements.len(), "queried");
            Ok(elements)
        })
    }
}

/// Element captured while streaming, before its markup is rendered.
///
/// Attribute values are decoded on capture. Text is kept raw until the
/// element is complete, since an entity may straddle two text chunks.
struct RawElement {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl RawElement {
    fn into_handle(self) -> ElementHandle {
        let text = decode_html_entities(&self.text).into_owned();

        let mut markup = format!("<{}", self.tag);
        for (name, value) in &self.attributes {
            markup.push_str(&format!(" {name}=\"{}\"", encode_double_quoted_attribute(value)));
        }
        markup.push_str(&format!(">{}</{}>", encode_text(&text), self.tag));

        ElementHandle {
            attributes: self.attributes.into_iter().collect(),
            text_content: text,
            outer_markup: markup,
        }
    }
}

/// Collects every element of `html` matching `selector`, in document order.
///
/// Text is attached to the most recently opened match, so nested matches
/// share their inner text with the innermost one.
fn extract_elements(html: &str, selector: &str) -> Result<Vec<ElementHandle>, PortError> {
    let parsed: Selector =
        selector.parse().map_err(|e| format!("invalid selector {selector:?}: {e}"))?;
    let collected: RefCell<Vec<RawElement>> = RefCell::new(Vec::new());

    {
        let handlers = ElementContentHandlers::default()
            .element(|el: &mut Element| {
                let attributes = el
                    .attributes()
                    .iter()
                    .map(|attr| (attr.name(), decode_html_entities(&attr.value()).into_owned()))
                    .collect();
                collected.borrow_mut().push(RawElement {
                    tag: el.tag_name(),
                    attributes,
                    text: String::new(),
                });
                Ok(())
            })
            .text(|chunk: &mut TextChunk| {
                if let Some(last) = collected.borrow_mut().last_mut() {
                    last.text.push_str(chunk.as_str());
                }
                Ok(())
            });

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![(Cow::Owned(parsed), handlers)],
                ..Settings::default()
            },
            NoopSink,
        );
        rewriter.write(html.as_bytes())?;
        rewriter.end()?;
    }

    Ok(collected.into_inner().into_iter().map(RawElement::into_handle).collect())
}

struct NoopSink;

impl OutputSink for NoopSink {
    fn handle_chunk(&mut self, _chunk: &[u8]) {}
}
