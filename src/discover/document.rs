//! XML document discovery on a legislature page.

use url::Url;

use super::{discover, fingerprint, resolve_url, Level};
use crate::model::{Document, Legislature, Resource};
use crate::ports::{ElementHandle, Page, PortError};

/// Marker that identifies links to XML datasets.
const XML_MARKER: &str = ".xml";

/// Filename used when nothing better can be resolved.
pub const FALLBACK_FILENAME: &str = "unknown.xml";

/// Document level: links whose href or title mentions `.xml`.
pub struct DocumentLevel<'a> {
    legislature: &'a Legislature,
    resource: &'a Resource,
}

impl<'a> DocumentLevel<'a> {
    /// Creates the level for `legislature`, owned by `resource`.
    #[must_use]
    pub fn new(legislature: &'a Legislature, resource: &'a Resource) -> Self {
        Self { legislature, resource }
    }
}

impl Level for DocumentLevel<'_> {
    type Item = Document;

    const NAME: &'static str = "documents";

    fn selector(&self) -> &str {
        "a"
    }

    fn matches(&self, element: &ElementHandle) -> bool {
        element.attribute_or_empty("href").contains(XML_MARKER)
            || element.attribute_or_empty("title").contains(XML_MARKER)
    }

    fn normalize(&self, element: &ElementHandle, base: &Url) -> Option<Document> {
        let url = resolve_url(base, element.attribute("href")?)?;
        let filename =
            resolve_filename(element.attribute("title"), Some(element.text_content.as_str()), &url);
        Some(Document {
            identifier: fingerprint(&element.outer_markup),
            url,
            filename,
            legislature_identifier: self.legislature.identifier.clone(),
            legislature_name: self.legislature.name.clone(),
            legislature_url: self.legislature.url.clone(),
            resource_identifier: self.resource.identifier.clone(),
            resource_name: self.resource.name.clone(),
            resource_title: self.resource.title.clone(),
            resource_url: self.resource.url.clone(),
        })
    }
}

/// Discovers the XML documents on the legislature page loaded in `page`.
///
/// # Errors
///
/// Returns an error if the element query fails.
pub async fn locate_documents(
    page: &dyn Page,
    legislature: &Legislature,
    resource: &Resource,
) -> Result<Vec<Document>, PortError> {
    discover(page, &legislature.url, &DocumentLevel::new(legislature, resource)).await
}

/// Picks a filename: title, then text, then last URL segment, then [`FALLBACK_FILENAME`].
#[must_use]
pub fn resolve_filename(title: Option<&str>, text: Option<&str>, url: &str) -> String {
    fn non_empty(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    non_empty(title)
        .or_else(|| non_empty(text))
        .map(String::from)
        .or_else(|| last_segment(url))
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

fn last_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    (!segment.is_empty()).then(|| segment.to_string())
}
