//! Resource discovery on the portal root page.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{discover, fingerprint, resolve_url, Level};
use crate::model::Resource;
use crate::ports::{ElementHandle, Page, PortError};

/// Accessible title carried by every resource link on the portal root.
pub const RESOURCE_MARKER: &str = "Recursos";

/// Final path segment naming convention of resource pages: `DA<Name>.aspx`.
static RESOURCE_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^DA([[:alnum:]]+)\.(?i:aspx)$").expect("resource page pattern is valid")
});

/// Resource level: links titled [`RESOURCE_MARKER`], filtered by name.
pub struct ResourceLevel<'a> {
    selector: String,
    allow: &'a [String],
}

impl<'a> ResourceLevel<'a> {
    /// Creates the level with an optional allow-list of resource names.
    #[must_use]
    pub fn new(allow: &'a [String]) -> Self {
        Self { selector: format!("a[title=\"{RESOURCE_MARKER}\"]"), allow }
    }

    /// Only links following the `DA<Name>.aspx` convention can be allowed;
    /// the link-text fallback name never passes a non-empty allow-list.
    fn allows(&self, resource: &Resource) -> bool {
        resource_name_from_url(&resource.url).is_some_and(|name| {
            self.allow.iter().any(|wanted| wanted.eq_ignore_ascii_case(&name))
        })
    }
}

impl Level for ResourceLevel<'_> {
    type Item = Resource;

    const NAME: &'static str = "resources";

    fn selector(&self) -> &str {
        &self.selector
    }

    fn matches(&self, element: &ElementHandle) -> bool {
        element.attribute("title").map(str::trim) == Some(RESOURCE_MARKER)
    }

    fn normalize(&self, element: &ElementHandle, base: &Url) -> Option<Resource> {
        let url = resolve_url(base, element.attribute("href")?)?;
        let title = match element.text() {
            "" => RESOURCE_MARKER.to_string(),
            text => text.to_string(),
        };
        let name = resource_name_from_url(&url).unwrap_or_else(|| title.clone());
        Some(Resource { identifier: fingerprint(&element.outer_markup), url, title, name })
    }

    fn retain(&self, items: Vec<Resource>) -> Vec<Resource> {
        if self.allow.is_empty() {
            return items;
        }
        items.into_iter().filter(|resource| self.allows(resource)).collect()
    }
}

/// Discovers the resources linked from the portal root loaded in `page`.
///
/// # Errors
///
/// Returns an error if the element query fails.
pub async fn locate_resources(
    page: &dyn Page,
    root_url: &str,
    allow: &[String],
) -> Result<Vec<Resource>, PortError> {
    discover(page, root_url, &ResourceLevel::new(allow)).await
}

/// Extracts `<Name>` from a URL whose last path segment is `DA<Name>.aspx`.
#[must_use]
pub fn resource_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    RESOURCE_PAGE.captures(segment).map(|caps| caps[1].to_string())
}
