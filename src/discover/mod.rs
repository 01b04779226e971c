//! Hierarchical discovery: portal root → resources → legislatures → documents.
//!
//! All three levels follow the same shape: query candidate elements, keep
//! the ones the level recognises, normalize each into an entity, then apply
//! the level's list filter. [`discover`] runs that shape for any [`Level`].

pub mod document;
pub mod legislature;
pub mod resource;

use tracing::{debug, trace};
use url::Url;

use crate::digest::sha256_hex;
use crate::ports::{ElementHandle, Page, PortError};

pub use document::{locate_documents, resolve_filename, DocumentLevel};
pub use legislature::{locate_legislatures, LegislatureLevel};
pub use resource::{locate_resources, ResourceLevel};

/// Number of hex characters kept from the markup digest.
const IDENTIFIER_LEN: usize = 12;

/// One level of the site hierarchy.
pub trait Level {
    /// Entity produced at this level.
    type Item;

    /// Short label used in logs.
    const NAME: &'static str;

    /// CSS selector for candidate elements.
    fn selector(&self) -> &str;

    /// Returns `true` for candidates this level recognises.
    fn matches(&self, element: &ElementHandle) -> bool;

    /// Builds an entity from a recognised element; `None` skips it.
    fn normalize(&self, element: &ElementHandle, base: &Url) -> Option<Self::Item>;

    /// Filters the normalized list. Keeps everything by default.
    fn retain(&self, items: Vec<Self::Item>) -> Vec<Self::Item> {
        items
    }
}

/// Discovers the children of the page currently loaded in `page`.
///
/// `page_url` is the base for resolving relative links.
///
/// # Errors
///
/// Returns an error if the element query fails or `page_url` is not a valid URL.
pub async fn discover<L: Level>(
    page: &dyn Page,
    page_url: &str,
    level: &L,
) -> Result<Vec<L::Item>, PortError> {
    let base = Url::parse(page_url).map_err(|e| format!("invalid page URL {page_url}: {e}"))?;
    let candidates = page.query(level.selector()).await?;
    let total = candidates.len();

    let items: Vec<L::Item> = candidates
        .iter()
        .filter(|element| level.matches(element))
        .filter_map(|element| {
            let item = level.normalize(element, &base);
            if item.is_none() {
                trace!(level = L::NAME, markup = %element.outer_markup, "skipping unresolvable link");
            }
            item
        })
        .collect();
    let matched = items.len();
    let kept = level.retain(items);

    debug!(level = L::NAME, url = page_url, total, matched, kept = kept.len(), "discovered");
    Ok(kept)
}

/// Stable short identifier derived from an element's full markup.
///
/// Identical markup always yields the same identifier, so the same link is
/// recognised across runs. Any change to the markup mints a new identifier.
#[must_use]
pub fn fingerprint(markup: &str) -> String {
    let mut digest = sha256_hex(markup);
    digest.truncate(IDENTIFIER_LEN);
    digest
}

/// Resolves `href` against `base`; absolute links are returned unchanged.
#[must_use]
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

/// Accessible name of a link: its title attribute, else its text.
fn accessible_name(element: &ElementHandle) -> &str {
    match element.attribute("title").map(str::trim) {
        Some(title) if !title.is_empty() => title,
        _ => element.text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic_and_short() {
        let markup = r#"<a href="/DADeputados.aspx" title="Recursos">Deputados</a>"#;
        let first = fingerprint(markup);
        assert_eq!(first, fingerprint(markup));
        assert_eq!(first.len(), IDENTIFIER_LEN);
        assert_ne!(first, fingerprint(&markup.replace("Deputados<", "Sessoes<")));
    }

    #[test]
    fn resolve_url_handles_relative_and_absolute() {
        let base = Url::parse("https://www.parlamento.pt/Cidadania/paginas/dadosabertos.aspx").unwrap();
        assert_eq!(
            resolve_url(&base, "/Cidadania/Paginas/DADeputados.aspx").as_deref(),
            Some("https://www.parlamento.pt/Cidadania/Paginas/DADeputados.aspx")
        );
        assert_eq!(
            resolve_url(&base, "https://app.parlamento.pt/a.xml").as_deref(),
            Some("https://app.parlamento.pt/a.xml")
        );
        assert_eq!(resolve_url(&base, "   "), None);
    }

    #[test]
    fn accessible_name_prefers_title() {
        let titled = crate::testing::anchor(Some("/x"), Some("Pasta XV Legislatura"), "XV");
        let untitled = crate::testing::anchor(Some("/x"), None, " Pasta XVI Legislatura ");
        assert_eq!(accessible_name(&titled), "Pasta XV Legislatura");
        assert_eq!(accessible_name(&untitled), "Pasta XVI Legislatura");
    }
}
