//! Legislature-term discovery on a resource page.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{accessible_name, discover, fingerprint, resolve_url, Level};
use crate::model::{Legislature, Resource};
use crate::ports::{ElementHandle, Page, PortError};

/// Title of a legislature folder link, e.g. `Pasta XVII Legislatura`.
static FOLDER_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Pasta [A-Z]+ Legislatura").expect("folder title pattern is valid")
});

/// Roman-numeral term code.
static TERM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[IVX]+\b").expect("term code pattern is valid"));

/// Legislature level: folder links, optionally collapsed or filtered by term.
pub struct LegislatureLevel<'a> {
    resource: &'a Resource,
    terms: &'a [String],
    current_only: bool,
}

impl<'a> LegislatureLevel<'a> {
    /// Creates the level for `resource`.
    ///
    /// `terms` are upper-cased term codes; `current_only` keeps the first
    /// folder only. The two are mutually exclusive and the caller rejects
    /// the combination.
    #[must_use]
    pub fn new(resource: &'a Resource, terms: &'a [String], current_only: bool) -> Self {
        Self { resource, terms, current_only }
    }
}

impl Level for LegislatureLevel<'_> {
    type Item = Legislature;

    const NAME: &'static str = "legislatures";

    fn selector(&self) -> &str {
        "a"
    }

    fn matches(&self, element: &ElementHandle) -> bool {
        FOLDER_TITLE.is_match(accessible_name(element))
    }

    fn normalize(&self, element: &ElementHandle, base: &Url) -> Option<Legislature> {
        let url = resolve_url(base, element.attribute("href")?)?;
        Some(Legislature {
            identifier: fingerprint(&element.outer_markup),
            url,
            name: accessible_name(element).to_string(),
            resource_identifier: self.resource.identifier.clone(),
        })
    }

    fn retain(&self, mut items: Vec<Legislature>) -> Vec<Legislature> {
        // Folders are listed most recent first.
        if self.current_only {
            items.truncate(1);
        }
        if !self.terms.is_empty() {
            items.retain(|legislature| {
                legislature.term_code().is_some_and(|code| {
                    self.terms.iter().any(|wanted| wanted.eq_ignore_ascii_case(code))
                })
            });
        }
        items
    }
}

/// Discovers the legislature folders on the resource page loaded in `page`.
///
/// # Errors
///
/// Returns an error if the element query fails.
pub async fn locate_legislatures(
    page: &dyn Page,
    resource: &Resource,
    terms: &[String],
    current_only: bool,
) -> Result<Vec<Legislature>, PortError> {
    discover(page, &resource.url, &LegislatureLevel::new(resource, terms, current_only)).await
}

/// Returns the Roman-numeral term code in a legislature name.
#[must_use]
pub fn term_code(name: &str) -> Option<&str> {
    TERM_CODE.find(name).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{anchor, ScriptedPage};
    use crate::ports::WaitUntil;

    const RESOURCE_URL: &str = "https://example.com/Cidadania/Paginas/DADeputados.aspx";

    fn resource() -> Resource {
        Resource {
            identifier: "res0000000001".into(),
            url: RESOURCE_URL.into(),
            title: "Deputados".into(),
            name: "Deputados".into(),
        }
    }

    async fn locate(terms: &[String], current_only: bool) -> Vec<Legislature> {
        let mut page = ScriptedPage::default();
        page.elements.insert(
            RESOURCE_URL.into(),
            vec![
                anchor(Some("/leg/XVII"), None, "Pasta XVII Legislatura"),
                anchor(Some("/leg/XVI"), Some("Pasta XVI Legislatura"), "XVI"),
                anchor(Some("/leg/other"), None, "Pasta de documentos"),
                anchor(Some("/leg/XV"), None, "Pasta XV Legislatura"),
                anchor(None, None, "Pasta XIV Legislatura"),
            ],
        );
        page.navigate(RESOURCE_URL, WaitUntil::NetworkIdle).await.unwrap();
        locate_legislatures(&page, &resource(), terms, current_only).await.unwrap()
    }

    #[tokio::test]
    async fn keeps_only_folder_links_with_href() {
        let legislatures = locate(&[], false).await;
        let names: Vec<&str> = legislatures.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Pasta XVII Legislatura", "Pasta XVI Legislatura", "Pasta XV Legislatura"]
        );
        assert!(legislatures.iter().all(|l| l.resource_identifier == "res0000000001"));
        assert_eq!(legislatures[0].url, "https://example.com/leg/XVII");
    }

    #[tokio::test]
    async fn current_only_keeps_first_folder() {
        let legislatures = locate(&[], true).await;
        assert_eq!(legislatures.len(), 1);
        assert_eq!(legislatures[0].name, "Pasta XVII Legislatura");
    }

    #[tokio::test]
    async fn term_filter_keeps_listed_codes() {
        let legislatures = locate(&["XV".to_string(), "XVII".to_string()], false).await;
        let codes: Vec<&str> = legislatures.iter().filter_map(Legislature::term_code).collect();
        assert_eq!(codes, vec!["XVII", "XV"]);
    }

    #[tokio::test]
    async fn term_filter_ignores_case() {
        let legislatures = locate(&["xvi".to_string()], false).await;
        assert_eq!(legislatures.len(), 1);
        assert_eq!(legislatures[0].name, "Pasta XVI Legislatura");
    }

    #[test]
    fn term_code_extraction() {
        assert_eq!(term_code("Pasta XVII Legislatura"), Some("XVII"));
        assert_eq!(term_code("Pasta de documentos"), None);
    }

    #[test]
    fn current_only_on_empty_stays_empty() {
        let resource = resource();
        let level = LegislatureLevel::new(&resource, &[], true);
        assert!(level.retain(Vec::new()).is_empty());
    }
}
