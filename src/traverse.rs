//! Traversal orchestration: resources × legislatures × documents.
//!
//! One automation session and one page are held for a whole run and closed
//! before returning on every path. Only configuration, session start-up and
//! the portal root are fatal. A failing resource, legislature or document
//! is logged and skipped.

use std::path::Path;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::detect::ChangeDetector;
use crate::digest::DigestStore;
use crate::discover::{locate_documents, locate_legislatures, locate_resources, resolve_url};
use crate::error::MonitorError;
use crate::model::{ChangeRecord, Document, DocumentChangeResult, Legislature, Resource};
use crate::ports::{BrowserSession, Page, PortError, WaitUntil};

/// Log target of change notifications.
pub const NOTIFY_TARGET: &str = "parlwatch::notify";

/// Walks the whole portal and checks every discovered document.
///
/// Results come back in discovery order. A run where every branch failed
/// returns an empty list rather than an error.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidConfig`] before any navigation when the
/// configuration is rejected, [`MonitorError::SessionStart`] when no page can
/// be opened, and [`MonitorError::FatalDiscovery`] when the portal root cannot
/// be loaded or queried.
pub async fn detect_all_changes(
    ctx: &ServiceContext,
    config: &RunConfig,
) -> Result<Vec<DocumentChangeResult>, MonitorError> {
    config.validate()?;
    let session = open_session(ctx).await?;
    let outcome = match session.new_page().await {
        Ok(page) => walk(ctx, config, page.as_ref()).await,
        Err(e) => Err(MonitorError::SessionStart(e.to_string())),
    };
    close_session(session.as_ref()).await;
    outcome
}

/// Checks the single document linked by the first element matching
/// `selector` on `page_url`, against `<data_dir>/xml_hash.txt`.
///
/// # Errors
///
/// Returns [`MonitorError::SelectorMismatch`] when nothing matches,
/// [`MonitorError::MissingHref`] when the match has no usable link, and the
/// detector's errors otherwise.
pub async fn detect_single(
    ctx: &ServiceContext,
    page_url: &str,
    selector: &str,
    data_dir: &Path,
) -> Result<ChangeRecord, MonitorError> {
    let base = Url::parse(page_url)
        .map_err(|e| MonitorError::InvalidConfig(format!("page URL {page_url:?} is not valid: {e}")))?;
    let session = open_session(ctx).await?;
    let outcome = match session.new_page().await {
        Ok(page) => lookup(ctx, page.as_ref(), &base, selector, data_dir).await,
        Err(e) => Err(MonitorError::SessionStart(e.to_string())),
    };
    close_session(session.as_ref()).await;
    outcome
}

async fn open_session(ctx: &ServiceContext) -> Result<Box<dyn BrowserSession>, MonitorError> {
    ctx.browser.launch().await.map_err(|e| MonitorError::SessionStart(e.to_string()))
}

async fn close_session(session: &dyn BrowserSession) {
    if let Err(e) = session.close().await {
        warn!("failed to close automation session: {e}");
    }
}

async fn walk(
    ctx: &ServiceContext,
    config: &RunConfig,
    page: &dyn Page,
) -> Result<Vec<DocumentChangeResult>, MonitorError> {
    let root = config.portal_url.as_str();
    let fatal = |e: PortError| MonitorError::FatalDiscovery { url: root.to_string(), reason: e.to_string() };

    page.navigate(root, WaitUntil::NetworkIdle).await.map_err(fatal)?;
    let resources = locate_resources(page, root, &config.resources).await.map_err(fatal)?;
    info!(count = resources.len(), "resources discovered");

    let store = DigestStore::new(ctx.fs.as_ref(), &config.data_dir);
    let detector = ChangeDetector::new(page, &store, ctx.clock.as_ref());
    let mut results = Vec::new();

    for resource in &resources {
        let legislatures = match legislatures_of(page, resource, config).await {
            Ok(legislatures) => legislatures,
            Err(e) => {
                warn!(resource = %resource.name, "{e}");
                continue;
            }
        };

        for legislature in &legislatures {
            let documents = match documents_of(page, legislature, resource).await {
                Ok(documents) => documents,
                Err(e) => {
                    warn!(resource = %resource.name, legislature = %legislature.name, "{e}");
                    continue;
                }
            };

            for document in documents {
                match detector.detect(&document).await {
                    Ok(change) => {
                        notify(&document, &change);
                        results.push(DocumentChangeResult { document, change });
                    }
                    Err(e) => warn!(resource = %resource.name, filename = %document.filename, "{e}"),
                }
            }
        }
    }

    info!(checked = results.len(), "traversal finished");
    Ok(results)
}

async fn legislatures_of(
    page: &dyn Page,
    resource: &Resource,
    config: &RunConfig,
) -> Result<Vec<Legislature>, MonitorError> {
    let branch = |e: PortError| MonitorError::Branch {
        level: "legislatures",
        url: resource.url.clone(),
        reason: e.to_string(),
    };
    page.navigate(&resource.url, WaitUntil::NetworkIdle).await.map_err(branch)?;
    locate_legislatures(page, resource, &config.legislatures, config.current_only)
        .await
        .map_err(branch)
}

async fn documents_of(
    page: &dyn Page,
    legislature: &Legislature,
    resource: &Resource,
) -> Result<Vec<Document>, MonitorError> {
    let branch = |e: PortError| MonitorError::Branch {
        level: "documents",
        url: legislature.url.clone(),
        reason: e.to_string(),
    };
    page.navigate(&legislature.url, WaitUntil::NetworkIdle).await.map_err(branch)?;
    locate_documents(page, legislature, resource).await.map_err(branch)
}

async fn lookup(
    ctx: &ServiceContext,
    page: &dyn Page,
    base: &Url,
    selector: &str,
    data_dir: &Path,
) -> Result<ChangeRecord, MonitorError> {
    let fatal =
        |e: PortError| MonitorError::FatalDiscovery { url: base.to_string(), reason: e.to_string() };
    page.navigate(base.as_str(), WaitUntil::NetworkIdle).await.map_err(fatal)?;

    let element = page
        .query(selector)
        .await
        .map_err(fatal)?
        .into_iter()
        .next()
        .ok_or_else(|| MonitorError::SelectorMismatch { selector: selector.to_string() })?;
    let url = element
        .attribute("href")
        .and_then(|href| resolve_url(base, href))
        .ok_or_else(|| MonitorError::MissingHref { selector: selector.to_string() })?;
    debug!(%url, "single document located");

    let store = DigestStore::new(ctx.fs.as_ref(), data_dir);
    let detector = ChangeDetector::new(page, &store, ctx.clock.as_ref());
    detector.check(&url, &store.single_path()).await
}

/// Notification hook: the point where alerts would be delivered.
fn notify(document: &Document, change: &ChangeRecord) {
    if !change.has_changed {
        return;
    }
    if change.is_first_observation() {
        info!(
            target: NOTIFY_TARGET,
            resource = %document.resource_name,
            legislature = %document.legislature_name,
            url = %document.url,
            "first observation"
        );
    } else {
        info!(
            target: NOTIFY_TARGET,
            resource = %document.resource_name,
            legislature = %document.legislature_name,
            url = %document.url,
            previous = change.previous_digest.as_deref().unwrap_or_default(),
            current = %change.current_digest,
            "content changed"
        );
    }
}
