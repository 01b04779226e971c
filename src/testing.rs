//! Port fakes shared by unit tests: an in-memory filesystem, a frozen
//! clock and a scripted browser.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::ports::{
    Browser, BrowserSession, Clock, ElementHandle, FileSystem, Page, PageResponse, PortError,
    PortFuture, WaitUntil,
};

/// In-memory filesystem keyed by path.
#[derive(Default)]
pub struct MemFs {
    pub files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFs {
    /// Returns the contents stored at `path`.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.get(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn remove_file(&self, path: &Path) -> Result<(), PortError> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }
}

/// Clock frozen at a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2025, 3, 15, 14, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds an anchor handle with the given attributes and text.
pub fn anchor(href: Option<&str>, title: Option<&str>, text: &str) -> ElementHandle {
    let mut attributes = BTreeMap::new();
    let mut markup = String::from("<a");
    if let Some(href) = href {
        attributes.insert("href".to_string(), href.to_string());
        markup.push_str(&format!(" href=\"{href}\""));
    }
    if let Some(title) = title {
        attributes.insert("title".to_string(), title.to_string());
        markup.push_str(&format!(" title=\"{title}\""));
    }
    markup.push_str(&format!(">{text}</a>"));
    ElementHandle { attributes, text_content: text.to_string(), outer_markup: markup }
}

/// Scripted page: per-URL element lists and bodies, with optional failures.
#[derive(Default)]
pub struct ScriptedPage {
    /// Elements returned for queries while the URL is loaded.
    pub elements: HashMap<String, Vec<ElementHandle>>,
    /// Bodies returned by navigation.
    pub bodies: HashMap<String, String>,
    /// URLs whose navigation fails.
    pub failing_navigation: Vec<String>,
    /// URLs whose element query fails.
    pub failing_query: Vec<String>,
    /// URLs whose navigation resolves without a response.
    pub no_response: Vec<String>,
    /// URL currently loaded.
    pub current: Mutex<Option<String>>,
    /// Every navigation, in order.
    pub visited: Mutex<VecDeque<String>>,
}

impl Page for ScriptedPage {
    fn navigate(&self, url: &str, _wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>> {
        let url = url.to_string();
        Box::pin(async move {
            self.visited.lock().unwrap().push_back(url.clone());
            if self.failing_navigation.contains(&url) {
                return Err(format!("navigation to {url} failed").into());
            }
            *self.current.lock().unwrap() = Some(url.clone());
            if self.no_response.contains(&url) {
                return Ok(None);
            }
            Ok(Some(PageResponse { body: self.bodies.get(&url).cloned(), url, status: 200 }))
        })
    }

    fn query(&self, _selector: &str) -> PortFuture<'_, Vec<ElementHandle>> {
        Box::pin(async move {
            let current = self.current.lock().unwrap().clone().ok_or("no page loaded")?;
            if self.failing_query.contains(&current) {
                return Err(format!("query on {current} failed").into());
            }
            Ok(self.elements.get(&current).cloned().unwrap_or_default())
        })
    }
}

/// Browser handing out one shared [`ScriptedPage`] and tracking shutdown.
#[derive(Clone, Default)]
pub struct ScriptedBrowser {
    /// Page served to every session.
    pub page: Arc<ScriptedPage>,
    /// Set once a session is closed.
    pub closed: Arc<AtomicBool>,
    /// Makes `launch` fail.
    pub fail_launch: bool,
}

impl ScriptedBrowser {
    /// Wraps a scripted page.
    pub fn new(page: ScriptedPage) -> Self {
        Self { page: Arc::new(page), ..Self::default() }
    }

    /// Returns `true` once the session was closed.
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct SharedPage(Arc<ScriptedPage>);

impl Page for SharedPage {
    fn navigate(&self, url: &str, wait: WaitUntil) -> PortFuture<'_, Option<PageResponse>> {
        self.0.navigate(url, wait)
    }

    fn query(&self, selector: &str) -> PortFuture<'_, Vec<ElementHandle>> {
        self.0.query(selector)
    }
}

impl Browser for ScriptedBrowser {
    fn launch(&self) -> PortFuture<'_, Box<dyn BrowserSession>> {
        Box::pin(async move {
            if self.fail_launch {
                return Err("Browser launch failed".into());
            }
            Ok(Box::new(self.clone()) as Box<dyn BrowserSession>)
        })
    }
}

impl BrowserSession for ScriptedBrowser {
    fn new_page(&self) -> PortFuture<'_, Box<dyn Page>> {
        let page = Arc::clone(&self.page);
        Box::pin(async move { Ok(Box::new(SharedPage(page)) as Box<dyn Page>) })
    }

    fn close(&self) -> PortFuture<'_, ()> {
        self.closed.store(true, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }
}
