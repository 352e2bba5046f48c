//! Read access to pre-fetched web pages and documentation pages.
//!
//! Fetching is done elsewhere; here pages are only looked up by the URL
//! they were requested with. [`Pages`] wraps a [`PageStore`] so that store
//! failures read as "no page", which every caller treats as broken.

use std::path::Path;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRecord {
    /// The URL the page was requested with.
    pub start_url: String,
    /// The URL after redirects.
    pub final_url: String,
    pub content_type: String,
    pub title: String,
    pub content: String,
    pub license: String,
    pub language: String,
    pub broken: bool,
    /// Content came from a site-specific scraping rule rather than a
    /// generic extraction.
    pub scraped: bool,
}

impl PageRecord {
    /// HTML or XML content. Records without a content type count as HTML.
    pub fn is_html(&self) -> bool {
        let content_type = self.content_type.to_lowercase();
        content_type.is_empty()
            || content_type.contains("/html")
            || content_type.contains("/xhtml")
            || content_type.contains("/xml")
    }
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("page store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lookup of pre-fetched pages. Web pages and documentation pages live in
/// separate namespaces.
pub trait PageStore: Send + Sync {
    fn webpage(&self, url: &str) -> Result<Option<PageRecord>, PageError>;
    fn doc(&self, url: &str) -> Result<Option<PageRecord>, PageError>;
}

/// In-memory [`PageStore`], usually loaded from a JSON snapshot.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    webpages: DashMap<String, PageRecord>,
    docs: DashMap<String, PageRecord>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    webpages: Vec<PageRecord>,
    docs: Vec<PageRecord>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot of the form `{"webpages": [...], "docs": [...]}`.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, PageError> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        let store = Self::new();
        for page in snapshot.webpages {
            store.insert_webpage(page);
        }
        for page in snapshot.docs {
            store.insert_doc(page);
        }
        tracing::info!(
            webpages = store.webpages.len(),
            docs = store.docs.len(),
            "loaded page snapshot"
        );
        Ok(store)
    }

    pub fn insert_webpage(&self, page: PageRecord) {
        self.webpages.insert(Self::key(&page), page);
    }

    pub fn insert_doc(&self, page: PageRecord) {
        self.docs.insert(Self::key(&page), page);
    }

    pub fn len(&self) -> usize {
        self.webpages.len() + self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.webpages.is_empty() && self.docs.is_empty()
    }

    fn key(page: &PageRecord) -> String {
        if page.start_url.is_empty() {
            page.final_url.clone()
        } else {
            page.start_url.clone()
        }
    }
}

impl PageStore for MemoryPageStore {
    fn webpage(&self, url: &str) -> Result<Option<PageRecord>, PageError> {
        Ok(self.webpages.get(url).map(|p| p.value().clone()))
    }

    fn doc(&self, url: &str) -> Result<Option<PageRecord>, PageError> {
        Ok(self.docs.get(url).map(|p| p.value().clone()))
    }
}

/// Infallible view over a [`PageStore`].
#[derive(Clone, Copy)]
pub struct Pages<'a> {
    store: &'a dyn PageStore,
}

impl<'a> Pages<'a> {
    pub fn new(store: &'a dyn PageStore) -> Self {
        Self { store }
    }

    pub fn webpage(&self, url: &str) -> Option<PageRecord> {
        match self.store.webpage(url) {
            Ok(page) => {
                if page.is_none() {
                    tracing::trace!(url, "webpage not in store");
                }
                page
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "webpage lookup failed");
                None
            }
        }
    }

    pub fn doc(&self, url: &str) -> Option<PageRecord> {
        match self.store.doc(url) {
            Ok(page) => {
                if page.is_none() {
                    tracing::trace!(url, "doc not in store");
                }
                page
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "doc lookup failed");
                None
            }
        }
    }

    /// The web page, or failing that the doc page, for `url`.
    pub fn any(&self, url: &str) -> Option<PageRecord> {
        self.webpage(url).or_else(|| self.doc(url))
    }

    /// The page of a link of the given kind: documentation links are looked
    /// up among docs, everything else among web pages.
    pub fn for_kind(&self, url: &str, doc: bool) -> Option<PageRecord> {
        if doc { self.doc(url) } else { self.webpage(url) }
    }

    /// Neither a live web page nor a live doc page exists for `url`.
    pub fn is_broken(&self, url: &str) -> bool {
        let live = |page: Option<PageRecord>| page.is_some_and(|p| !p.broken);
        !live(self.webpage(url)) && !live(self.doc(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl PageStore for FailingStore {
        fn webpage(&self, _url: &str) -> Result<Option<PageRecord>, PageError> {
            Err(PageError::Unavailable("offline".to_string()))
        }

        fn doc(&self, _url: &str) -> Result<Option<PageRecord>, PageError> {
            Err(PageError::Unavailable("offline".to_string()))
        }
    }

    fn store() -> MemoryPageStore {
        MemoryPageStore::from_json(
            r#"{
                "webpages": [
                    {"start_url": "https://foobar.org", "final_url": "https://www.foobar.org/", "title": "FooBar"},
                    {"start_url": "https://dead.org", "broken": true}
                ],
                "docs": [
                    {"start_url": "https://foobar.org/manual", "content_type": "application/pdf"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_lookup() {
        let store = store();
        assert_eq!(store.len(), 3);
        let page = store.webpage("https://foobar.org").unwrap().unwrap();
        assert_eq!(page.final_url, "https://www.foobar.org/");
        assert!(page.is_html());
        assert!(store.webpage("https://foobar.org/manual").unwrap().is_none());
        assert!(!store.doc("https://foobar.org/manual").unwrap().unwrap().is_html());
    }

    #[test]
    fn test_broken() {
        let store = store();
        let pages = Pages::new(&store);
        assert!(!pages.is_broken("https://foobar.org"));
        assert!(!pages.is_broken("https://foobar.org/manual"));
        assert!(pages.is_broken("https://dead.org"));
        assert!(pages.is_broken("https://unknown.org"));
    }

    #[test]
    fn test_failing_store_reads_as_broken() {
        let store = FailingStore;
        let pages = Pages::new(&store);
        assert!(pages.webpage("https://foobar.org").is_none());
        assert!(pages.any("https://foobar.org").is_none());
        assert!(pages.is_broken("https://foobar.org"));
    }

    #[test]
    fn test_insert_populates_cache() {
        let store = MemoryPageStore::new();
        assert!(store.is_empty());
        store.insert_doc(PageRecord {
            final_url: "https://x.org/doc".to_string(),
            ..PageRecord::default()
        });
        assert!(store.doc("https://x.org/doc").unwrap().is_some());
    }
}
