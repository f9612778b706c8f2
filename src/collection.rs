//! Generic paginated collections.
//!
//! Chart pages, a release's lists and reviews, genre release listings,
//! and user lists all speak one pagination protocol: fetch page 1
//! eagerly, read the maximum page number off the last pagination
//! control, then grow the entry set one page at a time. The
//! per-collection differences (row markup, pager markup) live behind
//! [`PageExtract`].

use std::fmt;

use scraper::Html;
use tracing::debug;

use crate::client::RymClient;
use crate::error::{Result, RymError};
use crate::extract;

/// Entity-specific row extraction over the shared pagination protocol.
pub trait PageExtract {
    /// Entry type produced from each page.
    type Entry;

    /// CSS selector matching this page kind's pagination controls.
    fn pager_selector(&self) -> &'static str;

    /// Extract this page kind's rows from a fetched document.
    fn extract(&self, doc: &Html) -> Result<Vec<Self::Entry>>;
}

/// A paginated collection with monotonically accumulating entries.
///
/// There is no transition to an arbitrary page and no way back; entries
/// only accumulate, in the order the pages produced them.
pub struct EntryCollection<X: PageExtract> {
    extractor: X,
    init_url: String,
    current_url: String,
    current_page: u32,
    max_page: u32,
    entries: Vec<X::Entry>,
}

impl<X: PageExtract> EntryCollection<X> {
    /// Fetch page 1 and build the collection.
    pub(crate) fn fetch(client: &RymClient, url: &str, extractor: X) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url, extractor)
    }

    /// Build the collection from an already-fetched first page.
    pub(crate) fn from_document(doc: &Html, url: &str, extractor: X) -> Result<Self> {
        let max_page = max_page_number(doc, extractor.pager_selector());
        if max_page == 0 {
            return Err(RymError::NoContent(format!("{url} has no entries")));
        }
        let entries = extractor.extract(doc)?;
        debug!(url, max_page, rows = entries.len(), "collection initialized");
        Ok(Self {
            extractor,
            init_url: url.to_string(),
            current_url: url.to_string(),
            current_page: 1,
            max_page,
            entries,
        })
    }

    /// Entries accumulated so far, in page order.
    pub fn entries(&self) -> &[X::Entry] {
        &self.entries
    }

    /// Page most recently loaded.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Highest page number the pagination controls advertised.
    pub fn max_page(&self) -> u32 {
        self.max_page
    }

    /// URL the collection was created from.
    pub fn init_url(&self) -> &str {
        &self.init_url
    }

    /// Fetch the next page and append its rows, returning the new slice.
    ///
    /// Fails with [`RymError::NoContent`] before performing any fetch
    /// when the last known page has already been loaded; the collection
    /// is left untouched on any failure.
    pub fn load_more(&mut self, client: &RymClient) -> Result<&[X::Entry]> {
        if self.current_page >= self.max_page {
            return Err(RymError::NoContent("no more pages to be loaded".into()));
        }
        let next_page = self.current_page + 1;
        let next_url = extract::rewrite_page_number(&self.current_url, next_page);
        let doc = client.fetch_document(&next_url)?;
        let fresh = self.extractor.extract(&doc)?;
        debug!(page = next_page, rows = fresh.len(), "loaded collection page");
        self.current_page = next_page;
        self.current_url = next_url;
        let start = self.entries.len();
        self.entries.extend(fresh);
        Ok(&self.entries[start..])
    }
}

impl<X: PageExtract> fmt::Debug for EntryCollection<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryCollection")
            .field("init_url", &self.init_url)
            .field("current_page", &self.current_page)
            .field("max_page", &self.max_page)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Read the page count off the last pagination control (0 when absent).
fn max_page_number(doc: &Html, pager_selector: &str) -> u32 {
    let sel = extract::selector(pager_selector);
    doc.select(&sel)
        .last()
        .and_then(|el| extract::text_of(el).trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Numbers;

    impl PageExtract for Numbers {
        type Entry = u32;

        fn pager_selector(&self) -> &'static str {
            "a.navlinknum"
        }

        fn extract(&self, doc: &Html) -> Result<Vec<u32>> {
            let sel = extract::selector("li.num");
            Ok(doc
                .select(&sel)
                .filter_map(|el| extract::text_of(el).trim().parse().ok())
                .collect())
        }
    }

    const PAGE_ONE: &str = r#"
        <html><body>
            <ul><li class="num">1</li><li class="num">2</li></ul>
            <a class="navlinknum" href="/x/1/">1</a>
            <a class="navlinknum" href="/x/2/">2</a>
            <a class="navlinknum" href="/x/3/">3</a>
        </body></html>
    "#;

    #[test]
    fn test_first_page_eagerly_extracted() {
        let doc = Html::parse_document(PAGE_ONE);
        let collection =
            EntryCollection::from_document(&doc, "https://rateyourmusic.com/x/1/", Numbers).unwrap();
        assert_eq!(collection.entries(), &[1, 2]);
        assert_eq!(collection.current_page(), 1);
        assert_eq!(collection.max_page(), 3);
    }

    #[test]
    fn test_no_pagination_controls_is_no_content() {
        let doc = Html::parse_document("<html><body><ul></ul></body></html>");
        let result = EntryCollection::from_document(&doc, "https://rateyourmusic.com/x/1/", Numbers);
        assert!(matches!(result, Err(RymError::NoContent(_))));
    }

    #[test]
    fn test_load_more_at_max_page_fails_without_fetch() {
        const LAST_PAGE: &str = r#"
            <html><body>
                <ul><li class="num">9</li></ul>
                <a class="navlinknum" href="/x/1/">1</a>
            </body></html>
        "#;
        let doc = Html::parse_document(LAST_PAGE);
        let mut collection =
            EntryCollection::from_document(&doc, "https://rateyourmusic.com/x/1/", Numbers).unwrap();

        // current_page == max_page: refused before any request goes out,
        // and the collection state stays untouched.
        let client = RymClient::new();
        let result = collection.load_more(&client);
        assert!(matches!(result, Err(RymError::NoContent(_))));
        assert_eq!(collection.entries(), &[9]);
        assert_eq!(collection.current_page(), 1);
    }

    #[test]
    fn test_max_page_from_last_control() {
        let doc = Html::parse_document(PAGE_ONE);
        assert_eq!(max_page_number(&doc, "a.navlinknum"), 3);
        assert_eq!(max_page_number(&doc, "a.ui_pagination_number"), 0);
    }
}
