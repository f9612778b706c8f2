//! User-curated lists.

use scraper::Html;

use crate::client::RymClient;
use crate::collection::{EntryCollection, PageExtract};
use crate::error::Result;
use crate::extract;
use crate::models::simple::{SimpleRelease, SimpleUser};

/// A fully fetched user-curated list.
#[derive(Debug)]
pub struct RymList {
    pub title: Option<String>,
    pub author: Option<SimpleUser>,
    /// Stable list identifier, when the page exposes one.
    pub id: Option<String>,
    collection: EntryCollection<ListEntryRows>,
}

impl RymList {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        let collection = EntryCollection::from_document(&doc, url, ListEntryRows)?;
        Ok(Self {
            title: fetch_title(&doc),
            author: fetch_author(&doc),
            id: fetch_id(&doc),
            collection,
        })
    }

    /// Entries accumulated so far, in list order.
    pub fn entries(&self) -> &[SimpleRelease] {
        self.collection.entries()
    }

    /// Fetch the next page of the list, returning the new entries.
    pub fn load_more(&mut self, client: &RymClient) -> Result<&[SimpleRelease]> {
        self.collection.load_more(client)
    }

    pub fn current_page(&self) -> u32 {
        self.collection.current_page()
    }

    pub fn max_page(&self) -> u32 {
        self.collection.max_page()
    }
}

fn fetch_title(doc: &Html) -> Option<String> {
    let sel = extract::selector("h1");
    doc.select(&sel).next().and_then(extract::first_text)
}

fn fetch_author(doc: &Html) -> Option<SimpleUser> {
    let sel = extract::selector("a.user");
    let a = doc.select(&sel).next()?;
    Some(SimpleUser {
        name: extract::text_of(a).trim().to_string(),
        url: a.attr("href").map(extract::absolute_url),
    })
}

fn fetch_id(doc: &Html) -> Option<String> {
    let sel = extract::selector("input.list_id");
    doc.select(&sel)
        .next()
        .and_then(|el| el.attr("value"))
        .map(str::to_string)
        .filter(|id| !id.is_empty())
}

/// Rows of a list page.
#[derive(Debug)]
pub struct ListEntryRows;

impl PageExtract for ListEntryRows {
    type Entry = SimpleRelease;

    fn pager_selector(&self) -> &'static str {
        "a.navlinknum"
    }

    fn extract(&self, doc: &Html) -> Result<Vec<SimpleRelease>> {
        let row_sel = extract::selector("#user_list tr");
        let bold_sel = extract::selector("b");
        Ok(doc
            .select(&row_sel)
            .filter_map(|row| {
                let anchors = extract::anchors_of(row);
                let (title, url) = anchors.iter().find(|(text, _)| !text.is_empty())?.clone();
                let bolded = row.select(&bold_sel).next().is_some();
                Some(SimpleRelease {
                    title,
                    url: Some(url),
                    bolded: Some(bolded),
                    ..Default::default()
                })
            })
            .collect())
    }
}
