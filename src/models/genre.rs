//! Genre pages: descriptions, hierarchy, charts and release listings.

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::{RymClient, ROOT_URL};
use crate::collection::{EntryCollection, PageExtract};
use crate::error::{Result, RymError};
use crate::extract;
use crate::models::chart::{Chart, ChartParams, ChartType};
use crate::models::common::YearRange;
use crate::models::simple::{SimpleArtist, SimpleGenre, SimpleList, SimpleRelease, SimpleUser};

/// A fully fetched genre page.
#[derive(Debug, Serialize, Deserialize)]
pub struct Genre {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternative names for the genre.
    pub akas: Vec<String>,
    pub parent_genres: Vec<SimpleGenre>,
    pub children_genres: Vec<SimpleGenre>,
    /// The carousel of the genre's ten highest-rated releases.
    pub top_ten_albums: Vec<SimpleRelease>,
    /// Curated lists associated with the genre.
    pub lists: Vec<SimpleList>,
    /// URL slug, kept for building release listings.
    url_name: String,
    #[serde(skip)]
    top_chart: Option<Chart>,
    #[serde(skip)]
    bottom_chart: Option<Chart>,
    #[serde(skip)]
    esoteric_chart: Option<Chart>,
    #[serde(skip)]
    oldest_releases: Option<GenreReleases>,
    #[serde(skip)]
    newest_releases: Option<GenreReleases>,
}

/// A genre's release listing, one page at a time.
pub type GenreReleases = EntryCollection<GenreReleaseRows>;

impl Genre {
    /// Canonical page URL for a genre name.
    pub(crate) fn url_for_name(name: &str) -> String {
        format!("{ROOT_URL}/genre/{}/", extract::slug(name))
    }

    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url)
    }

    pub(crate) fn from_document(doc: &Html, url: &str) -> Result<Self> {
        let url_name = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            url: url.to_string(),
            name: fetch_name(doc)?,
            short_description: fetch_short_description(doc),
            description: fetch_description(doc),
            akas: fetch_akas(doc),
            parent_genres: fetch_parent_genres(doc),
            children_genres: fetch_children_genres(doc),
            top_ten_albums: fetch_top_ten(doc),
            lists: fetch_lists(doc),
            url_name,
            top_chart: None,
            bottom_chart: None,
            esoteric_chart: None,
            oldest_releases: None,
            newest_releases: None,
        })
    }

    /// Chart of the genre's best-rated albums. Built on first access.
    pub fn top_chart(&mut self, client: &RymClient) -> Result<&mut Chart> {
        if self.top_chart.is_none() {
            self.top_chart = Some(self.build_chart(client, ChartType::Top, None)?);
        }
        Ok(self.top_chart.as_mut().expect("populated above"))
    }

    /// Chart of the genre's worst-rated albums. Built on first access.
    pub fn bottom_chart(&mut self, client: &RymClient) -> Result<&mut Chart> {
        if self.bottom_chart.is_none() {
            self.bottom_chart = Some(self.build_chart(client, ChartType::Bottom, None)?);
        }
        Ok(self.bottom_chart.as_mut().expect("populated above"))
    }

    /// Chart of the genre's esoteric picks. Built on first access.
    pub fn esoteric_chart(&mut self, client: &RymClient) -> Result<&mut Chart> {
        if self.esoteric_chart.is_none() {
            self.esoteric_chart = Some(self.build_chart(client, ChartType::Esoteric, None)?);
        }
        Ok(self.esoteric_chart.as_mut().expect("populated above"))
    }

    /// Build a custom chart scoped to this genre.
    pub fn chart(
        &self,
        client: &RymClient,
        chart_type: ChartType,
        year_range: Option<YearRange>,
    ) -> Result<Chart> {
        self.build_chart(client, chart_type, year_range)
    }

    fn build_chart(
        &self,
        client: &RymClient,
        chart_type: ChartType,
        year_range: Option<YearRange>,
    ) -> Result<Chart> {
        let mut params = ChartParams::new(chart_type).with_genre(self.name.clone());
        params.year_range = year_range;
        client.chart(params)
    }

    /// The genre's releases, oldest first. Fetched on first access.
    pub fn oldest_releases(&mut self, client: &RymClient) -> Result<&mut GenreReleases> {
        if self.oldest_releases.is_none() {
            let url = format!("{ROOT_URL}/genres/{}/1/", self.url_name);
            self.oldest_releases = Some(EntryCollection::fetch(client, &url, GenreReleaseRows)?);
        }
        Ok(self.oldest_releases.as_mut().expect("populated above"))
    }

    /// The genre's releases, newest first. Fetched on first access.
    pub fn newest_releases(&mut self, client: &RymClient) -> Result<&mut GenreReleases> {
        if self.newest_releases.is_none() {
            let url = format!("{ROOT_URL}/genres/{}/1.d/", self.url_name);
            self.newest_releases = Some(EntryCollection::fetch(client, &url, GenreReleaseRows)?);
        }
        Ok(self.newest_releases.as_mut().expect("populated above"))
    }
}

fn fetch_name(doc: &Html) -> Result<String> {
    let sel = extract::selector("#page_genre_section_name");
    doc.select(&sel)
        .next()
        .and_then(extract::first_child_element)
        .map(|el| extract::text_of(el).trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| RymError::Parse("No genre name was found".into()))
}

fn fetch_short_description(doc: &Html) -> Option<String> {
    let sel = extract::selector("#page_genre_description_short");
    let text = extract::text_of(doc.select(&sel).next()?);
    let cleaned = text.replace("Read more", "").trim().to_string();
    Some(cleaned).filter(|t| !t.is_empty())
}

fn fetch_description(doc: &Html) -> Option<String> {
    let sel = extract::selector("#page_genre_description_full");
    let text = extract::text_of(doc.select(&sel).next()?).trim().to_string();
    Some(text).filter(|t| !t.is_empty())
}

fn fetch_akas(doc: &Html) -> Vec<String> {
    let sel = extract::selector("bdi.comma_separated");
    doc.select(&sel)
        .map(|el| extract::text_of(el).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn fetch_parent_genres(doc: &Html) -> Vec<SimpleGenre> {
    let row_sel = extract::selector("li.hierarchy_list_item.parent");
    let anchor_sel = extract::selector("a[href]");
    doc.select(&row_sel)
        .filter_map(|li| {
            let a = li.select(&anchor_sel).next()?;
            Some(SimpleGenre {
                name: extract::text_of(a).trim().to_string(),
                url: a.attr("href").map(extract::absolute_url),
            })
        })
        .collect()
}

fn fetch_children_genres(doc: &Html) -> Vec<SimpleGenre> {
    let current_sel = extract::selector("li.hierarchy_list_item.hierarchy_list_item_current");
    let Some(current) = doc.select(&current_sel).next() else {
        return Vec::new();
    };
    let Some(children_list) = extract::next_sibling_element(current) else {
        return Vec::new();
    };
    let item_sel = extract::selector("li");
    let anchor_sel = extract::selector("a[href]");
    children_list
        .select(&item_sel)
        .filter_map(|li| {
            let a = li.select(&anchor_sel).next()?;
            Some(SimpleGenre {
                name: extract::text_of(a).trim().to_string(),
                url: a.attr("href").map(extract::absolute_url),
            })
        })
        .collect()
}

fn fetch_top_ten(doc: &Html) -> Vec<SimpleRelease> {
    let item_sel = extract::selector(".page_section_charts_carousel_item");
    let release_sel = extract::selector(".release");
    let artist_sel = extract::selector(".artist");
    let anchor_sel = extract::selector("a[href]");
    doc.select(&item_sel)
        .filter_map(|item| {
            let title = item.select(&release_sel).next().and_then(extract::first_text)?;
            let artist_name = item.select(&artist_sel).next().and_then(extract::first_text);
            let anchor = item.select(&anchor_sel).next();
            let url = anchor.and_then(|a| a.attr("href")).map(extract::absolute_url);
            let cover = anchor.and_then(cover_from_anchor);
            Some(SimpleRelease {
                title,
                url,
                artist_name,
                cover,
                ..Default::default()
            })
        })
        .collect()
}

/// Cover URL from a carousel anchor's `<picture>` source set.
fn cover_from_anchor(anchor: scraper::ElementRef<'_>) -> Option<String> {
    let source_sel = extract::selector("picture source");
    let source = anchor.select(&source_sel).next()?;
    let srcset = source.attr("srcset").or_else(|| source.attr("data-srcset"))?;
    let cleaned = srcset.replace('\n', "");
    let first = cleaned.trim().split(" 2x").next()?.trim().to_string();
    Some(first).filter(|s| !s.is_empty())
}

fn fetch_lists(doc: &Html) -> Vec<SimpleList> {
    let item_sel = extract::selector(".page_section_lists_list");
    let main_sel = extract::selector(".main");
    let main_anchor_sel = extract::selector(".main a[href]");
    let user_sel = extract::selector("a.user");
    doc.select(&item_sel)
        .filter_map(|item| {
            let title = item.select(&main_sel).next().and_then(extract::first_text)?;
            let url = item
                .select(&main_anchor_sel)
                .next()
                .and_then(|a| a.attr("href"))
                .map(extract::absolute_url);
            let author = item.select(&user_sel).next().map(|a| SimpleUser {
                name: extract::text_of(a).trim().to_string(),
                url: a.attr("href").map(extract::absolute_url),
            });
            Some(SimpleList { title, url, author })
        })
        .collect()
}

/// Rows of a genre's release listing pages.
#[derive(Debug)]
pub struct GenreReleaseRows;

impl PageExtract for GenreReleaseRows {
    type Entry = SimpleRelease;

    fn pager_selector(&self) -> &'static str {
        "a.ui_pagination_btn.ui_pagination_number"
    }

    fn extract(&self, doc: &Html) -> Result<Vec<SimpleRelease>> {
        let row_sel = extract::selector(".component_discography_item");
        let title_sel = extract::selector("span.release");
        let artist_sel = extract::selector(".artist");
        let anchor_sel = extract::selector("a[href]");
        Ok(doc
            .select(&row_sel)
            .filter_map(|row| {
                let title = row.select(&title_sel).next().and_then(extract::first_text)?;
                let anchor = row.select(&anchor_sel).next();
                let url = anchor.and_then(|a| a.attr("href")).map(extract::absolute_url);
                let cover = anchor.and_then(cover_from_anchor);
                let artists: Vec<SimpleArtist> = row
                    .select(&artist_sel)
                    .filter_map(|a| {
                        Some(SimpleArtist::new(
                            extract::text_of(a).trim().to_string(),
                            Some(extract::absolute_url(a.attr("href")?)),
                        ))
                    })
                    .collect();
                let artist_name = artists.first().map(|a| a.name.clone());
                Some(SimpleRelease {
                    title,
                    url,
                    artist_name,
                    artists: Some(artists).filter(|a| !a.is_empty()),
                    cover,
                    ..Default::default()
                })
            })
            .collect())
    }
}
