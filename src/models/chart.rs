//! Charts: filtered, paginated rankings of releases.
//!
//! Chart requests have no form endpoint; the filter parameters serialize
//! directly into a path-segment grammar. The serialization is pure and
//! deterministic: identical parameters always produce the identical URL.

use std::fmt;

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::{RymClient, ROOT_URL};
use crate::collection::{EntryCollection, PageExtract};
use crate::error::Result;
use crate::extract;
use crate::models::common::YearRange;
use crate::models::simple::SimpleRelease;

/// Which ranking a chart draws from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChartType {
    #[default]
    Top,
    Bottom,
    Esoteric,
    Diverse,
    Popular,
}

impl ChartType {
    /// Path segment for this chart type.
    pub fn segment(self) -> &'static str {
        match self {
            ChartType::Top => "top",
            ChartType::Bottom => "bottom",
            ChartType::Esoteric => "esoteric",
            ChartType::Diverse => "diverse",
            ChartType::Popular => "popular",
        }
    }
}

/// Release subtypes a chart can be filtered to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReleaseType {
    Album,
    Ep,
    Single,
    Compilation,
    Video,
    MusicVideo,
    DjMix,
    Mixtape,
    Bootleg,
    Additional,
}

impl ReleaseType {
    /// Path token for this release type.
    pub fn segment(self) -> &'static str {
        match self {
            ReleaseType::Album => "album",
            ReleaseType::Ep => "ep",
            ReleaseType::Single => "single",
            ReleaseType::Compilation => "comp",
            ReleaseType::Video => "video",
            ReleaseType::MusicVideo => "musicvideo",
            ReleaseType::DjMix => "djmix",
            ReleaseType::Mixtape => "mixtape",
            ReleaseType::Bootleg => "unauth",
            ReleaseType::Additional => "additional",
        }
    }
}

/// Filter parameters of a chart request.
///
/// Facets serialize in a fixed order (genre, descriptor, secondary
/// genre, language, location); within a facet, excluded values follow
/// included ones, each prefixed with `-`. A facet with only exclusions
/// still emits its segment, starting with a `-` value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartParams {
    pub chart_type: ChartType,
    pub release_types: Vec<ReleaseType>,
    pub year_range: Option<YearRange>,
    pub primary_genres: Vec<String>,
    pub primary_genres_excluded: Vec<String>,
    pub secondary_genres: Vec<String>,
    pub secondary_genres_excluded: Vec<String>,
    pub descriptors: Vec<String>,
    pub descriptors_excluded: Vec<String>,
    pub languages: Vec<String>,
    pub languages_excluded: Vec<String>,
    pub locations: Vec<String>,
    pub locations_excluded: Vec<String>,
    pub include_subgenres: bool,
    pub contain_all_genres: bool,
}

impl ChartParams {
    /// Parameters for a chart of albums of the given type.
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            release_types: vec![ReleaseType::Album],
            include_subgenres: true,
            ..Default::default()
        }
    }

    /// Restrict the chart to a primary genre.
    pub fn with_genre<S: Into<String>>(mut self, genre: S) -> Self {
        self.primary_genres.push(genre.into());
        self
    }

    /// Restrict the chart to a year range.
    pub fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    /// Serialize the parameters into the chart URL for `page`.
    pub fn url(&self, page: u32) -> String {
        let release_types = if self.release_types.is_empty() {
            ReleaseType::Album.segment().to_string()
        } else {
            self.release_types
                .iter()
                .map(|t| t.segment())
                .collect::<Vec<_>>()
                .join(",")
        };
        let mut url = format!(
            "{ROOT_URL}/charts/{}/{}",
            self.chart_type.segment(),
            release_types
        );

        if let Some(range) = &self.year_range {
            url.push_str(&format!("/{}-{}", range.min, range.max));
        }

        let facets: [(&[String], &[String], &str); 5] = [
            (&self.primary_genres, &self.primary_genres_excluded, "g"),
            (&self.descriptors, &self.descriptors_excluded, "d"),
            (&self.secondary_genres, &self.secondary_genres_excluded, "s"),
            (&self.languages, &self.languages_excluded, "l"),
            (&self.locations, &self.locations_excluded, "loc"),
        ];
        for (included, excluded, key) in facets {
            if let Some(segment) = facet_segment(included, excluded) {
                url.push_str(&format!("/{key}:{segment}"));
            }
        }

        format!("{url}/{page}/")
    }
}

/// Comma-join a facet's included values and `-`-prefixed exclusions.
fn facet_segment(included: &[String], excluded: &[String]) -> Option<String> {
    if included.is_empty() && excluded.is_empty() {
        return None;
    }
    let mut parts: Vec<String> = included.iter().map(|name| extract::slug(name)).collect();
    parts.extend(excluded.iter().map(|name| format!("-{}", extract::slug(name))));
    Some(parts.join(","))
}

/// A fetched chart: the query that produced it plus its entries so far.
#[derive(Debug)]
pub struct Chart {
    /// Parameters the chart URL was derived from, when built from a
    /// query rather than a raw URL.
    pub params: Option<ChartParams>,
    collection: EntryCollection<ChartRows>,
}

impl Chart {
    pub(crate) fn fetch(client: &RymClient, params: ChartParams) -> Result<Self> {
        let url = params.url(1);
        let collection = EntryCollection::fetch(client, &url, ChartRows)?;
        Ok(Self { params: Some(params), collection })
    }

    /// Fetch a chart from an already-known chart URL.
    pub(crate) fn fetch_url(client: &RymClient, url: &str) -> Result<Self> {
        let collection = EntryCollection::fetch(client, url, ChartRows)?;
        Ok(Self { params: None, collection })
    }

    /// Ranked entries accumulated so far.
    pub fn entries(&self) -> &[SimpleRelease] {
        self.collection.entries()
    }

    /// Fetch the next chart page, returning the newly ranked entries.
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

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => {
                let types: Vec<&str> = params.release_types.iter().map(|t| t.segment()).collect();
                write!(f, "Chart: {} {}", params.chart_type.segment(), types.join(" "))
            }
            None => write!(f, "Chart: {}", self.collection.init_url()),
        }
    }
}

/// Rows of a chart page.
#[derive(Debug)]
pub struct ChartRows;

impl PageExtract for ChartRows {
    type Entry = SimpleRelease;

    fn pager_selector(&self) -> &'static str {
        "a.ui_pagination_btn.ui_pagination_number"
    }

    fn extract(&self, doc: &Html) -> Result<Vec<SimpleRelease>> {
        let row_sel = extract::selector("#page_charts_section_charts .page_charts_section_charts_item");
        let title_sel = extract::selector(".page_charts_section_charts_item_title");
        let credit_sel = extract::selector(".page_charts_section_charts_item_credited_links_primary");
        let anchor_sel = extract::selector("a[href]");

        Ok(doc
            .select(&row_sel)
            .filter_map(|item| {
                let title = item.select(&title_sel).next().and_then(extract::first_text)?;
                let artist_name = item.select(&credit_sel).next().and_then(extract::first_text);
                let url = item
                    .select(&anchor_sel)
                    .next()
                    .and_then(|a| a.attr("href"))
                    .map(extract::absolute_url);
                Some(SimpleRelease {
                    title,
                    url,
                    artist_name,
                    ..Default::default()
                })
            })
            .collect())
    }
}
