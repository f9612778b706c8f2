//! Release pages: the central entity of the catalog.
//!
//! A release build is single-shot: one fetch, then a deterministic
//! sequence of field extractions. The only inter-field dependency is
//! credit binding, which is an explicit second pass: credits are first
//! built with raw number/range track notation, then resolved against the
//! already-built tracklist.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::RymClient;
use crate::collection::{EntryCollection, PageExtract};
use crate::error::{Result, RymError};
use crate::extract::{self, TrackToken};
use crate::models::common::{PartialDate, ReleaseLinks, Role};
use crate::models::review::Review;
use crate::models::simple::{
    CreditedArtist, SimpleArtist, SimpleGenre, SimpleIssue, SimpleLabel, SimpleList, SimpleRelease,
};

static RELEASE_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Type((?:\w+, )*\w+)").expect("valid regex"));

static TRACK_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("valid regex"));

/// Marker the site puts in cover image alt text.
const COVER_ALT_PREFIX: &str = "Cover art for ";

/// Placeholder shown when cover art is blocked.
const BLOCKED_COVER: &str = "https://e.snmc.io/3.0/img/blocked_art/enable_img_600x600.png";

/// One tracklist entry. Identity is the position number within the
/// parent release; two same-numbered tracks of different releases are
/// never equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Position as printed ("1", "A2", ...).
    pub number: String,

    /// Track title.
    pub title: String,

    /// Track length, when the page carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Duration>,

    /// The release this track belongs to.
    pub release: SimpleRelease,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.release.url == other.release.url
    }
}

impl Eq for Track {}

/// A fully fetched release.
///
/// Two releases are equal iff their canonical URLs match; title or
/// credit differences from data drift do not affect identity.
#[derive(Debug, Serialize, Deserialize)]
pub struct Release {
    pub url: String,
    /// Stable short identifier from the page's shortcut field.
    pub id: String,
    pub title: String,
    pub artists: Vec<SimpleArtist>,
    /// Display credit, which for collaborations differs from the
    /// individual artist names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    /// Whether this is a various-artists compilation.
    pub various_artists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_ratings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_date: Option<PartialDate>,
    /// Release type as printed ("Album", "EP", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    pub primary_genres: Vec<SimpleGenre>,
    pub secondary_genres: Vec<SimpleGenre>,
    pub descriptors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub links: ReleaseLinks,
    pub tracklist: Vec<Track>,
    /// Total play time from the tracklist footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Duration>,
    pub credited_artists: Vec<CreditedArtist>,
    /// Alternate pressings/editions of this release.
    pub issues: Vec<SimpleIssue>,
    /// Whether the page carries a sensitive-content warning.
    pub content_warning: bool,
    #[serde(skip)]
    lists: Option<ReleaseLists>,
    #[serde(skip)]
    reviews: Option<ReleaseReviews>,
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Release {}

/// Lists featuring a release, one page at a time.
pub type ReleaseLists = EntryCollection<ListRows>;

/// Reviews of a release, one page at a time.
pub type ReleaseReviews = EntryCollection<ReviewRows>;

impl Release {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url)
    }

    /// Build a release from an already-fetched document.
    pub(crate) fn from_document(doc: &Html, url: &str) -> Result<Self> {
        let title = fetch_title(doc)?;
        let id = fetch_id(doc)?;
        let various_artists = url.contains("/comp/various-artists/");
        let page_text = doc.root_element().text().collect::<String>();

        let tracklist = fetch_tracks(doc, &title, url);
        let raw_credits = fetch_credited_artists(doc);
        let credited_artists = bind_credits(raw_credits, &tracklist);

        Ok(Self {
            url: url.to_string(),
            id,
            title,
            artists: fetch_artists(doc, various_artists),
            artist_name: fetch_artist_name(doc),
            various_artists,
            average_rating: fetch_average_rating(doc),
            number_of_ratings: fetch_number_of_ratings(doc),
            number_of_reviews: fetch_number_of_reviews(doc),
            release_date: extract::labeled_date(&page_text, "Released"),
            recording_date: extract::labeled_date(&page_text, "Recorded"),
            release_type: fetch_release_type(&page_text),
            primary_genres: fetch_genres(doc, "pri"),
            secondary_genres: fetch_genres(doc, "sec"),
            descriptors: fetch_descriptors(doc),
            cover_url: fetch_cover_url(doc),
            links: fetch_release_links(doc),
            length: fetch_length(doc),
            credited_artists,
            issues: fetch_issues(doc),
            content_warning: fetch_content_warning(doc),
            tracklist,
            lists: None,
            reviews: None,
        })
    }

    /// Find a track by its printed position number.
    pub fn track_by_number(&self, number: &str) -> Option<&Track> {
        self.tracklist.iter().find(|t| t.number == number)
    }

    /// Find a track by title.
    pub fn track_by_title(&self, title: &str) -> Option<&Track> {
        self.tracklist.iter().find(|t| t.title == title)
    }

    /// Lists featuring this release. Fetched on first access, cached for
    /// the lifetime of the release.
    pub fn lists(&mut self, client: &RymClient) -> Result<&mut ReleaseLists> {
        if self.lists.is_none() {
            let url = format!("{}/lists/1/", self.url.trim_end_matches('/'));
            self.lists = Some(EntryCollection::fetch(client, &url, ListRows)?);
        }
        Ok(self.lists.as_mut().expect("populated above"))
    }

    /// Reviews of this release. Fetched on first access, cached for the
    /// lifetime of the release.
    pub fn reviews(&mut self, client: &RymClient) -> Result<&mut ReleaseReviews> {
        if self.reviews.is_none() {
            let url = format!("{}/reviews/1/", self.url.trim_end_matches('/'));
            let parent = SimpleRelease::new(self.title.clone(), Some(self.url.clone()));
            self.reviews = Some(EntryCollection::fetch(client, &url, ReviewRows { release: parent })?);
        }
        Ok(self.reviews.as_mut().expect("populated above"))
    }
}

/// The full release view of one particular issue (pressing/edition).
#[derive(Debug, Serialize, Deserialize)]
pub struct ReleaseIssue {
    /// The underlying release, built from the issue page.
    pub release: Release,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<SimpleLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<String>,
    pub attributes: Vec<String>,
    pub countries: Vec<String>,
}

impl ReleaseIssue {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        let release = Release::from_document(&doc, url)?;
        let own = release
            .issues
            .iter()
            .find(|issue| issue.url.as_deref() == Some(url))
            .cloned()
            .unwrap_or_default();
        Ok(Self {
            release,
            format: own.format,
            label: own.label,
            issue_number: own.issue_number,
            attributes: own.attributes,
            countries: own.countries,
        })
    }
}

fn fetch_title(doc: &Html) -> Result<String> {
    let sel = extract::selector("div.album_title");
    doc.select(&sel)
        .next()
        .and_then(extract::first_text)
        .ok_or_else(|| RymError::Parse("No title was found for this release".into()))
}

fn fetch_id(doc: &Html) -> Result<String> {
    let sel = extract::selector("input.album_shortcut");
    let id = doc
        .select(&sel)
        .next()
        .and_then(|el| el.attr("value"))
        .map(|value| value.trim_start_matches('[').trim_end_matches(']').to_string())
        .filter(|id| !id.is_empty());
    id.ok_or_else(|| RymError::Parse("No ID was found for this release".into()))
}

fn fetch_artists(doc: &Html, various_artists: bool) -> Vec<SimpleArtist> {
    let sel = if various_artists {
        extract::selector("#tracks a.artist")
    } else {
        extract::selector(r#"span[itemprop="byArtist"] a.artist"#)
    };
    doc.select(&sel)
        .filter_map(|a| {
            let href = a.attr("href")?;
            Some(SimpleArtist::new(
                extract::text_of(a).trim().to_string(),
                Some(extract::absolute_url(href)),
            ))
        })
        .collect()
}

fn fetch_artist_name(doc: &Html) -> Option<String> {
    let outer_sel = extract::selector(r#"span[itemprop="byArtist"]"#);
    let outer = doc.select(&outer_sel).next()?;
    let collab_sel = extract::selector(".credited_name");
    match outer.select(&collab_sel).next() {
        Some(collab) => extract::first_text(collab),
        None => Some(extract::text_of(outer).trim().to_string()).filter(|s| !s.is_empty()),
    }
}

fn fetch_average_rating(doc: &Html) -> Option<f32> {
    let sel = extract::selector("span.avg_rating");
    doc.select(&sel)
        .next()
        .and_then(|el| extract::text_of(el).trim().parse().ok())
}

fn fetch_number_of_ratings(doc: &Html) -> Option<u32> {
    let sel = extract::selector("span.num_ratings");
    let inner = doc.select(&sel).next().and_then(extract::first_child_element)?;
    extract::count_number(&extract::text_of(inner))
}

fn fetch_number_of_reviews(doc: &Html) -> Option<u32> {
    let section_sel = extract::selector("div.section_reviews.section_outer");
    let header_sel = extract::selector("div.release_page_header");
    let header = doc.select(&section_sel).next()?.select(&header_sel).next()?;
    let text = extract::text_of(header);
    let mut words = text.split_whitespace();
    let first = words.next()?;
    // A bare header with no count reads "Reviews" only.
    words.next()?;
    extract::count_number(first)
}

fn fetch_release_type(page_text: &str) -> Option<String> {
    RELEASE_TYPE_RE
        .captures(page_text)
        .map(|caps| caps[1].to_string())
}

fn fetch_genres(doc: &Html, kind: &str) -> Vec<SimpleGenre> {
    let sel = extract::selector(&format!("span.release_{kind}_genres"));
    doc.select(&sel)
        .next()
        .map(|el| extract::genre_list(&extract::text_of(el)))
        .unwrap_or_default()
}

fn fetch_descriptors(doc: &Html) -> Vec<String> {
    let sel = extract::selector("span.release_pri_descriptors");
    doc.select(&sel)
        .next()
        .map(|el| extract::comma_list(&extract::text_of(el)))
        .unwrap_or_default()
}

fn fetch_cover_url(doc: &Html) -> Option<String> {
    let sel = extract::selector("img");
    let img = doc.select(&sel).next()?;
    let alt = img.attr("alt")?;
    let src = img.attr("src")?;
    if alt.starts_with(COVER_ALT_PREFIX) && !src.contains(BLOCKED_COVER) {
        Some(format!("https:{src}"))
    } else {
        None
    }
}

fn fetch_release_links(doc: &Html) -> ReleaseLinks {
    let sel = extract::selector("#media_link_button_container_top");
    let Some(data) = doc.select(&sel).next().and_then(|el| el.attr("data-links")) else {
        return ReleaseLinks::default();
    };
    match serde_json::from_str(data) {
        Ok(json) => extract::release_links(&json),
        Err(err) => {
            warn!("undecodable media links payload: {err}");
            ReleaseLinks::default()
        }
    }
}

fn fetch_tracks(doc: &Html, release_title: &str, release_url: &str) -> Vec<Track> {
    let row_sel = extract::selector(r#"#tracks div[itemprop="track"]"#);
    let num_sel = extract::selector("span.tracklist_num");
    let title_sel = extract::selector("span.tracklist_title");
    let seconds_sel = extract::selector("span[data-inseconds]");
    let parent = SimpleRelease::new(release_title, Some(release_url.to_string()));

    doc.select(&row_sel)
        .filter_map(|row| {
            let number = row
                .select(&num_sel)
                .next()
                .map(|el| extract::text_of(el).split_whitespace().collect::<String>())?;
            let title = row.select(&title_sel).next().and_then(extract::first_text)?;
            let length = row
                .select(&seconds_sel)
                .next()
                .and_then(|el| el.attr("data-inseconds"))
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs);
            Some(Track { number, title, length, release: parent.clone() })
        })
        .collect()
}

fn fetch_length(doc: &Html) -> Option<Duration> {
    let sel = extract::selector("span.tracklist_total");
    let text = extract::text_of(doc.select(&sel).next()?);
    let caps = TRACK_TIME_RE.captures(&text)?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    Some(Duration::from_secs(minutes * 60 + seconds))
}

/// Pass 1 of credit binding: roles keep their raw track notation.
fn fetch_credited_artists(doc: &Html) -> Vec<CreditedArtist> {
    let row_sel = extract::selector("#credits_ li");
    let role_sel = extract::selector(".role_name");
    let tracks_sel = extract::selector(".role_tracks");

    doc.select(&row_sel)
        .filter(|li| {
            !extract::text_of(*li).trim().is_empty()
                && !li.value().classes().any(|c| c == "expand_button")
        })
        .map(|li| {
            let roles = li
                .select(&role_sel)
                .map(|role| {
                    let name = extract::leading_text(role)
                        .or_else(|| extract::first_text(role))
                        .unwrap_or_default();
                    let notation = role
                        .select(&tracks_sel)
                        .next()
                        .map(|el| extract::text_of(el).trim().to_string())
                        .filter(|s| !s.is_empty());
                    Role { name, notation, tracks: Vec::new() }
                })
                .collect();

            let (name, url) = match extract::first_child_element(li) {
                Some(el) if el.value().name() == "a" => (
                    extract::text_of(el).trim().to_string(),
                    el.attr("href").map(extract::absolute_url),
                ),
                _ => (extract::leading_text(li).unwrap_or_default(), None),
            };
            CreditedArtist { name, url, roles }
        })
        .collect()
}

/// Pass 2 of credit binding: resolve number/range notation against the
/// built tracklist. Pure post-processing; the tracklist is not touched.
fn bind_credits(raw: Vec<CreditedArtist>, tracklist: &[Track]) -> Vec<CreditedArtist> {
    raw.into_iter()
        .map(|artist| CreditedArtist {
            roles: artist
                .roles
                .into_iter()
                .map(|role| {
                    let tracks = role
                        .notation
                        .as_deref()
                        .map(|notation| resolve_role_tracks(notation, tracklist))
                        .unwrap_or_default();
                    Role { tracks, ..role }
                })
                .collect(),
            ..artist
        })
        .collect()
}

/// Expand role-track notation into tracklist entries.
///
/// Ranges cover the inclusive run from the start marker to the end
/// marker in tracklist order; a start marker not present in the
/// tracklist contributes nothing.
pub(crate) fn resolve_role_tracks(notation: &str, tracklist: &[Track]) -> Vec<Track> {
    let mut tracks = Vec::new();
    for token in extract::track_tokens(notation) {
        match token {
            TrackToken::Single(number) => {
                if let Some(track) = tracklist.iter().find(|t| t.number == number) {
                    tracks.push(track.clone());
                }
            }
            TrackToken::Range(start, end) => {
                let mut started = false;
                for track in tracklist {
                    if track.number == start {
                        started = true;
                    }
                    if started {
                        tracks.push(track.clone());
                        if track.number == end {
                            break;
                        }
                    }
                }
            }
        }
    }
    tracks
}

fn fetch_issues(doc: &Html) -> Vec<SimpleIssue> {
    let issue_sel = extract::selector(".issue_info");
    doc.select(&issue_sel)
        .filter(|el| !el.value().classes().any(|c| c == "release_view"))
        .map(fetch_issue_info)
        .collect()
}

fn fetch_issue_info(issue: ElementRef<'_>) -> SimpleIssue {
    let anchor_sel = extract::selector("a[href]");
    let year_sel = extract::selector(".issue_year");
    let label_sel = extract::selector("a.label");
    let formats_sel = extract::selector(".issue_formats");
    let attribute_sel = extract::selector(".attribute");
    let flag_sel = extract::selector(".issue_countries .ui_flag");

    let anchor = issue.select(&anchor_sel).next();
    let title = anchor
        .and_then(|a| a.attr("title"))
        .unwrap_or_default()
        .to_string();
    let url = anchor.and_then(|a| a.attr("href")).map(extract::absolute_url);

    let release_date = issue
        .select(&year_sel)
        .next()
        .and_then(|el| el.attr("title"))
        .and_then(extract::partial_date);

    let (label, issue_number) = match issue.select(&label_sel).next() {
        Some(label_el) => {
            let label = SimpleLabel::new(
                extract::text_of(label_el).trim().to_string(),
                label_el.attr("href").map(extract::absolute_url),
            );
            let number = text_after(label_el).map(|t| t.replace('/', "").trim().to_string());
            (Some(label), number.filter(|n| !n.is_empty()))
        }
        None => (None, None),
    };

    SimpleIssue {
        title,
        url,
        release_date,
        format: issue
            .select(&formats_sel)
            .next()
            .and_then(|el| el.attr("title"))
            .map(str::to_string),
        label,
        issue_number,
        attributes: issue
            .select(&attribute_sel)
            .next()
            .map(|el| extract::comma_list(&extract::text_of(el)))
            .unwrap_or_default(),
        countries: issue
            .select(&flag_sel)
            .filter_map(|flag| flag.attr("title"))
            .map(str::to_string)
            .collect(),
    }
}

/// First non-empty text following an element among its siblings.
fn text_after(el: ElementRef<'_>) -> Option<String> {
    for sibling in el.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        } else if let Some(sibling_el) = ElementRef::wrap(sibling) {
            let text = extract::text_of(sibling_el).trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn fetch_content_warning(doc: &Html) -> bool {
    let sel = extract::selector(".warning");
    doc.select(&sel).any(|el| extract::text_of(el).contains("Nazi"))
}

/// Rows of a release's "featured on lists" pages.
#[derive(Debug)]
pub struct ListRows;

impl PageExtract for ListRows {
    type Entry = SimpleList;

    fn pager_selector(&self) -> &'static str {
        "a.navlinknum"
    }

    fn extract(&self, doc: &Html) -> Result<Vec<SimpleList>> {
        let row_sel = extract::selector("ul.lists > li");
        Ok(doc
            .select(&row_sel)
            .filter_map(|li| {
                let anchors = extract::anchors_of(li);
                let (title, url) = anchors
                    .iter()
                    .find(|(_, href)| href.contains("/list/"))
                    .or_else(|| anchors.first())?;
                Some(SimpleList::new(title.clone(), Some(url.clone())))
            })
            .collect())
    }
}

/// Rows of a release's review pages.
#[derive(Debug)]
pub struct ReviewRows {
    pub(crate) release: SimpleRelease,
}

impl PageExtract for ReviewRows {
    type Entry = Review;

    fn pager_selector(&self) -> &'static str {
        "a.navlinknum"
    }

    fn extract(&self, doc: &Html) -> Result<Vec<Review>> {
        let list_sel = extract::selector(".review_list");
        let body_sel = extract::selector(".page_review_feature_body_inner");
        let rating_sel = extract::selector(".page_review_feature_rating");
        let date_sel = extract::selector(".review_date");

        let Some(list_el) = doc.select(&list_sel).next() else {
            return Ok(Vec::new());
        };

        let mut reviews = Vec::new();
        let mut current = extract::next_sibling_element(list_el);
        while let Some(block) = current {
            if let Some(date_el) = block.select(&date_sel).next() {
                let anchors = extract::anchors_of(date_el);
                if let Some((date_text, url)) = anchors.first() {
                    let date = NaiveDate::parse_from_str(date_text, "%B %d %Y").ok();
                    let content = block
                        .select(&body_sel)
                        .next()
                        .map(|el| extract::text_of(el).trim().to_string());
                    let rating = block
                        .select(&rating_sel)
                        .next()
                        .and_then(|el| el.attr("content"))
                        .and_then(|c| c.parse().ok());
                    reviews.push(Review {
                        url: url.clone(),
                        author: None,
                        content,
                        rating,
                        date,
                        release: Some(self.release.clone()),
                    });
                }
            }
            current = extract::next_sibling_element(block);
        }
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_HTML: &str = r##"
        <html><body>
            <img alt="Cover art for OK Computer" src="//e.snmc.io/i/600/s/abc/123.jpg">
            <div class="album_title">
                OK Computer
                <span itemprop="byArtist">
                    <a class="artist" href="/artist/radiohead">Radiohead</a>
                </span>
            </div>
            <input class="album_shortcut" value="[Album12345]">
            <span class="avg_rating"> 4.28 </span>
            <span class="num_ratings"><b>90,244</b></span>
            <div class="section_reviews section_outer">
                <div class="release_page_header">312 Reviews</div>
            </div>
            <table>
                <tr><th>Type</th><td>Album</td></tr>
                <tr><th>Released</th><td>16 June 1997</td></tr>
                <tr><th>Recorded</th><td>1996</td></tr>
            </table>
            <span class="release_pri_genres">Alternative Rock, Art Rock</span>
            <span class="release_sec_genres">Space Rock</span>
            <span class="release_pri_descriptors">melancholic, futuristic, anxious</span>
            <div id="media_link_button_container_top"
                 data-links='{"spotify":{"6dVIqQ8qmQ5GBnJ9shOYGE":{}},"myspace":{"x":{}}}'></div>
            <div id="tracks">
                <div itemprop="track">
                    <span class="tracklist_num"> 1 </span>
                    <span class="tracklist_title">Airbag<span data-inseconds="284">4:44</span></span>
                </div>
                <div itemprop="track">
                    <span class="tracklist_num"> 2 </span>
                    <span class="tracklist_title">Paranoid Android<span data-inseconds="383">6:23</span></span>
                </div>
                <div itemprop="track">
                    <span class="tracklist_num"> 3 </span>
                    <span class="tracklist_title">Subterranean Homesick Alien<span data-inseconds="267">4:27</span></span>
                </div>
            </div>
            <span class="tracklist_total">53:21</span>
            <div id="credits_"><ul>
                <li><a href="/artist/nigel-godrich">Nigel Godrich</a>
                    <span class="role_name">producer<span class="role_tracks">1-3</span></span>
                    <span class="role_name">engineer</span>
                </li>
                <li class="expand_button"></li>
            </ul></div>
            <div class="issue_info release_view"><a href="/release/album/radiohead/ok-computer/" title="OK Computer"></a></div>
            <div class="issue_info">
                <a href="/release/album/radiohead/ok-computer.p/" title="OK Computer"></a>
                <span class="issue_year" title="1997"></span>
                <a class="label" href="/label/parlophone">Parlophone</a><span> / 7243 8 55229 2 5</span>
                <span class="issue_formats" title="CD"></span>
                <span class="attribute">jewel case</span>
                <span class="issue_countries"><span class="ui_flag" title="UK"></span><span class="ui_flag" title="Europe"></span></span>
            </div>
        </body></html>
    "##;

    fn release() -> Release {
        let doc = Html::parse_document(RELEASE_HTML);
        Release::from_document(&doc, "https://rateyourmusic.com/release/album/radiohead/ok-computer/")
            .unwrap()
    }

    fn track(number: &str, release_url: Option<&str>) -> Track {
        Track {
            number: number.to_string(),
            title: format!("Track {number}"),
            length: None,
            release: SimpleRelease::new("Fixture", release_url.map(str::to_string)),
        }
    }

    #[test]
    fn test_core_fields() {
        let release = release();
        assert_eq!(release.title, "OK Computer");
        assert_eq!(release.id, "Album12345");
        assert_eq!(release.artists.len(), 1);
        assert_eq!(release.artists[0].name, "Radiohead");
        assert_eq!(
            release.artists[0].url.as_deref(),
            Some("https://rateyourmusic.com/artist/radiohead")
        );
        assert_eq!(release.average_rating, Some(4.28));
        assert_eq!(release.number_of_ratings, Some(90244));
        assert_eq!(release.number_of_reviews, Some(312));
        assert_eq!(release.release_type.as_deref(), Some("Album"));
        assert!(!release.various_artists);
        assert!(!release.content_warning);
    }

    #[test]
    fn test_dates_from_page_text() {
        let release = release();
        let released = release.release_date.unwrap();
        assert_eq!((released.year, released.month, released.day), (1997, Some(6), Some(16)));
        let recorded = release.recording_date.unwrap();
        assert_eq!((recorded.year, recorded.month, recorded.day), (1996, None, None));
    }

    #[test]
    fn test_genres_and_descriptors() {
        let release = release();
        let primary: Vec<&str> = release.primary_genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(primary, ["Alternative Rock", "Art Rock"]);
        let secondary: Vec<&str> = release.secondary_genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(secondary, ["Space Rock"]);
        assert_eq!(release.descriptors, ["melancholic", "futuristic", "anxious"]);
    }

    #[test]
    fn test_cover_and_links() {
        let release = release();
        assert_eq!(release.cover_url.as_deref(), Some("https://e.snmc.io/i/600/s/abc/123.jpg"));
        assert_eq!(
            release.links.spotify.as_deref(),
            Some("https://open.spotify.com/album/6dVIqQ8qmQ5GBnJ9shOYGE")
        );
        assert_eq!(release.links.youtube, None);
    }

    #[test]
    fn test_tracklist() {
        let release = release();
        assert_eq!(release.tracklist.len(), 3);
        assert_eq!(release.tracklist[0].number, "1");
        assert_eq!(release.tracklist[0].title, "Airbag");
        assert_eq!(release.tracklist[0].length, Some(Duration::from_secs(284)));
        assert_eq!(release.length, Some(Duration::from_secs(53 * 60 + 21)));
        assert_eq!(release.track_by_number("2").unwrap().title, "Paranoid Android");
        assert_eq!(release.track_by_title("Airbag").unwrap().number, "1");
    }

    #[test]
    fn test_two_phase_credit_binding() {
        let release = release();
        assert_eq!(release.credited_artists.len(), 1);
        let credit = &release.credited_artists[0];
        assert_eq!(credit.name, "Nigel Godrich");
        assert_eq!(
            credit.url.as_deref(),
            Some("https://rateyourmusic.com/artist/nigel-godrich")
        );
        assert_eq!(credit.roles.len(), 2);
        let producer = &credit.roles[0];
        assert_eq!(producer.name, "producer");
        let numbers: Vec<&str> = producer.tracks.iter().map(|t| t.number.as_str()).collect();
        assert_eq!(numbers, ["1", "2", "3"]);
        assert_eq!(credit.roles[1].name, "engineer");
        assert!(credit.roles[1].tracks.is_empty());
    }

    #[test]
    fn test_issue_rows() {
        let release = release();
        assert_eq!(release.issues.len(), 1);
        let issue = &release.issues[0];
        assert_eq!(issue.title, "OK Computer");
        assert_eq!(
            issue.url.as_deref(),
            Some("https://rateyourmusic.com/release/album/radiohead/ok-computer.p/")
        );
        assert_eq!(issue.release_date.map(|d| d.year), Some(1997));
        assert_eq!(issue.format.as_deref(), Some("CD"));
        assert_eq!(issue.label.as_ref().map(|l| l.name.as_str()), Some("Parlophone"));
        assert_eq!(issue.issue_number.as_deref(), Some("7243 8 55229 2 5"));
        assert_eq!(issue.attributes, ["jewel case"]);
        assert_eq!(issue.countries, ["UK", "Europe"]);
    }

    #[test]
    fn test_release_equality_is_url_only() {
        let a = release();
        let mut b = release();
        b.title = "A different scrape of the same page".to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_track_equality_requires_same_release() {
        let same_release = Some("https://rateyourmusic.com/release/album/x/y/");
        let other_release = Some("https://rateyourmusic.com/release/album/x/z/");
        assert_eq!(track("5", same_release), track("5", same_release));
        assert_ne!(track("5", same_release), track("5", other_release));
        assert_ne!(track("5", same_release), track("6", same_release));
    }

    #[test]
    fn test_range_resolution() {
        let tracklist: Vec<Track> = (1..=5)
            .map(|n| track(&n.to_string(), Some("https://rateyourmusic.com/release/album/x/y/")))
            .collect();

        let inclusive = resolve_role_tracks("1-3", &tracklist);
        let numbers: Vec<&str> = inclusive.iter().map(|t| t.number.as_str()).collect();
        assert_eq!(numbers, ["1", "2", "3"]);

        let single = resolve_role_tracks("5", &tracklist);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].number, "5");

        // A range whose start marker never appears resolves to nothing.
        assert!(resolve_role_tracks("7-9", &tracklist).is_empty());
    }

    #[test]
    fn test_list_rows_extraction() {
        const LISTS_HTML: &str = r#"
            <html><body>
                <ul class="lists expanded">
                    <li><div class="main"><a href="/list/someone/best-of-the-90s/">Best of the 90s</a></div></li>
                    <li><div class="main"><a href="/list/other/headphone-albums/">Headphone albums</a></div></li>
                </ul>
                <a class="navlinknum" href="/x/1/">1</a>
            </body></html>
        "#;
        let doc = Html::parse_document(LISTS_HTML);
        let rows = ListRows.extract(&doc).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Best of the 90s");
        assert_eq!(
            rows[0].url.as_deref(),
            Some("https://rateyourmusic.com/list/someone/best-of-the-90s/")
        );
    }

    #[test]
    fn test_review_rows_extraction() {
        const REVIEWS_HTML: &str = r#"
            <html><body>
                <div class="review_list"></div>
                <div class="review">
                    <div class="review_date"><a href="/review/someone/1234/">March 14 2021</a></div>
                    <span class="page_review_feature_rating" content="4.5"></span>
                    <div class="page_review_feature_body_inner">A lasting record.</div>
                </div>
                <div class="review">
                    <div class="review_date"><a href="/review/other/5678/">May 2 2019</a></div>
                </div>
                <a class="navlinknum" href="/x/1/">1</a>
            </body></html>
        "#;
        let doc = Html::parse_document(REVIEWS_HTML);
        let rows = ReviewRows {
            release: SimpleRelease::new("Fixture", Some("https://rateyourmusic.com/release/album/x/y/".into())),
        }
        .extract(&doc)
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "https://rateyourmusic.com/review/someone/1234/");
        assert_eq!(rows[0].rating, Some(4.5));
        assert_eq!(rows[0].content.as_deref(), Some("A lasting record."));
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2021, 3, 14));
        assert_eq!(rows[1].rating, None);
        assert_eq!(
            rows[1].release.as_ref().and_then(|r| r.url.as_deref()),
            Some("https://rateyourmusic.com/release/album/x/y/")
        );
    }
}
