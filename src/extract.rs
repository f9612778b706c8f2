//! Field extraction rules shared across entity builders.
//!
//! Small, composable parsing functions over parsed documents, document
//! fragments, or already-extracted text. Extractors for optional fields
//! return `None`/empty on absence; only fields an entity cannot exist
//! without (title, name, id) escalate to [`RymError::Parse`] at the
//! builder level.

use std::sync::LazyLock;

use chrono::{Month, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::client::ROOT_URL;
use crate::models::common::{Location, PartialDate, ReleaseLinks};
use crate::models::simple::{SimpleArtist, SimpleGenre};

/// `Name [Alias] (comma separated info)` groups in a run of mixed text.
static NAME_INFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?([\w .]+) (?:\[([\w ]+)\] )?\(([\w ,\-]+)\)").expect("valid regex"));

/// `Name [years]` groups in a distributor listing.
static NAME_YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?([\w .]+) \[([\w \-]+)\]").expect("valid regex"));

/// Instrument/role words versus year-range tokens inside an info segment.
static INFO_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z][a-zA-Z ]+)|(\d+(?:-\d+))").expect("valid regex"));

/// Single track numbers and inclusive ranges in role credits.
static TRACK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+-\w+)|(\w+)").expect("valid regex"));

/// Trailing page segment of a collection URL, with an optional sort suffix
/// (`.../5/`, `.../1.d/`).
static PAGE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(\.[a-z])?/$").expect("valid regex"));

/// First run of digits in a count blob.
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Compile a selector that is known valid at authoring time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Concatenated text content of an element.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// First non-empty text chunk of an element, trimmed.
pub(crate) fn first_text(el: ElementRef<'_>) -> Option<String> {
    el.text().map(str::trim).find(|t| !t.is_empty()).map(str::to_string)
}

/// The element's own leading text, stopping at the first child element.
pub(crate) fn leading_text(el: ElementRef<'_>) -> Option<String> {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        } else if child.value().is_element() {
            return None;
        }
    }
    None
}

/// Element text with `<br>` rendered as a newline.
pub(crate) fn text_with_breaks(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() == "br" {
                out.push('\n');
            } else {
                out.push_str(&text_of(child_el));
            }
        }
    }
    out
}

/// First element among the element's direct children.
pub(crate) fn first_child_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

/// Next sibling that is an element.
pub(crate) fn next_sibling_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Locate a labeled info block: the sibling following the first element
/// matched by `css` whose text equals `title` exactly.
pub(crate) fn labeled_block<'a>(doc: &'a Html, css: &str, title: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css);
    doc.select(&sel)
        .find(|el| text_of(*el).trim() == title)
        .and_then(next_sibling_element)
}

/// Resolve a site-relative href against the canonical origin.
pub(crate) fn absolute_url(href: &str) -> String {
    if href.starts_with('/') {
        format!("{ROOT_URL}{href}")
    } else {
        href.to_string()
    }
}

/// Anchors of an element in document order, as (text, absolute URL) pairs.
pub(crate) fn anchors_of(el: ElementRef<'_>) -> Vec<(String, String)> {
    let sel = selector("a[href]");
    el.select(&sel)
        .filter_map(|a| {
            let href = a.attr("href")?;
            Some((text_of(a).trim().to_string(), absolute_url(href)))
        })
        .collect()
}

/// Derive the URL slug RateYourMusic uses for a human-readable name.
pub(crate) fn slug(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Decode a date written at year, month-year, or full granularity.
///
/// The granularity is selected by whitespace token count (1, 2 or 3);
/// any other count, or an invalid date, decodes to `None`.
pub(crate) fn partial_date(text: &str) -> Option<PartialDate> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [year] => Some(PartialDate::from_year(year.parse().ok()?)),
        [month, year] => Some(PartialDate::from_year_month(
            year.parse().ok()?,
            parse_month(month)?,
        )),
        [day, month, year] => {
            let year = year.parse().ok()?;
            let month = parse_month(month)?;
            let day = day.parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)?;
            Some(PartialDate::from_ymd(year, month, day))
        }
        _ => None,
    }
}

fn parse_month(token: &str) -> Option<u32> {
    token.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Find a date prefixed by a label ("Released", "Recorded") in page text.
pub(crate) fn labeled_date(page_text: &str, label: &str) -> Option<PartialDate> {
    let re = Regex::new(&format!(
        r"{label}(\w+ \d+)|{label}(\d+ \w+ \d+)|{label}(\d{{4}})"
    ))
    .ok()?;
    let caps = re.captures(page_text)?;
    let date = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str();
    partial_date(date)
}

/// Split a comma-joined genre blob into genre references.
pub(crate) fn genre_list(text: &str) -> Vec<SimpleGenre> {
    comma_list(text).into_iter().map(SimpleGenre::named).collect()
}

/// Split a comma-joined blob into trimmed, non-empty names.
pub(crate) fn comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode a "city, state, country" string by component count.
pub(crate) fn location(text: &str, url: Option<String>) -> Location {
    let parts: Vec<&str> = text.trim().split(", ").collect();
    match parts.as_slice() {
        [city, state, country] => Location {
            city: Some((*city).to_string()),
            state: Some((*state).to_string()),
            country: (*country).to_string(),
            url,
        },
        [state, country] => Location {
            city: None,
            state: Some((*state).to_string()),
            country: (*country).to_string(),
            url,
        },
        _ => Location {
            city: None,
            state: None,
            country: parts.first().copied().unwrap_or_default().to_string(),
            url,
        },
    }
}

/// One `Name [Alias] (info)` group recovered from a mixed text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameInfoGroup {
    pub name: String,
    pub alias: Option<String>,
    pub info: String,
    pub url: Option<String>,
}

/// Decode `Name [Alias] (info)` groups, matching `anchors` to names
/// left-to-right by exact text equality to recover per-name URLs.
pub(crate) fn name_info_groups(raw: &str, anchors: &[(String, String)]) -> Vec<NameInfoGroup> {
    let mut anchor_index = 0;
    NAME_INFO_RE
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_string();
            let url = match anchors.get(anchor_index) {
                Some((text, href)) if *text == name => {
                    anchor_index += 1;
                    Some(href.clone())
                }
                _ => None,
            };
            NameInfoGroup {
                name,
                alias: caps.get(2).map(|m| m.as_str().to_string()),
                info: caps[3].to_string(),
                url,
            }
        })
        .collect()
}

/// Decode `Name [years]` distributor groups with the same anchor matching.
pub(crate) fn name_years_groups(raw: &str, anchors: &[(String, String)]) -> Vec<NameInfoGroup> {
    let mut anchor_index = 0;
    NAME_YEARS_RE
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_string();
            let url = match anchors.get(anchor_index) {
                Some((text, href)) if *text == name => {
                    anchor_index += 1;
                    Some(href.clone())
                }
                _ => None,
            };
            NameInfoGroup {
                name,
                alias: None,
                info: caps[2].to_string(),
                url,
            }
        })
        .collect()
}

/// Split an info segment into instrument/role tokens and year ranges.
pub(crate) fn instruments_and_years(info: &str) -> (Vec<String>, Vec<String>) {
    let mut instruments = Vec::new();
    let mut years = Vec::new();
    for caps in INFO_TOKEN_RE.captures_iter(info) {
        if let Some(m) = caps.get(1) {
            instruments.push(m.as_str().trim().to_string());
        } else if let Some(m) = caps.get(2) {
            years.push(m.as_str().to_string());
        }
    }
    (instruments, years)
}

/// Comma-separated names inside an element, each matched against the
/// element's anchors in order to recover an optional profile URL.
pub(crate) fn linked_names(el: ElementRef<'_>) -> Vec<SimpleArtist> {
    let anchors = anchors_of(el);
    let mut anchor_index = 0;
    comma_list(&text_of(el))
        .into_iter()
        .map(|name| {
            let url = match anchors.get(anchor_index) {
                Some((text, href)) if *text == name => {
                    anchor_index += 1;
                    Some(href.clone())
                }
                _ => None,
            };
            SimpleArtist { name, url }
        })
        .collect()
}

/// A credited role's reference to tracks by number or inclusive range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrackToken {
    Single(String),
    Range(String, String),
}

/// Tokenize role-track notation: a mix of single numbers and ranges.
pub(crate) fn track_tokens(text: &str) -> Vec<TrackToken> {
    TRACK_TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            if let Some(range) = caps.get(1) {
                let (start, end) = range.as_str().split_once('-')?;
                Some(TrackToken::Range(start.to_string(), end.to_string()))
            } else {
                caps.get(2).map(|m| TrackToken::Single(m.as_str().to_string()))
            }
        })
        .collect()
}

/// Decode the `data-links` platform map into browsable URLs.
///
/// Known platforms each have their own URL shape; unknown platform keys
/// are ignored.
pub(crate) fn release_links(links_json: &Value) -> ReleaseLinks {
    let mut links = ReleaseLinks::default();
    let Some(platforms) = links_json.as_object() else {
        return links;
    };
    for (platform, entry) in platforms {
        match platform.as_str() {
            "spotify" => {
                links.spotify = first_key(entry).map(|id| format!("https://open.spotify.com/album/{id}"));
            }
            "youtube" => {
                links.youtube = first_key(entry).map(|id| format!("https://www.youtube.com/watch?v={id}"));
            }
            "bandcamp" => {
                links.bandcamp = first_url(entry).map(|url| format!("https://{url}"));
            }
            "soundcloud" => {
                links.soundcloud = first_url(entry).map(|url| format!("https://{url}"));
            }
            "applemusic" => {
                links.apple_music = entry.as_object().and_then(|map| {
                    let (id, value) = map.iter().next()?;
                    let loc = value.get("loc")?.as_str()?;
                    let album = value.get("album")?.as_str()?;
                    Some(format!("https://music.apple.com/{loc}/album/{album}/{id}"))
                });
            }
            _ => {}
        }
    }
    links
}

fn first_key(entry: &Value) -> Option<&str> {
    entry.as_object()?.keys().next().map(String::as_str)
}

fn first_url(entry: &Value) -> Option<&str> {
    entry
        .as_object()?
        .values()
        .find_map(|v| v.get("url").and_then(Value::as_str).filter(|u| !u.is_empty()))
}

/// Parse a displayed count ("90,244", "312 issues") into a number.
pub(crate) fn count_number(text: &str) -> Option<u32> {
    let cleaned = text.replace(',', "");
    COUNT_RE.find(&cleaned)?.as_str().parse().ok()
}

/// Rewrite the trailing page-number segment of a collection URL, keeping
/// any sort suffix intact.
pub(crate) fn rewrite_page_number(url: &str, page: u32) -> String {
    PAGE_SUFFIX_RE
        .replace(url, |caps: &regex::Captures<'_>| {
            format!("{page}{}/", caps.get(2).map_or("", |m| m.as_str()))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_date_year_only() {
        let date = partial_date("1994").unwrap();
        assert_eq!(date.year, 1994);
        assert_eq!(date.month, None);
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_partial_date_month_year() {
        let date = partial_date("March 1994").unwrap();
        assert_eq!(date.year, 1994);
        assert_eq!(date.month, Some(3));
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_partial_date_full() {
        let date = partial_date("14 March 1994").unwrap();
        assert_eq!(date.year, 1994);
        assert_eq!(date.month, Some(3));
        assert_eq!(date.day, Some(14));
    }

    #[test]
    fn test_partial_date_invalid_input() {
        assert_eq!(partial_date("not a date"), None);
        assert_eq!(partial_date(""), None);
        assert_eq!(partial_date("the 14th of March 1994"), None);
        assert_eq!(partial_date("32 March 1994"), None);
    }

    #[test]
    fn test_labeled_date() {
        let date = labeled_date("TypeAlbumReleased14 March 1994Recorded1993", "Released").unwrap();
        assert_eq!((date.year, date.month, date.day), (1994, Some(3), Some(14)));

        let recorded = labeled_date("TypeAlbumReleased14 March 1994Recorded1993", "Recorded").unwrap();
        assert_eq!((recorded.year, recorded.month), (1993, None));
    }

    #[test]
    fn test_genre_list_trims_names() {
        let genres = genre_list("Ambient, Drone,  Dark Ambient");
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Ambient", "Drone", "Dark Ambient"]);
    }

    #[test]
    fn test_location_component_counts() {
        let three = location("Manchester, England, United Kingdom", None);
        assert_eq!(three.city.as_deref(), Some("Manchester"));
        assert_eq!(three.state.as_deref(), Some("England"));
        assert_eq!(three.country, "United Kingdom");

        let two = location("England, United Kingdom", None);
        assert_eq!(two.city, None);
        assert_eq!(two.state.as_deref(), Some("England"));

        let one = location("Japan", None);
        assert_eq!(one.state, None);
        assert_eq!(one.country, "Japan");
    }

    #[test]
    fn test_name_info_groups_with_anchor_matching() {
        let raw = "Alan Wilder [Recall] (synthesizer, drums, 1982-95) Martin Gore (guitar)";
        let anchors = vec![(
            "Alan Wilder".to_string(),
            "https://rateyourmusic.com/artist/alan-wilder".to_string(),
        )];
        let groups = name_info_groups(raw, &anchors);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Alan Wilder");
        assert_eq!(groups[0].alias.as_deref(), Some("Recall"));
        assert_eq!(
            groups[0].url.as_deref(),
            Some("https://rateyourmusic.com/artist/alan-wilder")
        );
        assert_eq!(groups[1].name, "Martin Gore");
        assert_eq!(groups[1].url, None);
    }

    #[test]
    fn test_instruments_and_years_split() {
        let (instruments, years) = instruments_and_years("synthesizer, drums, 1982-95");
        assert_eq!(instruments, ["synthesizer", "drums"]);
        assert_eq!(years, ["1982-95"]);
    }

    #[test]
    fn test_track_tokens() {
        assert_eq!(
            track_tokens("1-3, 5"),
            [
                TrackToken::Range("1".into(), "3".into()),
                TrackToken::Single("5".into())
            ]
        );
    }

    #[test]
    fn test_release_links_known_and_unknown_platforms() {
        let json: Value = serde_json::from_str(
            r#"{
                "spotify": {"6VCp4bLroJGQ2R1zvY9rGR": {"default": true}},
                "bandcamp": {"123": {"url": "artist.bandcamp.com/album/x"}},
                "myspace": {"ignored": {}}
            }"#,
        )
        .unwrap();
        let links = release_links(&json);
        assert_eq!(
            links.spotify.as_deref(),
            Some("https://open.spotify.com/album/6VCp4bLroJGQ2R1zvY9rGR")
        );
        assert_eq!(
            links.bandcamp.as_deref(),
            Some("https://artist.bandcamp.com/album/x")
        );
        assert_eq!(links.youtube, None);
        assert_eq!(links.apple_music, None);
    }

    #[test]
    fn test_rewrite_page_number() {
        assert_eq!(
            rewrite_page_number("https://rateyourmusic.com/charts/top/album/5/", 6),
            "https://rateyourmusic.com/charts/top/album/6/"
        );
        assert_eq!(
            rewrite_page_number("https://rateyourmusic.com/genres/ambient/1.d/", 2),
            "https://rateyourmusic.com/genres/ambient/2.d/"
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Depeche Mode"), "depeche-mode");
    }
}
