//! Label and distributor pages.

use std::collections::HashMap;

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::RymClient;
use crate::error::{Result, RymError};
use crate::extract;
use crate::models::chart::Chart;
use crate::models::common::{Location, PartialDate};
use crate::models::simple::{
    DistributorEntry, LabelDistributor, SimpleArtist, SimpleDistributor, SimpleGenre,
};

/// A fully fetched label page.
#[derive(Debug, Serialize, Deserialize)]
pub struct Label {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub genres: Vec<SimpleGenre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_releases: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founder: Option<SimpleArtist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_location: Option<Location>,
    /// External links keyed by their lowercased aria label.
    pub links: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub distributors: Vec<DistributorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// URL of the label's chart, when the page links one.
    #[serde(skip_serializing_if = "Option::is_none")]
    chart_link: Option<String>,
    #[serde(skip)]
    chart: Option<Chart>,
}

impl Label {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url)
    }

    pub(crate) fn from_document(doc: &Html, url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            name: fetch_name(doc)?,
            logo: fetch_logo(doc),
            genres: fetch_genres(doc),
            number_of_releases: fetch_release_count(doc),
            founder: fetch_founder(doc),
            start_date: fetch_start_date(doc),
            start_location: fetch_start_location(doc),
            links: fetch_links(doc),
            address: fetch_address(doc),
            distributors: fetch_distributors(doc),
            notes: fetch_notes(doc),
            chart_link: fetch_chart_link(doc),
            chart: None,
        })
    }

    /// The label's chart, when the page links one. Fetched on first
    /// access and cached.
    pub fn chart(&mut self, client: &RymClient) -> Result<&mut Chart> {
        if self.chart.is_none() {
            let url = self
                .chart_link
                .clone()
                .ok_or_else(|| RymError::NoContent(format!("{} links no chart", self.name)))?;
            self.chart = Some(Chart::fetch_url(client, &url)?);
        }
        Ok(self.chart.as_mut().expect("populated above"))
    }
}

fn fetch_chart_link(doc: &Html) -> Option<String> {
    for css in [".page_section_charts.link_only a[href]", ".page_section_charts_header a[href]"] {
        let sel = extract::selector(css);
        if let Some(href) = doc.select(&sel).next().and_then(|a| a.attr("href")) {
            return Some(extract::absolute_url(href));
        }
    }
    None
}

fn fetch_name(doc: &Html) -> Result<String> {
    let sel = extract::selector(".page_company_music_section_name_inner h1");
    doc.select(&sel)
        .next()
        .and_then(extract::first_text)
        .ok_or_else(|| RymError::Parse("No label name was found".into()))
}

fn fetch_logo(doc: &Html) -> Option<String> {
    let sel = extract::selector("picture img");
    doc.select(&sel)
        .last()
        .and_then(|img| img.attr("src"))
        .map(str::to_string)
}

fn fetch_genres(doc: &Html) -> Vec<SimpleGenre> {
    let sel = extract::selector(".page_company_music_genres");
    doc.select(&sel)
        .next()
        .map(|el| extract::genre_list(&extract::text_of(el)))
        .unwrap_or_default()
}

fn fetch_release_count(doc: &Html) -> Option<u32> {
    let sel = extract::selector(".page_company_music_release_count");
    doc.select(&sel)
        .next()
        .and_then(|el| extract::count_number(&extract::text_of(el)))
}

fn fetch_founder(doc: &Html) -> Option<SimpleArtist> {
    let sel = extract::selector(".page_company_music_main_info_founded_main a.artist");
    let a = doc.select(&sel).next()?;
    Some(SimpleArtist::new(
        extract::text_of(a).trim().to_string(),
        a.attr("href").map(extract::absolute_url),
    ))
}

fn fetch_start_date(doc: &Html) -> Option<PartialDate> {
    let sel = extract::selector(".page_company_music_main_info_founded_main b");
    let text = extract::text_of(doc.select(&sel).next()?);
    extract::partial_date(text.trim())
}

fn fetch_start_location(doc: &Html) -> Option<Location> {
    let sel = extract::selector(".page_company_music_main_info_founded_location");
    let text = extract::text_of(doc.select(&sel).next()?);
    let trimmed = text.replace('\n', " ").trim().to_string();
    Some(extract::location(&trimmed, None)).filter(|l| !l.country.is_empty())
}

fn fetch_links(doc: &Html) -> HashMap<String, String> {
    let sel = extract::selector(".links a[aria-label][href]");
    doc.select(&sel)
        .filter_map(|a| {
            Some((
                a.attr("aria-label")?.to_lowercase(),
                a.attr("href")?.to_string(),
            ))
        })
        .collect()
}

fn fetch_address(doc: &Html) -> Option<String> {
    let sel = extract::selector(".address");
    let el = doc.select(&sel).next()?;
    let address = extract::text_with_breaks(el).trim().to_string();
    Some(address).filter(|a| !a.is_empty())
}

fn fetch_distributors(doc: &Html) -> Vec<DistributorEntry> {
    let Some(info) = extract::labeled_block(doc, "td", "Distributors") else {
        return Vec::new();
    };
    let anchors = extract::anchors_of(info);
    extract::name_years_groups(&extract::text_of(info), &anchors)
        .into_iter()
        .map(|group| {
            let is_label = group
                .url
                .as_deref()
                .is_some_and(|url| url.contains("/label/"));
            if is_label {
                DistributorEntry::Label(LabelDistributor {
                    name: group.name,
                    url: group.url,
                    years: Some(group.info).filter(|y| !y.is_empty()),
                })
            } else {
                DistributorEntry::Distributor(SimpleDistributor {
                    name: group.name,
                    url: group.url,
                    years: Some(group.info).filter(|y| !y.is_empty()),
                })
            }
        })
        .collect()
}

fn fetch_notes(doc: &Html) -> Option<String> {
    let info = extract::labeled_block(doc, "td", "Notes")?;
    let text = extract::text_of(info).trim().to_string();
    Some(text).filter(|t| !t.is_empty())
}

/// A fully fetched distributor page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributor {
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Free-text profile from the page's wiki section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl Distributor {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url)
    }

    pub(crate) fn from_document(doc: &Html, url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            name: fetch_distributor_name(doc)?,
            logo: fetch_distributor_logo(doc),
            profile: fetch_profile(doc),
        })
    }
}

fn fetch_distributor_name(doc: &Html) -> Result<String> {
    let sel = extract::selector("#wiki_content .bubble_header");
    doc.select(&sel)
        .next()
        .and_then(extract::first_text)
        .ok_or_else(|| RymError::Parse("No distributor name was found".into()))
}

fn fetch_distributor_logo(doc: &Html) -> Option<String> {
    let sel = extract::selector(".wiki-image");
    doc.select(&sel)
        .next()
        .and_then(|img| img.attr("src"))
        .map(str::to_string)
}

/// Profile text: everything following the first section heading.
fn fetch_profile(doc: &Html) -> Option<String> {
    let sel = extract::selector("h2");
    let heading = doc.select(&sel).next()?;
    let mut paragraphs = Vec::new();
    let mut current = extract::next_sibling_element(heading);
    while let Some(el) = current {
        let text = extract::text_with_breaks(el).trim().to_string();
        if !text.is_empty() {
            paragraphs.push(text);
        }
        current = extract::next_sibling_element(el);
    }
    Some(paragraphs.join("\n")).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL_HTML: &str = r##"
        <html><body>
            <div class="page_company_music_section_name_inner"><h1>4AD</h1></div>
            <picture><img src="//e.snmc.io/logo-small.png"><img src="//e.snmc.io/logo.png"></picture>
            <div class="page_company_music_genres">Dream Pop, Post-Punk</div>
            <div class="page_company_music_release_count">1,204 releases</div>
            <div class="page_company_music_main_info_founded_main">
                Founded <b>1980</b> by <a class="artist" href="/artist/ivo-watts-russell">Ivo Watts-Russell</a>
            </div>
            <div class="page_company_music_main_info_founded_location">
                London, United Kingdom
            </div>
            <div class="links">
                <a aria-label="Website" href="https://4ad.com"></a>
                <a aria-label="Bandcamp" href="https://4ad.bandcamp.com"></a>
            </div>
            <div class="address">17-19 Alma Road<br>London SW18 1AA</div>
            <table><tr>
                <td>Distributors</td>
                <td><span><a href="/label/beggars-group">Beggars Group</a> [1987-2010] Plain Carrier [2011-2015]</span></td>
            </tr><tr>
                <td>Notes</td>
                <td>Part of the Beggars Group.</td>
            </tr></table>
        </body></html>
    "##;

    fn label() -> Label {
        let doc = Html::parse_document(LABEL_HTML);
        Label::from_document(&doc, "https://rateyourmusic.com/label/4ad/").unwrap()
    }

    #[test]
    fn test_header_fields() {
        let label = label();
        assert_eq!(label.name, "4AD");
        assert_eq!(label.logo.as_deref(), Some("//e.snmc.io/logo.png"));
        let genres: Vec<&str> = label.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(genres, ["Dream Pop", "Post-Punk"]);
        assert_eq!(label.number_of_releases, Some(1204));
        assert_eq!(
            label.founder.as_ref().map(|f| f.name.as_str()),
            Some("Ivo Watts-Russell")
        );
        assert_eq!(label.start_date.map(|d| d.year), Some(1980));
        let location = label.start_location.unwrap();
        assert_eq!(location.state.as_deref(), Some("London"));
        assert_eq!(location.country, "United Kingdom");
    }

    #[test]
    fn test_links_and_address() {
        let label = label();
        assert_eq!(label.links.get("website").map(String::as_str), Some("https://4ad.com"));
        assert_eq!(
            label.links.get("bandcamp").map(String::as_str),
            Some("https://4ad.bandcamp.com")
        );
        assert_eq!(label.address.as_deref(), Some("17-19 Alma Road\nLondon SW18 1AA"));
    }

    #[test]
    fn test_distributor_rows() {
        let label = label();
        assert_eq!(label.distributors.len(), 2);
        match &label.distributors[0] {
            DistributorEntry::Label(dist) => {
                assert_eq!(dist.name, "Beggars Group");
                assert_eq!(
                    dist.url.as_deref(),
                    Some("https://rateyourmusic.com/label/beggars-group")
                );
                assert_eq!(dist.years.as_deref(), Some("1987-2010"));
            }
            other => panic!("expected a label distributor, got {other:?}"),
        }
        match &label.distributors[1] {
            DistributorEntry::Distributor(dist) => {
                assert_eq!(dist.name, "Plain Carrier");
                assert_eq!(dist.url, None);
                assert_eq!(dist.years.as_deref(), Some("2011-2015"));
            }
            other => panic!("expected a plain distributor, got {other:?}"),
        }
        assert_eq!(label.notes.as_deref(), Some("Part of the Beggars Group."));
    }

    #[test]
    fn test_distributor_page() {
        const DISTRIBUTOR_HTML: &str = r#"
            <html><body>
                <div id="wiki_content">
                    <div class="bubble_header">Beggars Group</div>
                </div>
                <img class="wiki-image" src="//e.snmc.io/beggars.png">
                <h2>Profile</h2>
                <p>Independent distributor based in London.</p>
                <p>Distributes several labels.</p>
            </body></html>
        "#;
        let doc = Html::parse_document(DISTRIBUTOR_HTML);
        let dist =
            Distributor::from_document(&doc, "https://rateyourmusic.com/distributor/beggars/").unwrap();
        assert_eq!(dist.name, "Beggars Group");
        assert_eq!(dist.logo.as_deref(), Some("//e.snmc.io/beggars.png"));
        assert_eq!(
            dist.profile.as_deref(),
            Some("Independent distributor based in London.\nDistributes several labels.")
        );
    }
}
