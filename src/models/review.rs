//! Reviews of releases.

use chrono::NaiveDate;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::RymClient;
use crate::error::{Result, RymError};
use crate::extract;
use crate::models::simple::{SimpleRelease, SimpleUser};

/// A dated, rated, authored review of a release.
///
/// Reviews come from two places: rows of a release's review pages,
/// where everything is pre-populated from the row, and standalone
/// review pages fetched through [`RymClient::get_review`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<SimpleUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// The reviewed release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<SimpleRelease>,
}

impl Review {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url)
    }

    pub(crate) fn from_document(doc: &Html, url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            author: Some(fetch_author(doc)?),
            content: fetch_content(doc),
            rating: fetch_rating(doc),
            date: fetch_date(doc),
            release: Some(fetch_release(doc)?),
        })
    }
}

fn fetch_author(doc: &Html) -> Result<SimpleUser> {
    let sel = extract::selector("a.user");
    let a = doc
        .select(&sel)
        .next()
        .ok_or_else(|| RymError::NoContent("No author was found for the review".into()))?;
    Ok(SimpleUser {
        name: extract::text_of(a).trim().to_string(),
        url: a.attr("href").map(extract::absolute_url),
    })
}

fn fetch_content(doc: &Html) -> Option<String> {
    let sel = extract::selector(".page_review_feature_body_inner");
    let text = extract::text_of(doc.select(&sel).next()?).trim().to_string();
    Some(text).filter(|t| !t.is_empty())
}

fn fetch_rating(doc: &Html) -> Option<f32> {
    let sel = extract::selector(".page_review_feature_rating");
    doc.select(&sel)
        .next()
        .and_then(|el| el.attr("content"))
        .and_then(|content| content.parse().ok())
}

fn fetch_date(doc: &Html) -> Option<NaiveDate> {
    let sel = extract::selector(".review_date");
    let text = extract::first_text(doc.select(&sel).next()?)?;
    NaiveDate::parse_from_str(&text, "%B %d %Y").ok()
}

fn fetch_release(doc: &Html) -> Result<SimpleRelease> {
    let sel = extract::selector("a.album");
    let a = doc
        .select(&sel)
        .next()
        .ok_or_else(|| RymError::NoContent("No release was found for the review".into()))?;
    let url = a
        .attr("href")
        .map(extract::absolute_url)
        .ok_or_else(|| RymError::NoContent("No URL was found for the release".into()))?;
    Ok(SimpleRelease::new(
        extract::text_of(a).trim().to_string(),
        Some(url),
    ))
}
