//! User profiles.

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::RymClient;
use crate::error::{Result, RymError};
use crate::extract;
use crate::models::simple::{SimpleArtist, SimpleUser};

/// A fully fetched user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub url: String,
    pub favorite_artists: Vec<SimpleArtist>,
    /// Friends shown on the profile page itself.
    pub recently_online_friends: Vec<SimpleUser>,
    #[serde(skip)]
    friends: Option<Vec<SimpleUser>>,
}

impl User {
    pub(crate) fn fetch(client: &RymClient, url: &str) -> Result<Self> {
        let username = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(|segment| segment.trim_start_matches('~').to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| RymError::Parse("No username in profile URL".into()))?;
        let doc = client.fetch_document(url)?;
        Ok(Self {
            username,
            url: url.to_string(),
            favorite_artists: fetch_favorite_artists(&doc),
            recently_online_friends: fetch_recently_online_friends(&doc),
            friends: None,
        })
    }

    /// The user's full friends list. Fetched from the friends page on
    /// first access and cached.
    pub fn friends(&mut self, client: &RymClient) -> Result<&[SimpleUser]> {
        if self.friends.is_none() {
            let url = self.url.replace('~', "friends/");
            let doc = client.fetch_document(&url)?;
            self.friends = Some(fetch_friends(&doc));
        }
        Ok(self.friends.as_deref().expect("populated above"))
    }
}

/// Anchors of the "favorite artists" block that point at artist pages.
fn fetch_favorite_artists(doc: &Html) -> Vec<SimpleArtist> {
    let Some(block) = extract::labeled_block(doc, ".bubble_header", "favorite artists") else {
        return Vec::new();
    };
    let anchor_sel = extract::selector("a[href]");
    block
        .select(&anchor_sel)
        .filter(|a| {
            a.attr("title")
                .is_some_and(|title| title.starts_with("[Artist"))
        })
        .map(|a| {
            SimpleArtist::new(
                extract::text_of(a).trim().to_string(),
                a.attr("href").map(extract::absolute_url),
            )
        })
        .collect()
}

fn fetch_recently_online_friends(doc: &Html) -> Vec<SimpleUser> {
    let sel = extract::selector("#ftabfriends td");
    doc.select(&sel)
        .filter_map(|td| {
            let name = extract::text_of(td).trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(SimpleUser::new(name, None))
        })
        .collect()
}

fn fetch_friends(doc: &Html) -> Vec<SimpleUser> {
    let sel = extract::selector(".or_card_frame_inner");
    doc.select(&sel)
        .filter_map(|card| {
            let name = extract::text_of(card).trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(SimpleUser::new(name, None))
        })
        .collect()
}
