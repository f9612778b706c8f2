//! Lightweight name + URL references, upgradeable into full entities.
//!
//! Simple entities are value objects carrying whatever a listing row
//! exposed (a name, a URL, sometimes a little more). They perform no
//! fetch at construction and hold no back-reference to the page they
//! came from; the upgrade methods run exactly one full entity build
//! against the stored URL and fail with [`RymError::NoUrl`] when no URL
//! is present.

use serde::{Deserialize, Serialize};

use crate::client::RymClient;
use crate::error::{Result, RymError};
use crate::models::artist::Artist;
use crate::models::common::{PartialDate, Role};
use crate::models::genre::Genre;
use crate::models::label::{Distributor, Label};
use crate::models::list::RymList;
use crate::models::release::{Release, ReleaseIssue};
use crate::models::user::User;

fn required_url(url: Option<&str>) -> Result<&str> {
    url.ok_or(RymError::NoUrl)
}

/// Reference to an artist profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleArtist {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SimpleArtist {
    pub fn new<S: Into<String>>(name: S, url: Option<String>) -> Self {
        Self { name: name.into(), url }
    }

    /// Fetch the full artist profile behind this reference.
    pub fn get_artist(&self, client: &RymClient) -> Result<Artist> {
        client.get_artist(required_url(self.url.as_deref())?)
    }
}

/// Reference to a genre page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleGenre {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SimpleGenre {
    /// Genre reference from a bare name, as decoded out of comma lists.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), url: None }
    }

    /// Fetch the full genre page behind this reference.
    pub fn get_genre(&self, client: &RymClient) -> Result<Genre> {
        client.get_genre(required_url(self.url.as_deref())?)
    }
}

/// Reference to a release, carrying whatever the listing row exposed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimpleRelease {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display credit, which may differ from the artists' own names for
    /// collaborations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<SimpleArtist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_ratings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Whether the row was emphasised in its listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bolded: Option<bool>,
}

impl SimpleRelease {
    pub fn new<S: Into<String>>(title: S, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            url,
            ..Default::default()
        }
    }

    /// Fetch the full release behind this reference.
    pub fn get_release(&self, client: &RymClient) -> Result<Release> {
        client.get_release(required_url(self.url.as_deref())?)
    }
}

/// Reference to a user-curated list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleList {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<SimpleUser>,
}

impl SimpleList {
    pub fn new<S: Into<String>>(title: S, url: Option<String>) -> Self {
        Self { title: title.into(), url, author: None }
    }

    /// Fetch the full list behind this reference.
    pub fn get_list(&self, client: &RymClient) -> Result<RymList> {
        client.get_list(required_url(self.url.as_deref())?)
    }
}

/// Reference to a user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleUser {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SimpleUser {
    pub fn new<S: Into<String>>(name: S, url: Option<String>) -> Self {
        Self { name: name.into(), url }
    }

    /// Fetch the full user profile behind this reference.
    pub fn get_user(&self, client: &RymClient) -> Result<User> {
        client.get_user(required_url(self.url.as_deref())?)
    }
}

/// Reference to a label page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleLabel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SimpleLabel {
    pub fn new<S: Into<String>>(name: S, url: Option<String>) -> Self {
        Self { name: name.into(), url }
    }

    /// Fetch the full label page behind this reference.
    pub fn get_label(&self, client: &RymClient) -> Result<Label> {
        client.get_label(required_url(self.url.as_deref())?)
    }
}

/// Reference to a plain distributor page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleDistributor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Years the distribution arrangement covered, as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<String>,
}

impl SimpleDistributor {
    /// Fetch the full distributor page behind this reference.
    pub fn get_distributor(&self, client: &RymClient) -> Result<Distributor> {
        client.get_distributor(required_url(self.url.as_deref())?)
    }
}

/// A distributor that is itself a label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelDistributor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<String>,
}

impl LabelDistributor {
    /// Fetch the full label page behind this reference.
    pub fn get_label(&self, client: &RymClient) -> Result<Label> {
        client.get_label(required_url(self.url.as_deref())?)
    }
}

/// A row of a label's distributor listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DistributorEntry {
    /// The distributor has its own label page.
    Label(LabelDistributor),
    /// Plain distributor.
    Distributor(SimpleDistributor),
}

/// Reference to an alternate pressing/edition of a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimpleIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<SimpleLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

impl SimpleIssue {
    /// Fetch the full release view of this issue.
    pub fn get_release_issue(&self, client: &RymClient) -> Result<ReleaseIssue> {
        client.get_release_issue(required_url(self.url.as_deref())?)
    }
}

/// A band member row: an artist reference plus membership details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandMember {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_active: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aka: Option<String>,
}

impl BandMember {
    /// Fetch the member's own artist profile.
    pub fn get_artist(&self, client: &RymClient) -> Result<Artist> {
        client.get_artist(required_url(self.url.as_deref())?)
    }
}

/// A contributor credited on a release, with the roles they held.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreditedArtist {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub roles: Vec<Role>,
}

impl CreditedArtist {
    /// Fetch the contributor's artist profile.
    pub fn get_artist(&self, client: &RymClient) -> Result<Artist> {
        client.get_artist(required_url(self.url.as_deref())?)
    }
}

/// A release an artist is credited on, from the artist credits page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreditedRelease {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub roles: Vec<Role>,
}

impl CreditedRelease {
    /// Fetch the full release behind this credit.
    pub fn get_release(&self, client: &RymClient) -> Result<Release> {
        client.get_release(required_url(self.url.as_deref())?)
    }
}
