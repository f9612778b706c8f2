//! Value types shared across entity models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::release::Track;

/// A date known at year, month, or day granularity.
///
/// The site writes dates at three granularities ("1994", "March 1994",
/// "14 March 1994"); month and day stay `None` when unknown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialDate {
    /// Year.
    pub year: i32,

    /// Month (1-12), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    /// Day (1-31), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl PartialDate {
    /// Year-only date.
    pub fn from_year(year: i32) -> Self {
        Self { year, month: None, day: None }
    }

    /// Month + year date.
    pub fn from_year_month(year: i32, month: u32) -> Self {
        Self { year, month: Some(month), day: None }
    }

    /// Full date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self { year, month: Some(month), day: Some(day) }
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => write!(f, "{:04}-{:02}", self.year, m),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

/// A place written as "city, state, country" (any prefix may be absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// City, when all three components are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// State or region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Country; the only component that is always present.
    pub country: String,

    /// Location browse URL, when extracted from an anchor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(city) = &self.city {
            write!(f, "{city}, ")?;
        }
        if let Some(state) = &self.state {
            write!(f, "{state}, ")?;
        }
        write!(f, "{}", self.country)
    }
}

/// Inclusive year range used by chart filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Browsable links to a release on external platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandcamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundcloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple_music: Option<String>,
}

/// A named capacity in which an artist contributed to a release.
///
/// The credits page writes track references as number/range notation
/// ("3", "5-7"); `notation` keeps the raw form and `tracks` holds the
/// references resolved against the release tracklist in a second pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Role {
    /// Role name as credited ("vocals", "producer", ...).
    pub name: String,

    /// Raw number/range notation, if the role is scoped to tracks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,

    /// Tracks the role applies to, once bound against the tracklist.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Role {
    /// Role with no track scoping.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), notation: None, tracks: Vec::new() }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tracks.is_empty() {
            write!(f, "{}", self.name)
        } else {
            let numbers: Vec<&str> = self.tracks.iter().map(|t| t.number.as_str()).collect();
            write!(f, "{} on {}", self.name, numbers.join(","))
        }
    }
}
