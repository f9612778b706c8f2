//! RateYourMusic client session.
//!
//! The site exposes no machine-readable API; every operation fetches a
//! rendered HTML page and hands the parsed tree to an entity builder.
//! One [`RymClient`] owns the HTTP client and the rate limiter shared
//! by every fetch of the session.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::Html;
use tracing::debug;

use crate::error::{Result, RymError};
use crate::limiter::RateLimiter;
use crate::models::artist::Artist;
use crate::models::chart::{Chart, ChartParams};
use crate::models::genre::Genre;
use crate::models::label::{Distributor, Label};
use crate::models::list::RymList;
use crate::models::release::{Release, ReleaseIssue};
use crate::models::review::Review;
use crate::models::user::User;

/// Base origin for every canonical RateYourMusic URL.
pub const ROOT_URL: &str = "https://rateyourmusic.com";

/// Identification header sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Client for fetching RateYourMusic entities.
///
/// # Example
///
/// ```rust,no_run
/// use rustym::RymClient;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let rym = RymClient::new();
///     let artist = rym.get_artist_by_name("Depeche Mode")?;
///     println!("{} formed {:?}", artist.name, artist.start_date);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RymClient {
    http: Client,
    limiter: RateLimiter,
}

impl Default for RymClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RymClient {
    /// Create a client with the default rate limit.
    pub fn new() -> Self {
        Self::with_limiter(RateLimiter::default())
    }

    /// Create a client drawing from an explicitly constructed limiter.
    pub fn with_limiter(limiter: RateLimiter) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        Self { http, limiter }
    }

    /// The limiter all fetches of this session draw from.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// GET a page and parse it into a navigable document tree.
    ///
    /// Blocks on the rate limiter first. Any status other than 200 is a
    /// [`RymError::RequestFailed`] carrying the status code.
    pub(crate) fn fetch_document(&self, url: &str) -> Result<Html> {
        self.limiter.acquire();
        debug!("GET {url}");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(RymError::RequestFailed(status.as_u16()));
        }
        let body = response.text()?;
        Ok(Html::parse_document(&body))
    }

    /// Get a release by its canonical URL.
    pub fn get_release(&self, url: &str) -> Result<Release> {
        Release::fetch(self, url)
    }

    /// Get the full release view of a single issue by its URL.
    pub fn get_release_issue(&self, url: &str) -> Result<ReleaseIssue> {
        ReleaseIssue::fetch(self, url)
    }

    /// Get an artist by profile URL.
    pub fn get_artist(&self, url: &str) -> Result<Artist> {
        Artist::fetch(self, url, 0)
    }

    /// Get an artist by name, deriving the canonical profile URL.
    pub fn get_artist_by_name(&self, name: &str) -> Result<Artist> {
        Artist::fetch(self, &Artist::url_for_name(name, 0), 0)
    }

    /// Get a genre by page URL.
    pub fn get_genre(&self, url: &str) -> Result<Genre> {
        Genre::fetch(self, url)
    }

    /// Get a genre by name, deriving the canonical page URL.
    pub fn get_genre_by_name(&self, name: &str) -> Result<Genre> {
        Genre::fetch(self, &Genre::url_for_name(name))
    }

    /// Get a label by page URL.
    pub fn get_label(&self, url: &str) -> Result<Label> {
        Label::fetch(self, url)
    }

    /// Get a distributor by page URL.
    pub fn get_distributor(&self, url: &str) -> Result<Distributor> {
        Distributor::fetch(self, url)
    }

    /// Get a user profile by URL.
    pub fn get_user(&self, url: &str) -> Result<User> {
        User::fetch(self, url)
    }

    /// Get a user profile by username.
    pub fn get_user_by_name(&self, username: &str) -> Result<User> {
        User::fetch(self, &format!("{ROOT_URL}/~{username}"))
    }

    /// Get a user-curated list by URL.
    pub fn get_list(&self, url: &str) -> Result<RymList> {
        RymList::fetch(self, url)
    }

    /// Get a single review by URL.
    pub fn get_review(&self, url: &str) -> Result<Review> {
        Review::fetch(self, url)
    }

    /// Get a chart for the given filter parameters.
    pub fn chart(&self, params: ChartParams) -> Result<Chart> {
        Chart::fetch(self, params)
    }
}
