//! # rustym
//!
//! A Rust library for extracting structured data from RateYourMusic's
//! rendered HTML pages.
//!
//! The site exposes no stable machine-readable contract, so everything
//! here is built on one idiom: fetch a page, parse it into a document
//! tree, and run selector-based extraction rules that turn it into a
//! typed entity (release, artist, genre, chart, label, list, review,
//! user). All fetches of a session share one rate limiter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rustym::RymClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rym = RymClient::new();
//!
//!     // Fetch a release and walk its tracklist
//!     let release = rym.get_release("https://rateyourmusic.com/release/album/radiohead/ok-computer/")?;
//!     for track in &release.tracklist {
//!         println!("{} {}", track.number, track.title);
//!     }
//!
//!     // Fetch an artist by name
//!     let artist = rym.get_artist_by_name("Depeche Mode")?;
//!     println!("{} has {} members", artist.name, artist.members.len());
//!
//!     // Build a filtered chart
//!     use rustym::{ChartParams, ChartType};
//!     let mut chart = rym.chart(ChartParams::new(ChartType::Top).with_genre("Ambient"))?;
//!     chart.load_more(&rym)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed entities** for releases, artists, genres, charts, labels,
//!   lists, reviews and users
//! - **Paginated collections** that fetch page 1 eagerly and grow one
//!   page at a time
//! - **Lightweight references** (name + URL) upgradeable into full
//!   entities on demand
//! - **Shared rate limiting** across every fetch of a session

pub mod client;
pub mod collection;
pub mod error;
mod extract;
pub mod limiter;
pub mod models;

pub use client::{RymClient, ROOT_URL};
pub use collection::{EntryCollection, PageExtract};
pub use error::{Result, RymError};
pub use limiter::RateLimiter;
pub use models::{
    Artist, BandMember, Chart, ChartParams, ChartType, CreditedArtist, CreditedRelease,
    Discography, Distributor, DistributorEntry, Genre, GenreReleases, Label, LabelDistributor,
    Location, PartialDate, Release, ReleaseIssue, ReleaseLinks, ReleaseLists, ReleaseReviews,
    ReleaseType, Review, Role, RymList, SimpleArtist, SimpleDistributor, SimpleGenre, SimpleIssue,
    SimpleLabel, SimpleList, SimpleRelease, SimpleUser, Track, User, YearRange,
};
