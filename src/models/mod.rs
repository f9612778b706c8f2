//! Domain models for RateYourMusic entities.

pub mod artist;
pub mod chart;
pub mod common;
pub mod genre;
pub mod label;
pub mod list;
pub mod release;
pub mod review;
pub mod simple;
pub mod user;

pub use artist::{Artist, Discography};
pub use chart::{Chart, ChartParams, ChartType, ReleaseType};
pub use common::{Location, PartialDate, ReleaseLinks, Role, YearRange};
pub use genre::{Genre, GenreReleases};
pub use label::{Distributor, Label};
pub use list::RymList;
pub use release::{Release, ReleaseIssue, ReleaseLists, ReleaseReviews, Track};
pub use review::Review;
pub use simple::{
    BandMember, CreditedArtist, CreditedRelease, DistributorEntry, LabelDistributor, SimpleArtist,
    SimpleDistributor, SimpleGenre, SimpleIssue, SimpleLabel, SimpleList, SimpleRelease, SimpleUser,
};
pub use user::User;
