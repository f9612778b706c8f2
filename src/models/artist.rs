//! Artist profiles and their discography views.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::client::{RymClient, ROOT_URL};
use crate::error::{Result, RymError};
use crate::extract;
use crate::models::common::{Location, PartialDate, Role};
use crate::models::simple::{BandMember, CreditedRelease, SimpleArtist, SimpleGenre, SimpleRelease};

/// Own-discography sections, keyed by the site's one-letter type codes.
const DISCOGRAPHY_SECTIONS: [(&str, Bucket); 12] = [
    ("s", Bucket::Albums),
    ("l", Bucket::LiveAlbums),
    ("e", Bucket::Eps),
    ("c", Bucket::Compilations),
    ("i", Bucket::Singles),
    ("d", Bucket::VideoReleases),
    ("b", Bucket::UnauthorizedReleases),
    ("m", Bucket::Mixtapes),
    ("o", Bucket::MusicVideos),
    ("j", Bucket::DjMixes),
    ("x", Bucket::AdditionalReleases),
    ("v", Bucket::VariousArtistsCompilations),
];

#[derive(Debug, Clone, Copy)]
enum Bucket {
    Albums,
    LiveAlbums,
    Eps,
    Compilations,
    Singles,
    VideoReleases,
    UnauthorizedReleases,
    Mixtapes,
    MusicVideos,
    DjMixes,
    AdditionalReleases,
    VariousArtistsCompilations,
    Other,
}

/// Releases partitioned by subtype.
///
/// A bucket that is `None` was never populated for this view; a bucket
/// holding an empty list was fetched and had zero results. Callers must
/// keep the two apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Discography {
    pub albums: Option<Vec<SimpleRelease>>,
    pub live_albums: Option<Vec<SimpleRelease>>,
    pub eps: Option<Vec<SimpleRelease>>,
    pub compilations: Option<Vec<SimpleRelease>>,
    pub singles: Option<Vec<SimpleRelease>>,
    pub video_releases: Option<Vec<SimpleRelease>>,
    pub unauthorized_releases: Option<Vec<SimpleRelease>>,
    pub mixtapes: Option<Vec<SimpleRelease>>,
    pub music_videos: Option<Vec<SimpleRelease>>,
    pub dj_mixes: Option<Vec<SimpleRelease>>,
    pub additional_releases: Option<Vec<SimpleRelease>>,
    pub various_artists_compilations: Option<Vec<SimpleRelease>>,
    pub other: Option<Vec<SimpleRelease>>,
}

impl Discography {
    /// Alias for the unauthorized-releases bucket.
    pub fn bootlegs(&self) -> Option<&Vec<SimpleRelease>> {
        self.unauthorized_releases.as_ref()
    }

    fn slot(&mut self, bucket: Bucket) -> &mut Option<Vec<SimpleRelease>> {
        match bucket {
            Bucket::Albums => &mut self.albums,
            Bucket::LiveAlbums => &mut self.live_albums,
            Bucket::Eps => &mut self.eps,
            Bucket::Compilations => &mut self.compilations,
            Bucket::Singles => &mut self.singles,
            Bucket::VideoReleases => &mut self.video_releases,
            Bucket::UnauthorizedReleases => &mut self.unauthorized_releases,
            Bucket::Mixtapes => &mut self.mixtapes,
            Bucket::MusicVideos => &mut self.music_videos,
            Bucket::DjMixes => &mut self.dj_mixes,
            Bucket::AdditionalReleases => &mut self.additional_releases,
            Bucket::VariousArtistsCompilations => &mut self.various_artists_compilations,
            Bucket::Other => &mut self.other,
        }
    }

    fn push(&mut self, bucket: Bucket, release: SimpleRelease) {
        self.slot(bucket).get_or_insert_with(Vec::new).push(release);
    }
}

/// Classify an appearance row by its printed type label.
///
/// The vocabulary is fixed and case-sensitive; anything unrecognized
/// lands in the `other` bucket.
fn appearance_bucket(label: &str) -> Bucket {
    match label {
        "Album" => Bucket::Albums,
        "EP" => Bucket::Eps,
        "Single" => Bucket::Singles,
        "Mixtape" => Bucket::Mixtapes,
        "Music video" => Bucket::MusicVideos,
        "DJ Mix" => Bucket::DjMixes,
        "Video" => Bucket::VideoReleases,
        "Compilation" => Bucket::Compilations,
        "Additional release" => Bucket::AdditionalReleases,
        "Bootleg/Unauthorized" => Bucket::UnauthorizedReleases,
        _ => Bucket::Other,
    }
}

/// A fully fetched artist profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub url: String,
    pub name: String,
    /// Name in the artist's own script, when the profile carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    /// Formation date for groups, birth date for persons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_location: Option<Location>,
    /// Dissolution date for groups, death date for persons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<PartialDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<Location>,
    pub genres: Vec<SimpleGenre>,
    pub members: Vec<BandMember>,
    pub akas: Vec<SimpleArtist>,
    pub member_of: Vec<SimpleArtist>,
    pub related_artists: Vec<SimpleArtist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The artist's own releases, by subtype.
    pub discography: Discography,
    /// Releases the artist merely appears on, by printed type label.
    pub appears_on: Discography,
    /// Disambiguation counter for same-named artists.
    pub same_name_artist_number: u32,
    #[serde(skip)]
    credits: Option<Vec<CreditedRelease>>,
}

impl Artist {
    /// Canonical profile URL for an artist name, with the site's
    /// `_fN` suffix for same-named artists past the first.
    pub(crate) fn url_for_name(name: &str, same_name_artist_number: u32) -> String {
        let slug = extract::slug(name);
        if same_name_artist_number == 0 {
            format!("{ROOT_URL}/artist/{slug}")
        } else {
            format!("{ROOT_URL}/artist/{slug}_f{}", same_name_artist_number + 1)
        }
    }

    pub(crate) fn fetch(client: &RymClient, url: &str, same_name_artist_number: u32) -> Result<Self> {
        let doc = client.fetch_document(url)?;
        Self::from_document(&doc, url, same_name_artist_number)
    }

    pub(crate) fn from_document(doc: &Html, url: &str, same_name_artist_number: u32) -> Result<Self> {
        let name = fetch_name(doc)?;
        let (start_date, start_location) = fetch_date_location(doc, &["Formed", "Born"]);
        let (end_date, end_location) = fetch_date_location(doc, &["Disbanded", "Died"]);

        Ok(Self {
            url: url.to_string(),
            name: name.clone(),
            localized_name: fetch_localized_name(doc),
            start_date,
            start_location,
            end_date,
            end_location,
            current_location: fetch_current_location(doc),
            genres: fetch_genres(doc),
            members: fetch_members(doc),
            akas: fetch_akas(doc),
            member_of: fetch_member_of(doc),
            related_artists: fetch_related(doc),
            notes: fetch_notes(doc),
            discography: fetch_discography(doc, &name, url),
            appears_on: fetch_appearances(doc, &name, url),
            same_name_artist_number,
            credits: None,
        })
    }

    /// Birth date, for persons.
    pub fn birth_date(&self) -> Option<&PartialDate> {
        self.start_date.as_ref()
    }

    /// Formation date, for groups.
    pub fn formation_date(&self) -> Option<&PartialDate> {
        self.start_date.as_ref()
    }

    /// Death date, for persons.
    pub fn death_date(&self) -> Option<&PartialDate> {
        self.end_date.as_ref()
    }

    /// Dissolution date, for groups.
    pub fn disbanded_date(&self) -> Option<&PartialDate> {
        self.end_date.as_ref()
    }

    /// Releases this artist is credited on (producer, session work,
    /// ...). Fetched from the credits page on first access and cached.
    pub fn credits(&mut self, client: &RymClient) -> Result<&[CreditedRelease]> {
        if self.credits.is_none() {
            let url = format!("{}/credits/", self.url.trim_end_matches('/'));
            let doc = client.fetch_document(&url)?;
            self.credits = Some(fetch_credits(&doc));
        }
        Ok(self.credits.as_deref().expect("populated above"))
    }

    /// Fetch the next artist carrying the same name.
    pub fn next_same_name_artist(&self, client: &RymClient) -> Result<Artist> {
        let next = self.same_name_artist_number + 1;
        Artist::fetch(client, &Artist::url_for_name(&self.name, next), next)
    }
}

fn fetch_name(doc: &Html) -> Result<String> {
    let sel = extract::selector("h1.artist_name_hdr");
    doc.select(&sel)
        .next()
        .and_then(extract::first_text)
        .ok_or_else(|| RymError::Parse("No artist name was found".into()))
}

fn fetch_localized_name(doc: &Html) -> Option<String> {
    let sel = extract::selector("span.localized_name");
    doc.select(&sel).next().and_then(extract::first_text)
}

/// Decode one of the "Formed"/"Born"/"Disbanded"/"Died" info blocks:
/// leading text up to the location anchor is the date (with a trailing
/// comma), the anchor itself is the location.
fn fetch_date_location(doc: &Html, titles: &[&str]) -> (Option<PartialDate>, Option<Location>) {
    for title in titles {
        let Some(info) = extract::labeled_block(doc, "div.info_hdr", title) else {
            continue;
        };
        let location_sel = extract::selector("a.location");
        let location = info.select(&location_sel).next().map(|a| {
            extract::location(
                extract::text_of(a).trim(),
                a.attr("href").map(extract::absolute_url),
            )
        });
        let date = extract::leading_text(info)
            .and_then(|text| extract::partial_date(text.trim_end_matches(',')));
        return (date, location);
    }
    (None, None)
}

fn fetch_current_location(doc: &Html) -> Option<Location> {
    let info = extract::labeled_block(doc, "div.info_hdr", "Currently")?;
    let location_sel = extract::selector("a.location");
    let url = info
        .select(&location_sel)
        .next()
        .and_then(|a| a.attr("href"))
        .map(extract::absolute_url);
    let text = extract::text_of(info);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(extract::location(trimmed, url))
}

fn fetch_genres(doc: &Html) -> Vec<SimpleGenre> {
    extract::labeled_block(doc, "div.info_hdr", "Genres")
        .map(|info| extract::genre_list(&extract::text_of(info)))
        .unwrap_or_default()
}

fn fetch_members(doc: &Html) -> Vec<BandMember> {
    let Some(info) = extract::labeled_block(doc, "div.info_hdr", "Members") else {
        return Vec::new();
    };
    let anchors = extract::anchors_of(info);
    extract::name_info_groups(&extract::text_of(info), &anchors)
        .into_iter()
        .map(|group| {
            let (instruments, years_active) = extract::instruments_and_years(&group.info);
            BandMember {
                name: group.name,
                url: group.url,
                instruments: Some(instruments).filter(|i| !i.is_empty()),
                years_active: Some(years_active).filter(|y| !y.is_empty()),
                aka: group.alias,
            }
        })
        .collect()
}

fn fetch_akas(doc: &Html) -> Vec<SimpleArtist> {
    extract::labeled_block(doc, "div.info_hdr", "Also Known As")
        .map(extract::linked_names)
        .unwrap_or_default()
}

fn fetch_member_of(doc: &Html) -> Vec<SimpleArtist> {
    extract::labeled_block(doc, "div.info_hdr", "Member of")
        .map(extract::linked_names)
        .unwrap_or_default()
}

fn fetch_related(doc: &Html) -> Vec<SimpleArtist> {
    let Some(info) = extract::labeled_block(doc, "div.info_hdr", "Related Artists") else {
        return Vec::new();
    };
    extract::anchors_of(info)
        .into_iter()
        .map(|(name, url)| SimpleArtist::new(name, Some(url)))
        .collect()
}

fn fetch_notes(doc: &Html) -> Option<String> {
    let info = extract::labeled_block(doc, "div.info_hdr", "Notes")?;
    let text = extract::text_of(info).trim().to_string();
    Some(text).filter(|t| !t.is_empty())
}

/// The artist's own releases, one section per one-letter type code.
fn fetch_discography(doc: &Html, artist_name: &str, artist_url: &str) -> Discography {
    let mut discography = Discography::default();
    for (code, bucket) in DISCOGRAPHY_SECTIONS {
        let section_sel = extract::selector(&format!("#disco_type_{code}"));
        let Some(section) = doc.select(&section_sel).next() else {
            continue;
        };
        let row_sel = extract::selector(".disco_release");
        let releases: Vec<SimpleRelease> = section
            .select(&row_sel)
            .filter_map(|row| release_from_row(row, artist_name, artist_url))
            .collect();
        *discography.slot(bucket) = Some(releases);
    }
    discography
}

/// Releases the artist appears on, classified by printed type label.
fn fetch_appearances(doc: &Html, artist_name: &str, artist_url: &str) -> Discography {
    let mut appearances = Discography::default();
    let section_sel = extract::selector("#disco_type_a");
    let Some(section) = doc.select(&section_sel).next() else {
        return appearances;
    };
    let row_sel = extract::selector(".disco_release");
    let subtext_sel = extract::selector(".disco_subline .subtext");
    for row in section.select(&row_sel) {
        let Some(release) = release_from_row(row, artist_name, artist_url) else {
            continue;
        };
        let label = row
            .select(&subtext_sel)
            .next()
            .map(|el| extract::text_of(el))
            .and_then(|text| {
                text.split('\u{2022}')
                    .nth(1)
                    .map(|part| part.trim().to_string())
            })
            .unwrap_or_default();
        appearances.push(appearance_bucket(&label), release);
    }
    appearances
}

/// Build one discography row; the release credit defaults to the owning
/// artist unless the row names someone else.
fn release_from_row(row: ElementRef<'_>, artist_name: &str, artist_url: &str) -> Option<SimpleRelease> {
    let info_sel = extract::selector(".disco_info a");
    let info = row.select(&info_sel).next()?;
    let title = info.attr("title")?.to_string();
    let url = info.attr("href").map(extract::absolute_url);

    let date_sel = extract::selector(".disco_subline span[title]");
    let release_date = row
        .select(&date_sel)
        .next()
        .and_then(|el| el.attr("title"))
        .and_then(extract::partial_date);

    let ratings_sel = extract::selector(".disco_ratings");
    let number_of_ratings = row
        .select(&ratings_sel)
        .next()
        .and_then(|el| extract::count_number(&extract::text_of(el)));

    let reviews_sel = extract::selector(".disco_reviews");
    let number_of_reviews = row
        .select(&reviews_sel)
        .next()
        .and_then(|el| extract::count_number(&extract::text_of(el)));

    let avg_sel = extract::selector(".disco_avg_rating");
    let average_rating = row
        .select(&avg_sel)
        .next()
        .and_then(|el| extract::text_of(el).trim().parse().ok());

    let (artist_name, artists) = row_credit(row, artist_name, artist_url);

    Some(SimpleRelease {
        title,
        url,
        artist_name: Some(artist_name),
        artists: Some(artists),
        release_date,
        average_rating,
        number_of_ratings,
        number_of_reviews,
        ..Default::default()
    })
}

/// Resolve the display credit of a discography row.
fn row_credit(row: ElementRef<'_>, owner_name: &str, owner_url: &str) -> (String, Vec<SimpleArtist>) {
    let owner = SimpleArtist::new(owner_name, Some(owner_url.to_string()));

    let collab_sel = extract::selector(".credited_name");
    if let Some(collab) = row.select(&collab_sel).next() {
        let name = extract::first_text(collab).unwrap_or_else(|| owner_name.to_string());
        let sub_sel = extract::selector(".disco_sub_artist");
        let artists = collab
            .select(&sub_sel)
            .filter_map(|a| {
                let url = extract::absolute_url(a.attr("href")?);
                Some(if url == owner_url {
                    owner.clone()
                } else {
                    SimpleArtist::new(extract::text_of(a).trim().to_string(), Some(url))
                })
            })
            .collect();
        return (name, artists);
    }

    let sub_sel = extract::selector(".disco_sub_artist");
    if let Some(sub) = row.select(&sub_sel).next() {
        let name = extract::text_of(sub).trim().to_string();
        if let Some(url) = sub.attr("href").map(extract::absolute_url) {
            if url != owner_url {
                return (name.clone(), vec![SimpleArtist::new(name, Some(url))]);
            }
        }
        return (name, vec![owner]);
    }

    (owner_name.to_string(), vec![owner])
}

/// Rows of the artist credits page.
fn fetch_credits(doc: &Html) -> Vec<CreditedRelease> {
    let row_sel = extract::selector(".disco_release");
    let album_sel = extract::selector(".album");
    let roles_sel = extract::selector(".disco_classical_role");
    doc.select(&row_sel)
        .filter_map(|row| {
            let album = row.select(&album_sel).next()?;
            let roles = row
                .select(&roles_sel)
                .next()
                .map(|el| {
                    extract::comma_list(&extract::text_of(el))
                        .into_iter()
                        .map(Role::named)
                        .collect()
                })
                .unwrap_or_default();
            Some(CreditedRelease {
                title: extract::text_of(album).trim().to_string(),
                url: album.attr("href").map(extract::absolute_url),
                roles,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIST_HTML: &str = r##"
        <html><body>
            <h1 class="artist_name_hdr">Depeche Mode</h1>
            <span class="localized_name">デペッシュ・モード</span>
            <div class="artist_info">
                <div class="info_hdr">Formed</div>
                <div class="info_content">1980, <a class="location" href="/location/basildon">Basildon, England, United Kingdom</a></div>
                <div class="info_hdr">Members</div>
                <div class="info_content"><span>
                    <a href="/artist/dave-gahan">Dave Gahan</a> (vocals, 1980-88)
                    <a href="/artist/alan-wilder">Alan Wilder</a> [Recall] (synthesizer, drums, 1982-95)
                    Vince Clarke (synthesizer, 1980-81)
                </span></div>
                <div class="info_hdr">Also Known As</div>
                <div class="info_content"><span><a href="/artist/dm">DM</a>, Composition of Sound</span></div>
                <div class="info_hdr">Related Artists</div>
                <div class="info_content"><span><a href="/artist/erasure">Erasure</a></span></div>
                <div class="info_hdr">Genres</div>
                <div class="info_content">Synthpop, New Wave</div>
                <div class="info_hdr">Notes</div>
                <div class="info_content">Formed in Basildon.</div>
            </div>
            <div id="disco_type_s">
                <div class="disco_release">
                    <div class="disco_info"><a href="/release/album/depeche-mode/violator/" title="Violator"></a></div>
                    <div class="disco_subline"><span title="19 March 1990">1990</span></div>
                    <div class="disco_avg_rating">4.12</div>
                    <div class="disco_ratings">38,551</div>
                    <div class="disco_reviews">420</div>
                </div>
            </div>
            <div id="disco_type_i">
            </div>
            <div id="disco_type_a">
                <div class="disco_release">
                    <div class="disco_info"><a href="/release/comp/various-artists/some-comp/" title="Some Compilation"></a></div>
                    <div class="disco_subline"><span title="2001">2001</span><span class="subtext">2001 • Compilation</span></div>
                    <div class="disco_ratings"></div>
                    <div class="disco_reviews"></div>
                </div>
                <div class="disco_release">
                    <div class="disco_info"><a href="/release/unknown/thing/" title="Unclassifiable"></a></div>
                    <div class="disco_subline"><span title="2003">2003</span><span class="subtext">2003 • Oddity</span></div>
                </div>
            </div>
        </body></html>
    "##;

    fn artist() -> Artist {
        let doc = Html::parse_document(ARTIST_HTML);
        Artist::from_document(&doc, "https://rateyourmusic.com/artist/depeche-mode", 0).unwrap()
    }

    #[test]
    fn test_header_fields() {
        let artist = artist();
        assert_eq!(artist.name, "Depeche Mode");
        assert_eq!(artist.localized_name.as_deref(), Some("デペッシュ・モード"));
        let formed = artist.start_date.as_ref().unwrap();
        assert_eq!((formed.year, formed.month), (1980, None));
        let location = artist.start_location.as_ref().unwrap();
        assert_eq!(location.city.as_deref(), Some("Basildon"));
        assert_eq!(location.country, "United Kingdom");
        assert_eq!(artist.formation_date(), artist.start_date.as_ref());
        assert_eq!(artist.notes.as_deref(), Some("Formed in Basildon."));
    }

    #[test]
    fn test_genres_and_related() {
        let artist = artist();
        let genres: Vec<&str> = artist.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(genres, ["Synthpop", "New Wave"]);
        assert_eq!(artist.related_artists.len(), 1);
        assert_eq!(artist.related_artists[0].name, "Erasure");
    }

    #[test]
    fn test_members_with_aliases_and_years() {
        let artist = artist();
        assert_eq!(artist.members.len(), 3);

        let gahan = &artist.members[0];
        assert_eq!(gahan.name, "Dave Gahan");
        assert_eq!(gahan.url.as_deref(), Some("https://rateyourmusic.com/artist/dave-gahan"));
        assert_eq!(gahan.instruments.as_deref(), Some(&["vocals".to_string()][..]));

        let wilder = &artist.members[1];
        assert_eq!(wilder.aka.as_deref(), Some("Recall"));
        assert_eq!(wilder.years_active.as_deref(), Some(&["1982-95".to_string()][..]));

        let clarke = &artist.members[2];
        assert_eq!(clarke.name, "Vince Clarke");
        assert_eq!(clarke.url, None);
    }

    #[test]
    fn test_akas_match_anchors_in_order() {
        let artist = artist();
        assert_eq!(artist.akas.len(), 2);
        assert_eq!(artist.akas[0].name, "DM");
        assert_eq!(artist.akas[0].url.as_deref(), Some("https://rateyourmusic.com/artist/dm"));
        assert_eq!(artist.akas[1].name, "Composition of Sound");
        assert_eq!(artist.akas[1].url, None);
    }

    #[test]
    fn test_own_discography_buckets() {
        let artist = artist();
        let albums = artist.discography.albums.as_ref().unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].title, "Violator");
        let date = albums[0].release_date.unwrap();
        assert_eq!((date.year, date.month, date.day), (1990, Some(3), Some(19)));
        assert_eq!(albums[0].average_rating, Some(4.12));
        assert_eq!(albums[0].number_of_ratings, Some(38551));

        // Present-but-empty section versus absent section.
        assert_eq!(artist.discography.singles.as_deref(), Some(&[][..]));
        assert_eq!(artist.discography.eps, None);
        assert_eq!(artist.discography.bootlegs(), None);
    }

    #[test]
    fn test_appearance_classification() {
        let artist = artist();
        let compilations = artist.appears_on.compilations.as_ref().unwrap();
        assert_eq!(compilations.len(), 1);
        assert_eq!(compilations[0].title, "Some Compilation");

        // Unknown labels land in `other`.
        let other = artist.appears_on.other.as_ref().unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].title, "Unclassifiable");
        assert_eq!(artist.appears_on.albums, None);
    }

    #[test]
    fn test_url_for_name() {
        assert_eq!(
            Artist::url_for_name("Depeche Mode", 0),
            "https://rateyourmusic.com/artist/depeche-mode"
        );
        assert_eq!(
            Artist::url_for_name("Depeche Mode", 1),
            "https://rateyourmusic.com/artist/depeche-mode_f2"
        );
    }
}
