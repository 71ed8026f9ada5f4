//! TMDB API response types.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::feed::Keyed;

// --- Movie lists ---

/// A page of movies, as returned by every list endpoint
/// (`trending`, `movie/popular`, `search/movie`, `discover/movie`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct MoviesPage {
    /// Current page number (1-based).
    pub page: u32,
    /// Movies on this page.
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

impl MoviesPage {
    /// Returns `true` if the API reports pages after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns the page number to request next, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next_page() {
            self.page.checked_add(1)
        } else {
            None
        }
    }
}

/// A movie list entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
}

impl Movie {
    /// Parsed release date. `None` when missing or malformed.
    #[must_use]
    pub fn release_date(&self) -> Option<NaiveDate> {
        parse_release_date(self.release_date.as_deref())
    }

    /// Release year, if the release date parses.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date().map(|d| d.year())
    }
}

impl Keyed for Movie {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Parses a TMDB date string. TMDB sends `""` for unknown dates.
fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// --- Movie details ---

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Budget in USD (0 when unknown).
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// Release status (e.g. "Released", "Post Production").
    #[serde(default)]
    pub status: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Official homepage.
    #[serde(default)]
    pub homepage: Option<String>,
    /// IMDb ID (e.g. "tt0133093").
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetails {
    /// Parsed release date.
    #[must_use]
    pub fn release_date(&self) -> Option<NaiveDate> {
        parse_release_date(self.release_date.as_deref())
    }

    /// Tagline, if present and non-empty.
    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Comma-separated genre names.
    #[must_use]
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    /// All movie genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieCredits {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: u64,
    /// Cast, ordered by billing.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl MovieCredits {
    /// Returns the top-billed cast members, sorted by `order`.
    #[must_use]
    pub fn top_cast(&self, limit: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.cast.iter().collect();
        cast.sort_by_key(|c| c.order);
        cast.truncate(limit);
        cast
    }

    /// Names of crew members with the `Director` job.
    #[must_use]
    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// A cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Actor name.
    pub name: String,
    /// Character name.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A crew member.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job (e.g. "Director").
    #[serde(default)]
    pub job: Option<String>,
    /// Department (e.g. "Directing").
    #[serde(default)]
    pub department: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Videos ---

/// Response from `movie/{movie_id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoList {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: u64,
    /// Videos attached to the movie.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A video attached to a movie (trailer, teaser, clip, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// TMDB video ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Video name.
    #[serde(default)]
    pub name: Option<String>,
    /// Hosting site (e.g. "YouTube", "Vimeo").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser", "Clip").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Site-specific key.
    pub key: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn movie(id: u64, release_date: Option<&str>) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            release_date: release_date.map(String::from),
            genre_ids: Vec::new(),
            popularity: 0.0,
            original_language: None,
            adult: false,
            video: false,
        }
    }

    #[test]
    fn test_release_year_parses_date() {
        // Arrange
        let m = movie(1, Some("1999-03-30"));

        // Act & Assert
        assert_eq!(m.release_year(), Some(1999));
    }

    #[test]
    fn test_release_year_empty_string_is_none() {
        // Arrange
        let m = movie(1, Some(""));

        // Act & Assert
        assert_eq!(m.release_year(), None);
        assert_eq!(movie(2, None).release_year(), None);
        assert_eq!(movie(3, Some("soon")).release_year(), None);
    }

    #[test]
    fn test_movies_page_next_page() {
        // Arrange
        let json = r#"{"page":2,"results":[],"total_pages":3,"total_results":50}"#;
        let last = r#"{"page":3,"results":[],"total_pages":3,"total_results":50}"#;

        // Act
        let page: MoviesPage = serde_json::from_str(json).unwrap();
        let last: MoviesPage = serde_json::from_str(last).unwrap();

        // Assert
        assert_eq!(page.next_page(), Some(3));
        assert!(!last.has_next_page());
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_movie_tolerates_nulls() {
        // Arrange
        let json = r#"{"id":5,"title":"X","overview":null,"poster_path":null,"release_date":null}"#;

        // Act
        let m: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(m.id, 5);
        assert!(m.poster_path.is_none());
        assert!(m.genre_ids.is_empty());
    }

    #[test]
    fn test_top_cast_sorted_and_truncated() {
        // Arrange
        let json = r#"{"id":1,"cast":[
            {"id":3,"name":"C","order":2},
            {"id":1,"name":"A","order":0},
            {"id":2,"name":"B","order":1}
        ],"crew":[
            {"id":9,"name":"Director Person","job":"Director","department":"Directing"},
            {"id":8,"name":"Writer Person","job":"Screenplay","department":"Writing"}
        ]}"#;
        let credits: MovieCredits = serde_json::from_str(json).unwrap();

        // Act
        let top = credits.top_cast(2);

        // Assert
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "B");
        assert_eq!(credits.directors(), vec!["Director Person"]);
    }

    #[test]
    fn test_empty_tagline_is_none() {
        // Arrange
        let json = r#"{"id":1,"title":"T","tagline":"  ","genres":[{"id":18,"name":"Drama"},{"id":53,"name":"Thriller"}]}"#;

        // Act
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert!(details.tagline().is_none());
        assert_eq!(details.genre_names(), "Drama, Thriller");
    }
}
