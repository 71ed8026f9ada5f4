//! Paged movie list sources.

use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;

use super::api::TmdbApi;
use super::params::{SearchMovieParams, TimeWindow};
use super::types::MoviesPage;

/// A movie list endpoint with its fixed query, fetched one page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieSource {
    /// `trending/movie/{window}` (single page).
    Trending(TimeWindow),
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
    /// `search/movie`; the page in the params is replaced per request.
    Search(SearchMovieParams),
    /// `discover/movie` filtered by genre.
    Genre(u32),
    /// `discover/movie` released on or before the date, newest first.
    ReleasedBefore(NaiveDate),
}

impl MovieSource {
    /// Fetches one page from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn fetch<A: TmdbApi + Sync>(&self, api: &A, page: u32) -> Result<MoviesPage> {
        match self {
            Self::Trending(window) => api.trending(*window).await,
            Self::Popular => api.popular(page).await,
            Self::TopRated => api.top_rated(page).await,
            Self::NowPlaying => api.now_playing(page).await,
            Self::Upcoming => api.upcoming(page).await,
            Self::Search(params) => {
                let params = params.clone().page(page);
                api.search_movies(&params).await
            }
            Self::Genre(genre_id) => api.discover_by_genre(*genre_id, page).await,
            Self::ReleasedBefore(until) => api.discover_by_release_date(page, *until).await,
        }
    }

    /// Whether the endpoint serves more than one page.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        !matches!(self, Self::Trending(_))
    }
}

impl fmt::Display for MovieSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trending(window) => write!(f, "trending ({window})"),
            Self::Popular => f.write_str("popular"),
            Self::TopRated => f.write_str("top rated"),
            Self::NowPlaying => f.write_str("now playing"),
            Self::Upcoming => f.write_str("upcoming"),
            Self::Search(params) => write!(f, "search \"{}\"", params.query),
            Self::Genre(id) => write!(f, "genre {id}"),
            Self::ReleasedBefore(until) => write!(f, "released before {until}"),
        }
    }
}
