//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints and the
//! helpers that turn response fragments into image and trailer URLs.

mod api;
mod client;
mod image;
mod params;
mod rate_limiter;
mod source;
mod types;
mod video;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{Credential, DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use image::{IMAGE_BASE_URL, ImageSize, backdrop_url, image_url, poster_url, profile_url};
pub use params::{SearchMovieParams, TimeWindow, discover_date};
pub use source::MovieSource;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    CastMember, CrewMember, Genre, GenreList, Movie, MovieCredits, MovieDetails, MoviesPage,
    TmdbErrorResponse, Video, VideoList,
};
pub use video::{YOUTUBE_WATCH_URL, select_trailer, trailer_url};

/// Base URL of movie pages on the TMDB website.
pub const TMDB_WEB_URL: &str = "https://www.themoviedb.org";

/// Website URL for a movie.
#[must_use]
pub fn movie_page_url(movie_id: u64) -> String {
    format!("{TMDB_WEB_URL}/movie/{movie_id}")
}
