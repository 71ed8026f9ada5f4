//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use chrono::NaiveDate;

use super::params::{SearchMovieParams, TimeWindow};
use super::types::{GenreList, MovieCredits, MovieDetails, MoviesPage, VideoList};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches trending movies for the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, window: TimeWindow) -> Result<MoviesPage>;

    /// Fetches a page of popular movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular(&self, page: u32) -> Result<MoviesPage>;

    /// Fetches a page of top rated movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_rated(&self, page: u32) -> Result<MoviesPage>;

    /// Fetches a page of movies now playing in theatres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn now_playing(&self, page: u32) -> Result<MoviesPage>;

    /// Fetches a page of upcoming movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn upcoming(&self, page: u32) -> Result<MoviesPage>;

    /// Searches for movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MoviesPage>;

    /// Discovers movies in a genre, most popular first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviesPage>;

    /// Discovers movies released on or before `until`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_by_release_date(&self, page: u32, until: NaiveDate) -> Result<MoviesPage>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;

    /// Fetches cast and crew.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_credits(&self, movie_id: u64) -> Result<MovieCredits>;

    /// Fetches videos (trailers, teasers, clips).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_videos(&self, movie_id: u64) -> Result<VideoList>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genres(&self) -> Result<GenreList>;
}
