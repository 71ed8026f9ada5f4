//! API client library for cinescope.
//!
//! Provides the TMDB client and the paged feed accumulator that the
//! browser screens build on.

/// Paged result accumulation with first-seen deduplication.
pub mod feed;

/// TMDB API client.
pub mod tmdb;
