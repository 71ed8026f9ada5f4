//! Request parameters for TMDB endpoints.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::NaiveDate;

/// Time window for `trending/movie/{time_window}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Trending over the last day.
    Day,
    /// Trending over the last week.
    #[default]
    Week,
}

impl TimeWindow {
    /// Path segment used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => bail!("invalid time window: {other} (expected \"day\" or \"week\")"),
        }
    }
}

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by release year.
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            year: None,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Includes adult titles in the results.
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }
}

/// Formats a date the way `discover/movie` expects it (`YYYY-MM-DD`).
#[must_use]
pub fn discover_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_time_window_from_str() {
        // Arrange & Act & Assert
        assert_eq!("day".parse::<TimeWindow>().unwrap(), TimeWindow::Day);
        assert_eq!(" WEEK ".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
        assert!("month".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_search_params_defaults() {
        // Arrange & Act
        let params = SearchMovieParams::new("matrix");

        // Assert
        assert_eq!(params.page, 1);
        assert!(params.year.is_none());
        assert!(!params.include_adult);
    }

    #[test]
    fn test_discover_date_format() {
        // Arrange
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

        // Act & Assert
        assert_eq!(discover_date(date), "2026-01-05");
    }
}
