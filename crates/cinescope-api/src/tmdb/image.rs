//! Image CDN URL construction.
//!
//! TMDB responses carry image path fragments (`/abc123.jpg`); the full URL is
//! `{IMAGE_BASE_URL}/{size}{path}`.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size token for image URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 300px wide.
    W300,
    /// 500px wide.
    #[default]
    W500,
    /// 780px wide.
    W780,
    /// 1280px wide.
    W1280,
    /// Original upload.
    Original,
}

impl ImageSize {
    /// Size token as used in the URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::W1280 => "w1280",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w300" => Ok(Self::W300),
            "w500" => Ok(Self::W500),
            "w780" => Ok(Self::W780),
            "w1280" => Ok(Self::W1280),
            "original" => Ok(Self::Original),
            other => bail!("invalid image size: {other}"),
        }
    }
}

/// Builds an image URL. Returns `None` when there is no image to show.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    let sep = if path.starts_with('/') { "" } else { "/" };
    Some(format!("{IMAGE_BASE_URL}/{size}{sep}{path}"))
}

/// Poster URL (w500).
#[must_use]
pub fn poster_url(path: Option<&str>) -> Option<String> {
    image_url(path, ImageSize::W500)
}

/// Backdrop URL (original size).
#[must_use]
pub fn backdrop_url(path: Option<&str>) -> Option<String> {
    image_url(path, ImageSize::Original)
}

/// Cast profile URL (w500).
#[must_use]
pub fn profile_url(path: Option<&str>) -> Option<String> {
    image_url(path, ImageSize::W500)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_image_url_joins_size_and_path() {
        // Arrange & Act
        let url = image_url(Some("/poster.jpg"), ImageSize::W780);

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w780/poster.jpg")
        );
    }

    #[test]
    fn test_missing_path_is_placeholder() {
        // Arrange & Act & Assert
        assert!(image_url(None, ImageSize::W500).is_none());
        assert!(image_url(Some(""), ImageSize::W500).is_none());
        assert!(poster_url(Some("   ")).is_none());
    }

    #[test]
    fn test_helpers_use_expected_sizes() {
        // Arrange & Act & Assert
        assert!(poster_url(Some("/p.jpg")).unwrap().contains("/w500/"));
        assert!(backdrop_url(Some("/b.jpg")).unwrap().contains("/original/"));
        assert!(profile_url(Some("/a.jpg")).unwrap().contains("/w500/"));
    }

    #[test]
    fn test_image_size_from_str() {
        // Arrange & Act & Assert
        assert_eq!("w1280".parse::<ImageSize>().unwrap(), ImageSize::W1280);
        assert_eq!("w300".parse::<ImageSize>().unwrap(), ImageSize::W300);
        assert!("w92".parse::<ImageSize>().is_err());
    }
}
