//! Trailer selection.

use super::types::Video;

/// Base URL for YouTube watch links.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Picks the video to show as the movie's trailer.
///
/// Only YouTube videos qualify. Preference: official trailer, any trailer,
/// then a teaser.
#[must_use]
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    let youtube = || {
        videos
            .iter()
            .filter(|v| v.site.eq_ignore_ascii_case("YouTube") && !v.key.is_empty())
    };

    youtube()
        .find(|v| v.video_type == "Trailer" && v.official)
        .or_else(|| youtube().find(|v| v.video_type == "Trailer"))
        .or_else(|| youtube().find(|v| v.video_type == "Teaser"))
}

/// Watch URL for a selected trailer.
#[must_use]
pub fn trailer_url(video: &Video) -> String {
    format!("{YOUTUBE_WATCH_URL}{}", video.key)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn video(site: &str, video_type: &str, key: &str, official: bool) -> Video {
        Video {
            id: None,
            name: None,
            site: String::from(site),
            video_type: String::from(video_type),
            key: String::from(key),
            official,
            published_at: None,
        }
    }

    #[test]
    fn test_prefers_official_trailer() {
        // Arrange
        let videos = vec![
            video("YouTube", "Trailer", "fan", false),
            video("YouTube", "Teaser", "teaser", true),
            video("YouTube", "Trailer", "official", true),
        ];

        // Act
        let picked = select_trailer(&videos).unwrap();

        // Assert
        assert_eq!(picked.key, "official");
    }

    #[test]
    fn test_falls_back_to_unofficial_then_teaser() {
        // Arrange
        let with_trailer = vec![
            video("YouTube", "Teaser", "teaser", true),
            video("YouTube", "Trailer", "fan", false),
        ];
        let teaser_only = vec![
            video("YouTube", "Clip", "clip", true),
            video("youtube", "Teaser", "teaser", false),
        ];

        // Act & Assert
        assert_eq!(select_trailer(&with_trailer).unwrap().key, "fan");
        assert_eq!(select_trailer(&teaser_only).unwrap().key, "teaser");
    }

    #[test]
    fn test_ignores_other_sites() {
        // Arrange
        let videos = vec![video("Vimeo", "Trailer", "123", true)];

        // Act & Assert
        assert!(select_trailer(&videos).is_none());
        assert!(select_trailer(&[]).is_none());
    }

    #[test]
    fn test_trailer_url() {
        // Arrange
        let v = video("YouTube", "Trailer", "abc123", true);

        // Act & Assert
        assert_eq!(trailer_url(&v), "https://www.youtube.com/watch?v=abc123");
    }
}
