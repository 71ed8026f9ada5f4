//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::params::{SearchMovieParams, TimeWindow, discover_date};
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    GenreList, MovieCredits, MovieDetails, MoviesPage, TmdbErrorResponse, VideoList,
};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff step between retries (multiplied by the retry count).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// v3 API key, appended as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as `Authorization: Bearer`.
    AccessToken(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request credential.
    credential: Credential,
    /// Response language (e.g. "en-US"); API default when `None`.
    language: Option<String>,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential: Option<Credential>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the request credential.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Authenticates with a v3 API key.
    #[must_use]
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.credential(Credential::ApiKey(key.into()))
    }

    /// Authenticates with a v4 read access token.
    #[must_use]
    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.credential(Credential::AccessToken(token.into()))
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "ja-JP").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - no credential is set, or it is blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential = self
            .credential
            .context("api_key or access_token is required")?;
        let secret = match &credential {
            Credential::ApiKey(s) | Credential::AccessToken(s) => s,
        };
        if secret.trim().is_empty() {
            bail!("TMDB credential must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential,
            language: self.language.filter(|l| !l.trim().is_empty()),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Sends a GET request with credentials, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut query: Vec<(&str, String)> = params.to_vec();
        if let Some(ref language) = self.language {
            query.push(("language", language.clone()));
        }
        tracing::debug!(?query, "TMDB API request");
        if let Credential::ApiKey(ref key) = self.credential {
            query.push(("api_key", key.clone()));
        }

        let mut retries = 0u32;
        loop {
            let mut builder = self.http_client.get(url.clone()).query(&query);
            if let Credential::AccessToken(ref token) = self.credential {
                builder = builder.bearer_auth(token);
            }
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            let response = self
                .http_client
                .execute(request)
                .await
                .with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            return serde_json::from_str(&body)
                .with_context(|| format!("failed to decode JSON response: {path}"));
        }
    }

    /// Fetches one page of a plain list endpoint.
    async fn list_page(&self, path: &str, page: u32) -> Result<MoviesPage> {
        self.get_json(path, &[("page", page.to_string())]).await
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(window = %window))]
    async fn trending(&self, window: TimeWindow) -> Result<MoviesPage> {
        let path = format!("trending/movie/{window}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn popular(&self, page: u32) -> Result<MoviesPage> {
        self.list_page("movie/popular", page).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn top_rated(&self, page: u32) -> Result<MoviesPage> {
        self.list_page("movie/top_rated", page).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn now_playing(&self, page: u32) -> Result<MoviesPage> {
        self.list_page("movie/now_playing", page).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn upcoming(&self, page: u32) -> Result<MoviesPage> {
        self.list_page("movie/upcoming", page).await
    }

    #[instrument(skip_all)]
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MoviesPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.year {
            query.push(("year", year.to_string()));
        }

        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all, fields(genre_id = genre_id, page = page))]
    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviesPage> {
        let query = [
            ("with_genres", genre_id.to_string()),
            ("page", page.to_string()),
            ("sort_by", String::from("popularity.desc")),
        ];
        self.get_json("discover/movie", &query).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn discover_by_release_date(&self, page: u32, until: NaiveDate) -> Result<MoviesPage> {
        let query = [
            ("page", page.to_string()),
            ("sort_by", String::from("release_date.desc")),
            ("release_date.lte", discover_date(until)),
        ];
        self.get_json("discover/movie", &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        self.get_json(&format!("movie/{movie_id}"), &[]).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_credits(&self, movie_id: u64) -> Result<MovieCredits> {
        self.get_json(&format!("movie/{movie_id}/credits"), &[])
            .await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_videos(&self, movie_id: u64) -> Result<VideoList> {
        self.get_json(&format!("movie/{movie_id}/videos"), &[])
            .await
    }

    #[instrument(skip_all)]
    async fn genres(&self) -> Result<GenreList> {
        self.get_json("genre/movie/list", &[]).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credential() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key or access_token is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_credential() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_key("  ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .access_token("test-token")
            .user_agent("test/0.0.0")
            .language("ja-JP")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
        assert_eq!(client.language.as_deref(), Some("ja-JP"));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        // Arrange
        let credential = Credential::ApiKey(String::from("super-secret"));

        // Act
        let rendered = format!("{credential:?}");

        // Assert
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_parse_popular_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/popular_page1.json");

        // Act
        let page: MoviesPage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].id, 550);
        assert!(page.has_next_page());
    }

    #[test]
    fn test_parse_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_603.json");

        // Act
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 603);
        assert_eq!(details.title, "The Matrix");
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.genres.len(), 2);
        assert_eq!(details.tagline(), Some("Welcome to the Real World."));
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
    }

    #[tokio::test]
    async fn test_popular_sends_api_key_and_page() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/popular"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/popular_page2.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let page = client.popular(2).await.unwrap();

        // Assert
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_access_token_is_sent_as_bearer() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/genre/movie/list"))
            .and(header("Authorization", "Bearer my-secret-token"))
            .and(query_param_is_missing("api_key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/genres.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .access_token("my-secret-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        // Act
        let list = client.genres().await.unwrap();

        // Assert
        assert!(list.genres.iter().any(|g| g.name == "Action"));
    }

    #[tokio::test]
    async fn test_trending_uses_window_path() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/trending/movie/day"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/trending_week.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let page = client.trending(TimeWindow::Day).await.unwrap();

        // Assert
        assert!(!page.results.is_empty());
    }

    #[tokio::test]
    async fn test_discover_by_genre_query() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .and(query_param("with_genres", "28"))
            .and(query_param("sort_by", "popularity.desc"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/discover_genre_28.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let page = client.discover_by_genre(28, 1).await.unwrap();

        // Assert
        assert!(page.results.iter().all(|m| m.genre_ids.contains(&28)));
    }

    #[tokio::test]
    async fn test_discover_by_release_date_query() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/discover/movie"))
            .and(query_param("sort_by", "release_date.desc"))
            .and(query_param("release_date.lte", "2026-10-18"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/popular_page1.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server).await;
        let until = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        // Act
        let result = client.discover_by_release_date(1, until).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_search_and_language() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "the matrix"))
            .and(query_param("include_adult", "false"))
            .and(query_param("language", "ja-JP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/search_matrix.json"
            )))
            .expect(1)
            .mount(&server)
            .await;
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .language("ja-JP")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        // Act
        let page = client
            .search_movies(&SearchMovieParams::new("the matrix"))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results[0].id, 603);
    }

    #[tokio::test]
    async fn test_details_credits_videos_via_http() {
        // Arrange
        let server = MockServer::start().await;
        for (p, body) in [
            (
                "/3/movie/603",
                include_str!("../../../../fixtures/tmdb/movie_603.json"),
            ),
            (
                "/3/movie/603/credits",
                include_str!("../../../../fixtures/tmdb/credits_603.json"),
            ),
            (
                "/3/movie/603/videos",
                include_str!("../../../../fixtures/tmdb/videos_603.json"),
            ),
        ] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
        }
        let client = client_for(&server).await;

        // Act
        let details = client.movie_details(603).await.unwrap();
        let credits = client.movie_credits(603).await.unwrap();
        let videos = client.movie_videos(603).await.unwrap();

        // Assert
        assert_eq!(details.title, "The Matrix");
        assert_eq!(credits.cast[0].name, "Keanu Reeves");
        assert!(!videos.results.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let server = MockServer::start().await;
        let error_body = r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(error_body))
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let err = client.movie_details(1).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("could not be found"));
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let server = MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let result = client.popular(1).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        let client = client_for(&server).await;

        // Act
        let err = client.upcoming(1).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("failed to decode JSON response"));
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../../fixtures/tmdb/popular_page1.json"
            )))
            .expect(2)
            .mount(&server)
            .await;
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client.now_playing(1).await.unwrap();
        client.top_rated(1).await.unwrap();

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
