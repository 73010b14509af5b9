//! Core YouTube API client functionality.

use crate::youtube_api::{
    chat::{LiveChatMessage, LiveChatMessageListResponse},
    videos::{Video, VideoListResponse},
};
use eyre::Context;
use http::Method;
use tracing::instrument;

/// Where the YouTube Data API v3 lives.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Connection settings for the YouTube Data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL that endpoint paths such as `/videos` are appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const BASE_URL_ENV: &str = "YOUTUBE_API_BASE_URL";

impl ApiConfig {
    /// The default config, with the base URL taken from [`BASE_URL_ENV`] when that is set.
    pub fn from_env() -> Self {
        Self::with_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url(base_url: Option<String>) -> Self {
        match base_url.filter(|url| !url.trim().is_empty()) {
            Some(base_url) => Self { base_url },
            None => Self::default(),
        }
    }
}

/// Client for the read-only parts of the YouTube Data API v3 that the live panel needs.
///
/// Requests are authorized with a plain API key passed as the `key` query parameter, so only
/// public data is reachable.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    /// HTTP client for API requests
    client: reqwest::Client,
}

// the API key must never end up in logs
impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Creates a new client using `api_key` for every request.
    ///
    /// # Arguments
    ///
    /// * `config` - Where to send requests
    /// * `api_key` - A YouTube Data API v3 key
    /// * `client` - HTTP client for making API requests
    pub fn new(config: &ApiConfig, api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Makes a keyed HTTP request to the YouTube API with common error handling.
    ///
    /// This method consolidates the shared logic across all YouTube API requests:
    /// - URL construction from the configured base
    /// - Query parameters, with the API key appended
    /// - Status code validation and error handling
    ///
    /// # Returns
    ///
    /// The raw [`reqwest::Response`] for method-specific JSON parsing.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn make_request(
        &self,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> eyre::Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .request(method.clone(), &url)
            .query(query_params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("send {} request to YouTube API: {}", method, path))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                method,
                status_code,
                api_error_message(&error_text)
            ));
        }

        Ok(response)
    }

    /// Gets the live streaming details of a single video.
    ///
    /// Uses the `videos.list` API with `part=liveStreamingDetails`. Videos that were never live
    /// come back without a `liveStreamingDetails` block.
    ///
    /// # Returns
    ///
    /// The [`Video`] resource, or `None` if no video has that ID.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self))]
    pub async fn get_live_streaming_details(&self, video_id: &str) -> eyre::Result<Option<Video>> {
        let query_params = [("part", "liveStreamingDetails"), ("id", video_id)];

        let response = self
            .make_request(Method::GET, "/videos", &query_params)
            .await?;

        let videos: VideoListResponse = response
            .json()
            .await
            .context("parse YouTube videos API response as JSON")?;

        tracing::debug!(
            video_id,
            total_results = videos.page_info.as_ref().map(|p| p.total_results),
            returned_items = videos.items.len(),
            "fetched live streaming details"
        );

        Ok(videos.items.into_iter().next())
    }

    /// Lists the most recent messages of a live chat, oldest first.
    ///
    /// Uses the `liveChatMessages.list` API and fetches a single page of at most `max_results`
    /// messages; there is no pagination.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/live/docs/liveChatMessages/list>
    #[instrument(skip(self))]
    pub async fn list_live_chat_messages(
        &self,
        live_chat_id: &str,
        max_results: u32,
    ) -> eyre::Result<Vec<LiveChatMessage>> {
        let max_results_string = max_results.to_string();
        let query_params = [
            ("part", "snippet,authorDetails"),
            ("maxResults", max_results_string.as_str()),
            ("liveChatId", live_chat_id),
        ];

        let response = self
            .make_request(Method::GET, "/liveChat/messages", &query_params)
            .await?;

        let messages: LiveChatMessageListResponse = response
            .json()
            .await
            .context("parse YouTube liveChatMessages API response as JSON")?;

        tracing::debug!(
            live_chat_id,
            returned_items = messages.items.len(),
            polling_interval_ms = messages.polling_interval_millis,
            "fetched live chat messages"
        );

        Ok(messages.items)
    }
}

/// Pull the human-readable message out of a Google API error body, if it has one.
///
/// Error bodies look like `{"error": {"code": 403, "message": "..."}}`; anything else is passed
/// through as-is.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
