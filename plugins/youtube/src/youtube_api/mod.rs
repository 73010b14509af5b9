//! YouTube Data API v3 client library.
//!
//! Only the two read-only calls a live-stream panel needs are covered:
//!
//! - [`YouTubeClient::get_live_streaming_details`] reads `videos.list` with
//!   `part=liveStreamingDetails`, which carries the concurrent viewer count and the ID of the
//!   active live chat.
//! - [`YouTubeClient::list_live_chat_messages`] reads one page of `liveChatMessages.list`.
//!
//! Both are authorized with a plain API key rather than OAuth, so only public streams work.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tablet_youtube_live::youtube_api::{ApiConfig, YouTubeClient};
//!
//! # async fn example() -> eyre::Result<()> {
//! let client = YouTubeClient::new(&ApiConfig::default(), "my-api-key", reqwest::Client::new());
//! if let Some(video) = client.get_live_streaming_details("dQw4w9WgXcQ").await? {
//!     if let Some(chat_id) = video.live_streaming_details.and_then(|d| d.active_live_chat_id) {
//!         for message in client.list_live_chat_messages(&chat_id, 25).await? {
//!             println!("{:?}: {:?}", message.author_name(), message.display_message());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod videos;

// Re-export main types for convenience
pub use client::{ApiConfig, BASE_URL_ENV, DEFAULT_BASE_URL, YouTubeClient};

pub use chat::{
    LiveChatMessage, LiveChatMessageAuthor, LiveChatMessageListResponse, LiveChatMessageSnippet,
};

pub use videos::{LiveStreamingDetails, PageInfo, Video, VideoListResponse};
