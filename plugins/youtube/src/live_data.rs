//! One fetch cycle: viewer count plus the latest chat lines for a live video.

use crate::youtube_api::{ApiConfig, YouTubeClient};
use eyre::Context;

/// Upper bound on chat lines fetched and shown.
pub const MAX_COMMENTS: usize = 25;

pub const VIEWERS_UNKNOWN: &str = "Concurrent viewers: --";
pub const VIEWERS_NOT_REPORTED: &str = "Concurrent viewers: n/a";
pub const VIEWERS_UNAVAILABLE: &str = "Concurrent viewers: unavailable";

pub const STREAM_NOT_FOUND: &str = "Live stream not found.";
pub const NO_CHAT_DATA: &str = "Live stream does not expose live chat data.";
pub const CHAT_NOT_ACTIVE: &str = "Live chat is not active for this stream.";
pub const NO_CHAT_MESSAGES: &str = "No live chat messages available.";

/// The outcome of one fetch cycle, ready to be put on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveData {
    /// Both API calls went through and the video exists.
    pub success: bool,
    pub viewers_text: String,
    pub status_text: String,
    /// `"<author>: <message>"` lines in chat order, at most [`MAX_COMMENTS`].
    pub comments: Vec<String>,
}

impl LiveData {
    /// A failed cycle that only carries a status line.
    pub fn failed(status_text: impl Into<String>) -> Self {
        Self {
            status_text: status_text.into(),
            ..Self::default()
        }
    }
}

/// Fetches viewer count and recent chat for `video_id`.
///
/// A video that does not exist is not an error: it yields an unsuccessful [`LiveData`] with
/// [`STREAM_NOT_FOUND`] as status. Any transport, HTTP or decoding failure aborts the whole cycle
/// with an `Err`, even if the viewer count was already known.
#[tracing::instrument(skip(client))]
pub async fn download_live_data(client: &YouTubeClient, video_id: &str) -> eyre::Result<LiveData> {
    let Some(video) = client
        .get_live_streaming_details(video_id)
        .await
        .context("fetch video details")?
    else {
        tracing::info!(video_id, "video not found");
        return Ok(LiveData::failed(STREAM_NOT_FOUND));
    };

    let mut result = LiveData::default();
    match video.live_streaming_details {
        None => {
            tracing::debug!(video_id, "video has no live streaming details");
            result.viewers_text = VIEWERS_UNAVAILABLE.to_string();
            result.comments.push(NO_CHAT_DATA.to_string());
        }
        Some(details) => {
            result.viewers_text = match &details.concurrent_viewers {
                Some(viewers) => format!("Concurrent viewers: {viewers}"),
                None => VIEWERS_NOT_REPORTED.to_string(),
            };

            match &details.active_live_chat_id {
                Some(live_chat_id) => {
                    let messages = client
                        .list_live_chat_messages(live_chat_id, MAX_COMMENTS as u32)
                        .await
                        .context("fetch live chat messages")?;
                    result.comments = messages
                        .iter()
                        .filter_map(|message| {
                            let text = message.display_message().filter(|t| !t.is_empty())?;
                            let author = message.author_name().unwrap_or("Unknown");
                            Some(format!("{author}: {text}"))
                        })
                        .take(MAX_COMMENTS)
                        .collect();
                }
                None => result.comments.push(CHAT_NOT_ACTIVE.to_string()),
            }
        }
    }

    if result.comments.is_empty() {
        result.comments.push(NO_CHAT_MESSAGES.to_string());
    }

    result.status_text = format!("Last update: {}", local_clock_time());
    result.success = true;

    tracing::debug!(
        video_id,
        viewers = %result.viewers_text,
        comments = result.comments.len(),
        "live data fetched"
    );
    Ok(result)
}

/// Runs a complete fetch cycle on the calling thread.
///
/// This is what the panel's worker thread runs. It builds a single-threaded runtime and a fresh
/// HTTP client for the cycle, and turns every failure into a [`LiveData`] whose status reads
/// `"Error: <message>"`.
pub fn fetch_live_data(config: &ApiConfig, api_key: &str, video_id: &str) -> LiveData {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build fetch runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => return LiveData::failed(format!("Error: {e:#}")),
    };

    let client = YouTubeClient::new(config, api_key, reqwest::Client::new());
    match runtime.block_on(download_live_data(&client, video_id)) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(video_id, error = %format!("{e:#}"), "live data fetch failed");
            LiveData::failed(format!("Error: {e:#}"))
        }
    }
}

/// Current local wall-clock time as `HH:MM:SS`.
fn local_clock_time() -> String {
    jiff::Zoned::now().strftime("%H:%M:%S").to_string()
}
