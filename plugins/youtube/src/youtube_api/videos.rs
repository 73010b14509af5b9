//! YouTube Videos API types.

use serde::Deserialize;

/// Response structure for the `videos.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    /// The videos that match the requested ID.
    ///
    /// Empty (or absent) when no video has the requested ID.
    #[serde(default)]
    pub items: Vec<Video>,
    pub page_info: Option<PageInfo>,
}

/// Paging details of a list response. Only the total is of interest for a single-ID lookup.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list#pageInfo>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: u32,
}

/// A `video` resource, reduced to the part the live panel asks for.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Only present if the video is an upcoming, live, or completed live broadcast.
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

/// Live streaming details for a video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#liveStreamingDetails>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    /// The number of viewers currently watching the broadcast.
    ///
    /// The API sends this as a decimal string, and only while the broadcast is live and the
    /// owner has not hidden the count.
    pub concurrent_viewers: Option<String>,
    /// The ID of the currently active live chat attached to this video.
    ///
    /// Absent once the broadcast has ended or if chat is disabled.
    pub active_live_chat_id: Option<String>,
}
