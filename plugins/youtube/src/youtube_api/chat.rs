//! YouTube Live Chat API types.

use serde::Deserialize;

/// Response structure for the `liveChatMessages.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages/list>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageListResponse {
    /// A list of chat messages, oldest first.
    #[serde(default)]
    pub items: Vec<LiveChatMessage>,
    /// How long the API asks clients to wait before polling again.
    pub polling_interval_millis: Option<u64>,
}

/// A `liveChatMessage` resource represents a chat message in a YouTube live stream.
///
/// Chat messages include regular text messages, Super Chats, membership gifts,
/// and system events such as deletions. Only the fields needed to show a line of chat
/// are modeled, and all of them are optional so that unusual message types do not break
/// parsing of the whole page.
///
/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#resource>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessage {
    pub snippet: Option<LiveChatMessageSnippet>,
    pub author_details: Option<LiveChatMessageAuthor>,
}

impl LiveChatMessage {
    /// The text to show for this message, if it has any.
    pub fn display_message(&self) -> Option<&str> {
        self.snippet.as_ref()?.display_message.as_deref()
    }

    /// The author's display name, if the API included author details.
    pub fn author_name(&self) -> Option<&str> {
        self.author_details.as_ref()?.display_name.as_deref()
    }
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#snippet>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageSnippet {
    /// Contains a string that can be displayed to the user.
    ///
    /// If this field is not present, the message is being deleted.
    pub display_message: Option<String>,
}

/// See: <https://developers.google.com/youtube/v3/live/docs/liveChatMessages#authorDetails>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatMessageAuthor {
    /// The display name of the channel as it appears in chat.
    pub display_name: Option<String>,
}
