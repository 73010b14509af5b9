//! A YouTube Live panel for the cockpit tablet.
//!
//! The panel takes a live-stream URL and a YouTube Data API v3 key, then shows the stream's
//! concurrent viewer count and its latest chat messages, either on demand or on a timer.
//!
//! The pieces, bottom up:
//! - [`video_id`] finds the video ID in a pasted URL.
//! - [`youtube_api`] is a small keyed client for the two API calls involved.
//! - [`live_data`] runs one fetch cycle and turns it into display text.
//! - [`scheduler`] keeps fetches single-flight and drives auto-refresh.
//! - [`panel`] builds the widgets through [`tablet_panel_sdk::Toolkit`] and ties it all together.
//!
//! The API base URL defaults to the public YouTube Data API. The `youtube-live-cli` binary lets
//! `YOUTUBE_API_BASE_URL` point it somewhere else (see [`ApiConfig::from_env`]), which is how it
//! is aimed at a local mock server.

pub mod live_data;
pub mod panel;
pub mod scheduler;
pub mod video_id;
pub mod youtube_api;

pub use live_data::{LiveData, download_live_data, fetch_live_data};
pub use panel::YouTubeLivePanel;
pub use scheduler::{InputError, parse_interval};
pub use video_id::extract_video_id;
pub use youtube_api::{ApiConfig, YouTubeClient};
