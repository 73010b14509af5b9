//! Runs one live data fetch from the terminal, without a tablet.
//!
//! Usage: `youtube-live-cli <live-url> <api-key>`
//!
//! Set `YOUTUBE_API_BASE_URL` to talk to something other than the real API.

use eyre::Context;
use std::io::IsTerminal;
use tablet_youtube_live::{ApiConfig, YouTubeClient, download_live_data, extract_video_id};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(url), Some(api_key)) = (args.next(), args.next()) else {
        eyre::bail!("usage: youtube-live-cli <live-url> <api-key>");
    };

    let video_id = extract_video_id(&url)
        .ok_or_else(|| eyre::eyre!("unable to determine the video ID from {url:?}"))?;
    let config = ApiConfig::from_env();
    tracing::debug!(base_url = %config.base_url, "using YouTube API");

    let client = YouTubeClient::new(&config, api_key, reqwest::Client::new());
    let data = download_live_data(&client, &video_id)
        .await
        .with_context(|| format!("fetch live data for {video_id}"))?;

    eprintln!("==> {video_id}");
    eprintln!("{}", data.status_text);
    if data.success {
        eprintln!("{}", data.viewers_text);
    }
    for comment in &data.comments {
        println!("{comment}");
    }

    Ok(())
}
