//! Drives the panel through the mock toolkit, with a mock YouTube API behind it.
//!
//! The test thread plays the UI thread: it clicks, types, fires timers and runs the tasks the
//! fetch worker posts back.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tablet_panel_sdk::mock::MockToolkit;
use tablet_panel_sdk::{App, TextArea};
use tablet_youtube_live::live_data::{NO_CHAT_MESSAGES, VIEWERS_UNKNOWN};
use tablet_youtube_live::panel::{
    CHAT_LOADING, START_AUTO_REFRESH, STATUS_BUSY, STATUS_READY, STATUS_UPDATING,
    STOP_AUTO_REFRESH, ids,
};
use tablet_youtube_live::{ApiConfig, YouTubeLivePanel};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const RESULT_TIMEOUT: Duration = Duration::from_secs(10);
const MISSING_FIELDS: &str = "Please provide both the live URL and API key.";

fn panel(base_url: &str) -> (Arc<MockToolkit>, YouTubeLivePanel) {
    let toolkit = MockToolkit::new();
    let panel = YouTubeLivePanel::new(
        toolkit.clone(),
        ApiConfig {
            base_url: base_url.to_string(),
        },
    );
    (toolkit, panel)
}

fn fill_in(toolkit: &MockToolkit, url: &str, key: &str) {
    assert!(toolkit.type_into(ids::URL, url));
    assert!(toolkit.type_into(ids::API_KEY, key));
}

fn status(toolkit: &MockToolkit) -> String {
    toolkit.label_text(ids::STATUS).unwrap()
}

fn viewers(toolkit: &MockToolkit) -> String {
    toolkit.label_text(ids::VIEWERS).unwrap()
}

fn wait_for_result(toolkit: &MockToolkit) {
    assert!(
        toolkit.wait_for_task(RESULT_TIMEOUT),
        "fetch result never reached the UI thread"
    );
}

async fn mount_live_stream(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "items": [{
                        "id": "dQw4w9WgXcQ",
                        "liveStreamingDetails": {
                            "concurrentViewers": "42",
                            "activeLiveChatId": "chat-1"
                        }
                    }]
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/liveChat/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "snippet": { "displayMessage": "first!" },
                    "authorDetails": { "displayName": "Alice" }
                },
                {
                    "snippet": { "displayMessage": "hello from the cockpit" },
                    "authorDetails": { "displayName": "Bob" }
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn video_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/videos")
        .count()
}

#[test]
fn refresh_needs_url_and_key() {
    let (toolkit, _panel) = panel("http://127.0.0.1:9");

    assert!(toolkit.click(ids::REFRESH));
    assert_eq!(status(&toolkit), MISSING_FIELDS);

    fill_in(&toolkit, LIVE_URL, "   ");
    assert!(toolkit.click(ids::REFRESH));
    assert_eq!(status(&toolkit), MISSING_FIELDS);

    fill_in(&toolkit, "not a url", "key");
    assert!(toolkit.click(ids::REFRESH));
    assert_eq!(status(&toolkit), "Unable to determine the video ID.");

    // nothing was started, so the rest of the panel is untouched
    assert_eq!(toolkit.run_pending(), 0);
    assert_eq!(viewers(&toolkit), VIEWERS_UNKNOWN);
    assert_eq!(
        toolkit.list_entries(ids::CHAT),
        Some(vec![NO_CHAT_MESSAGES.to_string()])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_shows_viewers_and_chat() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::ZERO).await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");

    assert!(toolkit.click(ids::REFRESH));
    assert_eq!(status(&toolkit), STATUS_UPDATING);
    assert_eq!(viewers(&toolkit), VIEWERS_UNKNOWN);
    assert_eq!(
        toolkit.list_entries(ids::CHAT),
        Some(vec![CHAT_LOADING.to_string()])
    );

    wait_for_result(&toolkit);
    let message = status(&toolkit);
    assert!(message.starts_with("Last update: "), "{message}");
    assert_eq!(viewers(&toolkit), "Concurrent viewers: 42");
    assert_eq!(
        toolkit.list_entries(ids::CHAT),
        Some(vec![
            "Alice: first!".to_string(),
            "Bob: hello from the cockpit".to_string()
        ])
    );
    assert!(!panel.request_in_progress());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_is_single_flight() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::from_millis(500)).await;
    let (toolkit, _panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");

    assert!(toolkit.click(ids::REFRESH));
    assert!(toolkit.click(ids::REFRESH));
    assert_eq!(status(&toolkit), STATUS_BUSY);

    wait_for_result(&toolkit);
    assert!(status(&toolkit).starts_with("Last update: "));
    assert_eq!(video_requests(&server).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn api_errors_end_up_in_the_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid. Please pass a valid API key." }
        })))
        .mount(&server)
        .await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "bad-key");

    panel.trigger_refresh();
    wait_for_result(&toolkit);

    let message = status(&toolkit);
    assert!(message.starts_with("Error: "), "{message}");
    assert!(message.contains("API key not valid"), "{message}");
    assert!(!message.contains("bad-key"), "{message}");
    assert_eq!(viewers(&toolkit), VIEWERS_UNKNOWN);
    assert_eq!(
        toolkit.list_entries(ids::CHAT),
        Some(vec![NO_CHAT_MESSAGES.to_string()])
    );

    // the panel stays usable
    panel.trigger_refresh();
    assert_eq!(status(&toolkit), STATUS_UPDATING);
    wait_for_result(&toolkit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_video_is_reported() {
    let server = MockServer::start().await;
    let not_found = ResponseTemplate::new(200)
        .set_body_json(json!({ "items": [] }));
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(not_found)
        .mount(&server)
        .await;
    let (toolkit, _panel) = panel(&server.uri());
    fill_in(&toolkit, "https://youtu.be/AAAAAAAAAAA", "key");

    assert!(toolkit.click(ids::REFRESH));
    wait_for_result(&toolkit);

    assert_eq!(status(&toolkit), "Live stream not found.");
    assert_eq!(viewers(&toolkit), VIEWERS_UNKNOWN);
}

#[test]
fn auto_refresh_rejects_bad_intervals() {
    let (toolkit, panel) = panel("http://127.0.0.1:9");

    for (interval, message) in [
        ("0", "The interval must be greater than zero."),
        ("-1.5", "The interval must be greater than zero."),
        ("abc", "Invalid refresh interval. Enter minutes."),
    ] {
        assert!(toolkit.type_into(ids::INTERVAL, interval));
        assert!(toolkit.click(ids::AUTO_REFRESH));
        assert_eq!(status(&toolkit), message, "interval {interval:?}");
        assert!(!panel.auto_refresh_enabled());
        assert!(toolkit.active_timers().is_empty());
        assert_eq!(
            toolkit.button_text(ids::AUTO_REFRESH).as_deref(),
            Some(START_AUTO_REFRESH)
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn auto_refresh_toggles_and_refreshes_right_away() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::ZERO).await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");
    assert!(toolkit.type_into(ids::INTERVAL, "2"));

    assert!(toolkit.click(ids::AUTO_REFRESH));
    assert!(panel.auto_refresh_enabled());
    assert_eq!(toolkit.active_timers(), vec![Duration::from_secs(120)]);
    assert_eq!(
        toolkit.button_text(ids::AUTO_REFRESH).as_deref(),
        Some(STOP_AUTO_REFRESH)
    );
    assert_eq!(status(&toolkit), STATUS_UPDATING);
    wait_for_result(&toolkit);
    assert_eq!(video_requests(&server).await, 1);

    assert!(toolkit.click(ids::AUTO_REFRESH));
    assert!(!panel.auto_refresh_enabled());
    assert!(toolkit.active_timers().is_empty());
    assert_eq!(
        toolkit.button_text(ids::AUTO_REFRESH).as_deref(),
        Some(START_AUTO_REFRESH)
    );
    assert_eq!(toolkit.fire_timers(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timer_ticks_refresh() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::ZERO).await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");
    assert!(toolkit.type_into(ids::INTERVAL, ""));

    panel.start_auto_refresh();
    assert_eq!(toolkit.active_timers(), vec![Duration::from_secs(60)]);
    wait_for_result(&toolkit);

    assert_eq!(toolkit.fire_timers(), 1);
    assert_eq!(status(&toolkit), STATUS_UPDATING);
    wait_for_result(&toolkit);
    assert_eq!(video_requests(&server).await, 2);

    // the timer keeps going while auto-refresh is on
    assert_eq!(toolkit.active_timers(), vec![Duration::from_secs(60)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn restarting_auto_refresh_replaces_the_timer() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::ZERO).await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");

    panel.start_auto_refresh();
    wait_for_result(&toolkit);
    assert!(toolkit.type_into(ids::INTERVAL, "0.5"));
    panel.start_auto_refresh();
    wait_for_result(&toolkit);

    assert_eq!(toolkit.active_timers(), vec![Duration::from_secs(30)]);
}

#[test]
fn stopping_auto_refresh_twice_is_harmless() {
    let (toolkit, panel) = panel("http://127.0.0.1:9");
    panel.stop_auto_refresh();
    panel.stop_auto_refresh();
    assert!(!panel.auto_refresh_enabled());
    assert_eq!(
        toolkit.button_text(ids::AUTO_REFRESH).as_deref(),
        Some(START_AUTO_REFRESH)
    );
}

#[test]
fn suspend_stops_auto_refresh() {
    let (toolkit, panel) = panel("http://127.0.0.1:9");

    // with empty fields the immediate refresh is refused, but the timer runs
    panel.start_auto_refresh();
    assert!(panel.auto_refresh_enabled());
    assert_eq!(toolkit.active_timers().len(), 1);

    panel.suspend();
    assert!(!panel.auto_refresh_enabled());
    assert!(toolkit.active_timers().is_empty());
}

#[test]
fn closing_the_window_stops_auto_refresh_and_exits() {
    let (toolkit, panel) = panel("http://127.0.0.1:9");
    panel.start_auto_refresh();
    assert_eq!(status(&toolkit), MISSING_FIELDS);

    assert!(toolkit.close_window(ids::WINDOW));
    assert!(toolkit.exit_requested());
    assert!(!panel.auto_refresh_enabled());
    assert!(toolkit.active_timers().is_empty());
    assert_eq!(
        toolkit.button_text(ids::AUTO_REFRESH).as_deref(),
        Some(START_AUTO_REFRESH)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_the_panel_mid_fetch_discards_the_result() {
    let server = MockServer::start().await;
    mount_live_stream(&server, Duration::from_millis(300)).await;
    let (toolkit, panel) = panel(&server.uri());
    fill_in(&toolkit, LIVE_URL, "key");

    panel.trigger_refresh();
    assert!(panel.request_in_progress());
    drop(panel);

    // the worker has been joined and did not post anything
    assert_eq!(toolkit.run_pending(), 0);
    assert!(toolkit.find_label(ids::STATUS).is_none());
    assert!(toolkit.find_list(ids::CHAT).is_none());
}

#[test]
fn keyboard_follows_the_clicked_field() {
    let (toolkit, _panel) = panel("http://127.0.0.1:9");
    let keyboard = toolkit.find_keyboard(ids::KEYBOARD).unwrap();
    assert_eq!(keyboard.target_id(), ids::URL);

    assert!(toolkit.click(ids::API_KEY));
    assert_eq!(keyboard.target_id(), ids::API_KEY);
    keyboard.type_text("secret");
    let api_key = toolkit.find_text_area(ids::API_KEY).unwrap();
    assert_eq!(api_key.text(), "secret");

    assert!(toolkit.click(ids::INTERVAL));
    keyboard.type_text("5");
    assert_eq!(toolkit.find_text_area(ids::INTERVAL).unwrap().text(), "15");

    assert!(toolkit.click(ids::URL));
    assert_eq!(keyboard.target_id(), ids::URL);
}

#[test]
fn initial_state() {
    let (toolkit, panel) = panel("http://127.0.0.1:9");
    assert_eq!(status(&toolkit), STATUS_READY);
    assert!(!panel.auto_refresh_enabled());
    assert!(!panel.request_in_progress());
    assert!(!toolkit.exit_requested());
}
