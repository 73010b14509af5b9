//! The YouTube Live panel: widgets, callbacks, and rendering of fetch results.
//!
//! Everything here runs on the toolkit's UI thread except the body of the fetch worker, which
//! only ever sees owned data, the shared [`RefreshState`](crate::scheduler::RefreshState), and
//! weak widget handles.

use crate::live_data::{
    LiveData, MAX_COMMENTS, NO_CHAT_MESSAGES, VIEWERS_UNKNOWN, fetch_live_data,
};
use crate::scheduler::{InputError, RefreshScheduler, parse_interval};
use crate::video_id::extract_video_id;
use crate::youtube_api::ApiConfig;
use std::sync::{Arc, Weak};
use tablet_panel_sdk::{App, Button, Keyboard, Label, List, TextArea, Toolkit, Window};
use tracing::instrument;

pub const WINDOW_TITLE: &str = "YouTube Live";
pub const INSTRUCTIONS: &str = "Enter your live URL and YouTube Data API v3 key.";
pub const STATUS_READY: &str = "Ready";
pub const STATUS_UPDATING: &str = "Updating...";
pub const STATUS_BUSY: &str = "Update already in progress...";
pub const CHAT_LOADING: &str = "Loading live chat messages...";
pub const REFRESH_NOW: &str = "Refresh now";
pub const START_AUTO_REFRESH: &str = "Start auto refresh";
pub const STOP_AUTO_REFRESH: &str = "Stop auto refresh";

/// Widget ids, for toolkits and tests that look widgets up by name.
pub mod ids {
    pub const WINDOW: &str = "ytl_window";
    pub const INSTRUCTIONS: &str = "ytl_instructions";
    pub const URL: &str = "ytl_url";
    pub const API_KEY: &str = "ytl_api_key";
    pub const INTERVAL: &str = "ytl_interval";
    pub const REFRESH: &str = "ytl_refresh";
    pub const AUTO_REFRESH: &str = "ytl_auto_refresh";
    pub const STATUS: &str = "ytl_status";
    pub const VIEWERS: &str = "ytl_viewers";
    pub const CHAT_HEADER: &str = "ytl_chat_header";
    pub const CHAT: &str = "ytl_chat";
    pub const KEYBOARD: &str = "ytl_keyboard";
}

/// A YouTube Live panel.
///
/// Dropping the panel stops auto-refresh and blocks until an in-flight fetch has finished; its
/// result is then discarded.
pub struct YouTubeLivePanel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    toolkit: Arc<dyn Toolkit>,
    config: ApiConfig,
    scheduler: RefreshScheduler,

    // kept alive for as long as the panel exists
    window: Arc<dyn Window>,
    _instructions: Arc<dyn Label>,
    _chat_header: Arc<dyn Label>,
    refresh_button: Arc<dyn Button>,

    url: Arc<dyn TextArea>,
    api_key: Arc<dyn TextArea>,
    interval: Arc<dyn TextArea>,
    auto_refresh_button: Arc<dyn Button>,
    status: Arc<dyn Label>,
    viewers: Arc<dyn Label>,
    chat: Arc<dyn List>,
    keyboard: Arc<dyn Keyboard>,
}

impl YouTubeLivePanel {
    /// Builds the panel's widgets on `toolkit` and wires up their callbacks.
    ///
    /// Must be called on the UI thread.
    pub fn new(toolkit: Arc<dyn Toolkit>, config: ApiConfig) -> Self {
        let window = toolkit.window(ids::WINDOW, WINDOW_TITLE);
        let instructions = toolkit.label(ids::INSTRUCTIONS, INSTRUCTIONS);
        let url = toolkit.text_area(ids::URL, "");
        let api_key = toolkit.text_area(ids::API_KEY, "");
        let interval = toolkit.text_area(
            ids::INTERVAL,
            &crate::scheduler::DEFAULT_INTERVAL_MINUTES.to_string(),
        );
        let refresh_button = toolkit.button(ids::REFRESH, REFRESH_NOW);
        let auto_refresh_button = toolkit.button(ids::AUTO_REFRESH, START_AUTO_REFRESH);
        let status = toolkit.label(ids::STATUS, STATUS_READY);
        let viewers = toolkit.label(ids::VIEWERS, VIEWERS_UNKNOWN);
        let chat_header = toolkit.label(ids::CHAT_HEADER, "Live chat:");
        let chat = toolkit.list(ids::CHAT);
        chat.add(NO_CHAT_MESSAGES);
        let keyboard = toolkit.keyboard(ids::KEYBOARD, Arc::clone(&url));

        let inner = Arc::new(PanelInner {
            toolkit,
            config,
            scheduler: RefreshScheduler::new(),
            window,
            _instructions: instructions,
            _chat_header: chat_header,
            refresh_button,
            url,
            api_key,
            interval,
            auto_refresh_button,
            status,
            viewers,
            chat,
            keyboard,
        });
        PanelInner::connect(&inner);

        tracing::debug!(base_url = %inner.config.base_url, "youtube live panel created");
        Self { inner }
    }

    /// Same as pressing "Refresh now".
    pub fn trigger_refresh(&self) {
        self.inner.trigger_refresh();
    }

    /// Same as pressing the toggle while auto-refresh is off.
    pub fn start_auto_refresh(&self) {
        PanelInner::start_auto_refresh(&self.inner);
    }

    /// Same as pressing the toggle while auto-refresh is on.
    pub fn stop_auto_refresh(&self) {
        self.inner.stop_auto_refresh();
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.inner.scheduler.state().auto_refresh_enabled()
    }

    pub fn request_in_progress(&self) -> bool {
        self.inner.scheduler.state().request_in_progress()
    }
}

impl App for YouTubeLivePanel {
    fn suspend(&self) {
        tracing::debug!("panel suspended");
        self.inner.stop_auto_refresh();
    }
}

impl Drop for YouTubeLivePanel {
    fn drop(&mut self) {
        tracing::debug!("tearing down youtube live panel");
        self.inner.scheduler.shutdown();
    }
}

impl PanelInner {
    /// Registers widget callbacks. They only hold weak references to the panel.
    fn connect(this: &Arc<Self>) {
        let weak = Arc::downgrade(this);

        this.window.set_on_close(with_panel(&weak, |panel| {
            panel.stop_auto_refresh();
            panel.toolkit.request_exit();
        }));

        this.refresh_button
            .set_callback(with_panel(&weak, |panel| panel.trigger_refresh()));

        let toggle = weak.clone();
        this.auto_refresh_button.set_callback(Box::new(move || {
            let Some(panel) = toggle.upgrade() else {
                return;
            };
            if panel.scheduler.state().auto_refresh_enabled() {
                panel.stop_auto_refresh();
            } else {
                PanelInner::start_auto_refresh(&panel);
            }
        }));

        for area in [&this.url, &this.api_key, &this.interval] {
            let target = Arc::downgrade(area);
            area.set_click_handler(with_panel(&weak, move |panel| {
                if let Some(target) = target.upgrade() {
                    panel.keyboard.set_target(target);
                }
            }));
        }
    }

    #[instrument(skip(self))]
    fn trigger_refresh(&self) {
        let state = self.scheduler.state();
        if state.request_in_progress() {
            self.status.set_text(STATUS_BUSY);
            return;
        }

        let (api_key, video_id) = match self.read_inputs() {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::debug!(error = %e, "refresh refused");
                self.status.set_text(&e.to_string());
                return;
            }
        };

        if !state.try_begin_request() {
            self.status.set_text(STATUS_BUSY);
            return;
        }

        self.status.set_text(STATUS_UPDATING);
        self.viewers.set_text(VIEWERS_UNKNOWN);
        self.chat.clear();
        self.chat.add(CHAT_LOADING);

        tracing::info!(%video_id, "refreshing live data");
        let worker_state = Arc::clone(state);
        let toolkit = Arc::clone(&self.toolkit);
        let config = self.config.clone();
        let display = self.display_handles();
        let spawned = self.scheduler.spawn_worker(move || {
            let data = fetch_live_data(&config, &api_key, &video_id);
            worker_state.finish_request();
            if worker_state.shutting_down() {
                tracing::debug!(%video_id, "panel is gone, dropping live data");
                return;
            }
            let render = move || display.render(&data);
            toolkit.execute_later(Box::new(render));
        });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start fetch worker");
            state.finish_request();
            self.status.set_text(&format!("Error: {e}"));
        }
    }

    /// The trimmed API key and the video ID, or why a refresh cannot start.
    fn read_inputs(&self) -> Result<(String, String), InputError> {
        let url = self.url.text();
        let api_key = self.api_key.text();
        let (url, api_key) = (url.trim(), api_key.trim());
        if url.is_empty() || api_key.is_empty() {
            return Err(InputError::MissingFields);
        }
        let video_id = extract_video_id(url).ok_or(InputError::NoVideoId)?;
        Ok((api_key.to_string(), video_id))
    }

    fn start_auto_refresh(this: &Arc<Self>) {
        let interval = match parse_interval(&this.interval.text()) {
            Ok(interval) => interval,
            Err(e) => {
                tracing::debug!(error = %e, "auto refresh not started");
                this.status.set_text(&e.to_string());
                return;
            }
        };

        let weak = Arc::downgrade(this);
        this.scheduler.arm(
            this.toolkit.as_ref(),
            interval,
            Box::new(move || match weak.upgrade() {
                Some(panel) => panel.on_timer(),
                None => false,
            }),
        );
        this.auto_refresh_button.set_text(STOP_AUTO_REFRESH);
        this.trigger_refresh();
    }

    fn stop_auto_refresh(&self) {
        self.scheduler.disarm();
        self.auto_refresh_button.set_text(START_AUTO_REFRESH);
    }

    /// Timer tick. Returns whether the timer should keep running.
    fn on_timer(&self) -> bool {
        if !self.scheduler.tick_should_refresh() {
            return false;
        }
        self.trigger_refresh();
        self.scheduler.state().auto_refresh_enabled()
    }

    fn display_handles(&self) -> DisplayHandles {
        DisplayHandles {
            status: Arc::downgrade(&self.status),
            viewers: Arc::downgrade(&self.viewers),
            chat: Arc::downgrade(&self.chat),
        }
    }
}

/// Wraps `f` into a widget callback that runs only while the panel is alive.
fn with_panel<F>(panel: &Weak<PanelInner>, f: F) -> tablet_panel_sdk::Callback
where
    F: Fn(&PanelInner) + Send + Sync + 'static,
{
    let panel = panel.clone();
    Box::new(move || {
        if let Some(panel) = panel.upgrade() {
            f(&panel);
        }
    })
}

/// The widgets a fetch result is drawn into, held weakly.
struct DisplayHandles {
    status: Weak<dyn Label>,
    viewers: Weak<dyn Label>,
    chat: Weak<dyn List>,
}

impl DisplayHandles {
    /// Puts `data` on screen. Widgets that no longer exist are skipped.
    fn render(&self, data: &LiveData) {
        if let Some(status) = self.status.upgrade() {
            let text = non_empty_or(&data.status_text, STATUS_READY);
            status.set_text(text);
        }
        if let Some(viewers) = self.viewers.upgrade() {
            let text = non_empty_or(&data.viewers_text, VIEWERS_UNKNOWN);
            viewers.set_text(text);
        }
        if let Some(chat) = self.chat.upgrade() {
            chat.clear();
            if data.comments.is_empty() {
                chat.add(NO_CHAT_MESSAGES);
            }
            for comment in data.comments.iter().take(MAX_COMMENTS) {
                chat.add(comment);
            }
        }
    }
}

fn non_empty_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() { fallback } else { text }
}
