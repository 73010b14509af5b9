//! Single-flight refresh guard and the auto-refresh timer.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tablet_panel_sdk::{Timer, TimerTick, Toolkit};

/// Interval used when the interval field is left empty.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

/// Input problems, displayed verbatim in the status line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please provide both the live URL and API key.")]
    MissingFields,
    #[error("Unable to determine the video ID.")]
    NoVideoId,
    #[error("Invalid refresh interval. Enter minutes.")]
    InvalidInterval,
    #[error("The interval must be greater than zero.")]
    NonPositiveInterval,
}

/// Parses the auto-refresh interval, given in (possibly fractional) minutes.
///
/// Empty input means [`DEFAULT_INTERVAL_MINUTES`].
pub fn parse_interval(text: &str) -> Result<Duration, InputError> {
    let text = text.trim();
    let minutes = if text.is_empty() {
        f64::from(DEFAULT_INTERVAL_MINUTES)
    } else {
        text.parse::<f64>()
            .ok()
            .filter(|m| m.is_finite())
            .ok_or(InputError::InvalidInterval)?
    };

    if minutes <= 0.0 {
        return Err(InputError::NonPositiveInterval);
    }

    // whole milliseconds, but never a zero-length timer
    let millis = (minutes * 60_000.0) as u64;
    Ok(Duration::from_millis(millis.max(1)))
}

/// Flags shared between the UI thread and the fetch worker.
#[derive(Debug, Default)]
pub struct RefreshState {
    request_in_progress: AtomicBool,
    auto_refresh_enabled: AtomicBool,
    shutting_down: AtomicBool,
}

impl RefreshState {
    /// Claims the single fetch slot. Returns `false` if a fetch is already in flight.
    pub fn try_begin_request(&self) -> bool {
        !self.request_in_progress.swap(true, Ordering::SeqCst)
    }

    /// Releases the fetch slot.
    pub fn finish_request(&self) {
        self.request_in_progress.store(false, Ordering::SeqCst);
    }

    pub fn request_in_progress(&self) -> bool {
        self.request_in_progress.load(Ordering::SeqCst)
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh_enabled.load(Ordering::SeqCst)
    }

    pub fn shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Returns the previous setting.
    pub(crate) fn set_auto_refresh(&self, enabled: bool) -> bool {
        self.auto_refresh_enabled.swap(enabled, Ordering::SeqCst)
    }
}

/// Owns the fetch worker and the auto-refresh timer of one panel.
///
/// Requests are single-flight: while one fetch runs, further requests are refused rather than
/// queued. At most one worker thread exists at a time.
pub struct RefreshScheduler {
    state: Arc<RefreshState>,
    worker: Mutex<Option<JoinHandle<()>>>,
    timer: Mutex<Option<Box<dyn Timer>>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RefreshState::default()),
            worker: Mutex::new(None),
            timer: Mutex::new(None),
        }
    }

    /// The flags, for handing to a worker.
    pub fn state(&self) -> &Arc<RefreshState> {
        &self.state
    }

    /// Starts `fetch` on a new worker thread.
    ///
    /// The caller must hold the fetch slot (see [`RefreshState::try_begin_request`]); `fetch` is
    /// responsible for releasing it. Any finished previous worker is joined first.
    pub fn spawn_worker<F>(&self, fetch: F) -> std::io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut worker = lock(&self.worker);
        if let Some(previous) = worker.take() {
            join_worker(previous);
        }
        let handle = std::thread::Builder::new()
            .name("youtube-live-fetch".to_string())
            .spawn(fetch)?;
        *worker = Some(handle);
        Ok(())
    }

    /// Blocks until the current worker, if any, has finished.
    pub fn join_worker(&self) {
        let previous = lock(&self.worker).take();
        if let Some(previous) = previous {
            join_worker(previous);
        }
    }

    /// Turns auto-refresh on with a repeating timer that calls `tick` every `interval`.
    ///
    /// Replaces any timer that is already running.
    pub fn arm(&self, toolkit: &dyn Toolkit, interval: Duration, tick: TimerTick) {
        self.state.set_auto_refresh(true);
        let timer = toolkit.start_timer(interval, tick);
        if let Some(previous) = lock(&self.timer).replace(timer) {
            previous.stop();
        }
        let interval_ms = interval.as_millis() as u64;
        tracing::info!(interval_ms, "auto refresh armed");
    }

    /// Turns auto-refresh off and stops the timer. Safe to call when already off.
    pub fn disarm(&self) {
        let was_enabled = self.state.set_auto_refresh(false);
        if let Some(timer) = lock(&self.timer).take() {
            timer.stop();
        }
        if was_enabled {
            tracing::info!("auto refresh stopped");
        }
    }

    /// Whether a timer tick should go ahead with a refresh.
    pub fn tick_should_refresh(&self) -> bool {
        self.state.auto_refresh_enabled() && !self.state.shutting_down()
    }

    /// Final teardown: no more results are delivered, the timer stops, and this blocks until an
    /// in-flight fetch has finished.
    pub fn shutdown(&self) {
        self.state.shutting_down.store(true, Ordering::SeqCst);
        self.disarm();
        self.join_worker();
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn join_worker(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        tracing::error!("live data fetch worker panicked");
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
