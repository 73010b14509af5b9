//! Toolkit seam for cockpit-tablet panels.
//!
//! A panel never talks to the GUI toolkit directly. It asks a [`Toolkit`] for widgets, registers
//! callbacks on them, and hands work back to the UI thread with [`Toolkit::execute_later`]. The
//! toolkit guarantees that every callback, timer tick and deferred task runs on its UI thread.
//!
//! Widget handles are cheap, thread-safe references into the toolkit. A panel owns the strong
//! handles to its widgets; anything that must not keep a widget alive (such as a closure built on
//! a worker thread) holds a [`std::sync::Weak`] instead.
//!
//! With the `mock` feature enabled, [`mock::MockToolkit`] provides an in-memory toolkit for tests.

use std::sync::Arc;
use std::time::Duration;

pub mod widgets;
pub use widgets::{Button, Keyboard, Label, List, TextArea, Widget, Window};

#[cfg(feature = "mock")]
pub mod mock;

/// A callback invoked by the toolkit on its UI thread.
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// A unit of work queued onto the UI thread.
pub type Task = Box<dyn FnOnce() + Send>;

/// A repeating timer callback.
///
/// Returning `false` tells the toolkit not to schedule the timer again.
pub type TimerTick = Box<dyn FnMut() -> bool + Send>;

/// The host GUI toolkit as seen by a panel.
///
/// Every widget gets a string id that is unique within the panel. The toolkit may use it for
/// accessibility or debugging; tests use it to find widgets.
pub trait Toolkit: Send + Sync {
    fn window(&self, id: &str, title: &str) -> Arc<dyn Window>;
    fn label(&self, id: &str, text: &str) -> Arc<dyn Label>;
    fn text_area(&self, id: &str, text: &str) -> Arc<dyn TextArea>;
    fn button(&self, id: &str, text: &str) -> Arc<dyn Button>;
    fn list(&self, id: &str) -> Arc<dyn List>;
    fn keyboard(&self, id: &str, target: Arc<dyn TextArea>) -> Arc<dyn Keyboard>;

    /// Queue `task` to run on the UI thread.
    ///
    /// May be called from any thread.
    fn execute_later(&self, task: Task);

    /// Start a repeating timer that calls `tick` on the UI thread every `interval`.
    ///
    /// The timer keeps firing until `tick` returns `false` or the returned handle is stopped.
    fn start_timer(&self, interval: Duration, tick: TimerTick) -> Box<dyn Timer>;

    /// Ask the host to close the current app.
    fn request_exit(&self);
}

/// Handle to a running timer.
pub trait Timer: Send {
    /// Stop the timer. No tick will start after this returns.
    ///
    /// Dropping the handle stops the timer as well.
    fn stop(&self);
}

/// Lifecycle hooks the host calls on an app.
pub trait App {
    /// The app is being hidden, but not destroyed.
    fn suspend(&self) {}

    /// The app is visible again after a [`App::suspend`].
    fn resume(&self) {}
}
