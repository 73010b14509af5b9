//! In-memory toolkit for testing panels.
//!
//! [`MockToolkit`] implements [`Toolkit`] without any rendering. The thread that drives the mock
//! plays the role of the UI thread: it simulates user input ([`MockToolkit::click`],
//! [`MockToolkit::type_into`]), runs deferred tasks ([`MockToolkit::run_pending`],
//! [`MockToolkit::wait_for_task`]) and fires timers ([`MockToolkit::fire_timers`]).
//!
//! ## Ownership
//! The mock only keeps weak references to the widgets it hands out, exactly like a panel's
//! completion closures do. Once the panel drops a widget, the `find_*` lookups return `None`.

use crate::{
    Button, Callback, Keyboard, Label, List, Task, TextArea, Timer, TimerTick, Toolkit, Widget,
    Window,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak, mpsc};
use std::time::Duration;

type SharedCallback = Arc<dyn Fn() + Send + Sync>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicking test callback must not take every later assertion down with it
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A toolkit that records widgets and queues instead of drawing anything.
pub struct MockToolkit {
    registry: Mutex<Registry>,
    tasks_tx: mpsc::Sender<Task>,
    tasks_rx: Mutex<mpsc::Receiver<Task>>,
    exit_requested: AtomicBool,
}

#[derive(Default)]
struct Registry {
    windows: HashMap<String, Weak<MockWindow>>,
    labels: HashMap<String, Weak<MockLabel>>,
    text_areas: HashMap<String, Weak<MockTextArea>>,
    buttons: HashMap<String, Weak<MockButton>>,
    lists: HashMap<String, Weak<MockList>>,
    keyboards: HashMap<String, Weak<MockKeyboard>>,
    timers: Vec<Arc<TimerSlot>>,
}

impl MockToolkit {
    pub fn new() -> Arc<Self> {
        let (tasks_tx, tasks_rx) = mpsc::channel();
        Arc::new(Self {
            registry: Mutex::new(Registry::default()),
            tasks_tx,
            tasks_rx: Mutex::new(tasks_rx),
            exit_requested: AtomicBool::new(false),
        })
    }

    pub fn find_window(&self, id: &str) -> Option<Arc<MockWindow>> {
        lock(&self.registry).windows.get(id)?.upgrade()
    }

    pub fn find_label(&self, id: &str) -> Option<Arc<MockLabel>> {
        lock(&self.registry).labels.get(id)?.upgrade()
    }

    pub fn find_text_area(&self, id: &str) -> Option<Arc<MockTextArea>> {
        lock(&self.registry).text_areas.get(id)?.upgrade()
    }

    pub fn find_button(&self, id: &str) -> Option<Arc<MockButton>> {
        lock(&self.registry).buttons.get(id)?.upgrade()
    }

    pub fn find_list(&self, id: &str) -> Option<Arc<MockList>> {
        lock(&self.registry).lists.get(id)?.upgrade()
    }

    pub fn find_keyboard(&self, id: &str) -> Option<Arc<MockKeyboard>> {
        lock(&self.registry).keyboards.get(id)?.upgrade()
    }

    /// Current text of the label `id`, if it still exists.
    pub fn label_text(&self, id: &str) -> Option<String> {
        self.find_label(id).map(|label| label.text())
    }

    /// Current caption of the button `id`, if it still exists.
    pub fn button_text(&self, id: &str) -> Option<String> {
        self.find_button(id).map(|button| button.text())
    }

    /// Current lines of the list `id`, if it still exists.
    pub fn list_entries(&self, id: &str) -> Option<Vec<String>> {
        self.find_list(id).map(|list| list.entries())
    }

    /// Replace the contents of text area `id`, as if the user had typed `text`.
    ///
    /// Returns `false` if there is no such text area.
    pub fn type_into(&self, id: &str, text: &str) -> bool {
        match self.find_text_area(id) {
            Some(area) => {
                area.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Press the button or text area `id`, running its callback on the calling thread.
    ///
    /// Returns `false` if nothing with that id exists or it has no callback registered.
    pub fn click(&self, id: &str) -> bool {
        let callback = if let Some(button) = self.find_button(id) {
            button.callback()
        } else if let Some(area) = self.find_text_area(id) {
            area.click_handler()
        } else {
            None
        };

        match callback {
            Some(callback) => {
                tracing::debug!(id, "mock click");
                callback();
                true
            }
            None => {
                tracing::debug!(id, "mock click on widget without callback");
                false
            }
        }
    }

    /// Close the window `id` through its close handler.
    pub fn close_window(&self, id: &str) -> bool {
        let Some(window) = self.find_window(id) else {
            return false;
        };
        let callback = lock(&window.on_close).clone();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Run every task queued with [`Toolkit::execute_later`] so far.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<Task> = {
            let rx = lock(&self.tasks_rx);
            rx.try_iter().collect()
        };
        let n = tasks.len();
        for task in tasks {
            task();
        }
        if n > 0 {
            tracing::trace!(tasks = n, "ran pending UI tasks");
        }
        n
    }

    /// Block until a task is queued or `timeout` passes, then run it.
    ///
    /// Returns `false` on timeout.
    pub fn wait_for_task(&self, timeout: Duration) -> bool {
        let task = {
            let rx = lock(&self.tasks_rx);
            rx.recv_timeout(timeout)
        };
        match task {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }

    /// Intervals of all timers that are still running.
    pub fn active_timers(&self) -> Vec<Duration> {
        lock(&self.registry)
            .timers
            .iter()
            .filter(|slot| slot.active.load(Ordering::SeqCst))
            .map(|slot| slot.interval)
            .collect()
    }

    /// Fire every running timer once, as if its interval had elapsed.
    ///
    /// Timers whose tick returns `false` are stopped. Returns the number of ticks delivered.
    pub fn fire_timers(&self) -> usize {
        let slots: Vec<Arc<TimerSlot>> = {
            let mut registry = lock(&self.registry);
            registry
                .timers
                .retain(|slot| slot.active.load(Ordering::SeqCst));
            registry.timers.clone()
        };

        let mut fired = 0;
        for slot in slots {
            // a tick may have stopped a later timer
            if !slot.active.load(Ordering::SeqCst) {
                continue;
            }
            let mut tick = lock(&slot.tick);
            let keep = (*tick)();
            fired += 1;
            if !keep {
                tracing::debug!(interval = ?slot.interval, "timer asked not to be rescheduled");
                slot.active.store(false, Ordering::SeqCst);
            }
        }
        fired
    }

    /// Whether anything called [`Toolkit::request_exit`].
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::SeqCst)
    }
}

impl Toolkit for MockToolkit {
    fn window(&self, id: &str, title: &str) -> Arc<dyn Window> {
        let window = Arc::new(MockWindow {
            id: id.to_string(),
            title: title.to_string(),
            on_close: Mutex::new(None),
        });
        lock(&self.registry)
            .windows
            .insert(id.to_string(), Arc::downgrade(&window));
        window
    }

    fn label(&self, id: &str, text: &str) -> Arc<dyn Label> {
        let label = Arc::new(MockLabel {
            id: id.to_string(),
            text: Mutex::new(text.to_string()),
        });
        lock(&self.registry)
            .labels
            .insert(id.to_string(), Arc::downgrade(&label));
        label
    }

    fn text_area(&self, id: &str, text: &str) -> Arc<dyn TextArea> {
        let area = Arc::new(MockTextArea {
            id: id.to_string(),
            text: Mutex::new(text.to_string()),
            on_click: Mutex::new(None),
        });
        lock(&self.registry)
            .text_areas
            .insert(id.to_string(), Arc::downgrade(&area));
        area
    }

    fn button(&self, id: &str, text: &str) -> Arc<dyn Button> {
        let button = Arc::new(MockButton {
            id: id.to_string(),
            text: Mutex::new(text.to_string()),
            callback: Mutex::new(None),
        });
        lock(&self.registry)
            .buttons
            .insert(id.to_string(), Arc::downgrade(&button));
        button
    }

    fn list(&self, id: &str) -> Arc<dyn List> {
        let list = Arc::new(MockList {
            id: id.to_string(),
            entries: Mutex::new(Vec::new()),
        });
        lock(&self.registry)
            .lists
            .insert(id.to_string(), Arc::downgrade(&list));
        list
    }

    fn keyboard(&self, id: &str, target: Arc<dyn TextArea>) -> Arc<dyn Keyboard> {
        let keyboard = Arc::new(MockKeyboard {
            id: id.to_string(),
            target: Mutex::new(target),
        });
        lock(&self.registry)
            .keyboards
            .insert(id.to_string(), Arc::downgrade(&keyboard));
        keyboard
    }

    fn execute_later(&self, task: Task) {
        if self.tasks_tx.send(task).is_err() {
            tracing::warn!("mock UI queue is gone, dropping task");
        }
    }

    fn start_timer(&self, interval: Duration, tick: TimerTick) -> Box<dyn Timer> {
        let slot = Arc::new(TimerSlot {
            interval,
            active: AtomicBool::new(true),
            tick: Mutex::new(tick),
        });
        lock(&self.registry).timers.push(Arc::clone(&slot));
        tracing::debug!(?interval, "mock timer started");
        Box::new(MockTimer { slot })
    }

    fn request_exit(&self) {
        tracing::debug!("app asked to exit");
        self.exit_requested.store(true, Ordering::SeqCst);
    }
}

struct TimerSlot {
    interval: Duration,
    active: AtomicBool,
    tick: Mutex<TimerTick>,
}

struct MockTimer {
    slot: Arc<TimerSlot>,
}

impl Timer for MockTimer {
    fn stop(&self) {
        self.slot.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for MockTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct MockWindow {
    id: String,
    title: String,
    on_close: Mutex<Option<SharedCallback>>,
}

impl MockWindow {
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Widget for MockWindow {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Window for MockWindow {
    fn set_on_close(&self, callback: Callback) {
        *lock(&self.on_close) = Some(Arc::from(callback));
    }
}

pub struct MockLabel {
    id: String,
    text: Mutex<String>,
}

impl MockLabel {
    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }
}

impl Widget for MockLabel {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Label for MockLabel {
    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }
}

pub struct MockTextArea {
    id: String,
    text: Mutex<String>,
    on_click: Mutex<Option<SharedCallback>>,
}

impl MockTextArea {
    fn click_handler(&self) -> Option<SharedCallback> {
        lock(&self.on_click).clone()
    }
}

impl Widget for MockTextArea {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TextArea for MockTextArea {
    fn text(&self) -> String {
        lock(&self.text).clone()
    }

    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }

    fn set_click_handler(&self, callback: Callback) {
        *lock(&self.on_click) = Some(Arc::from(callback));
    }
}

pub struct MockButton {
    id: String,
    text: Mutex<String>,
    callback: Mutex<Option<SharedCallback>>,
}

impl MockButton {
    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }

    fn callback(&self) -> Option<SharedCallback> {
        lock(&self.callback).clone()
    }
}

impl Widget for MockButton {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Button for MockButton {
    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }

    fn set_callback(&self, callback: Callback) {
        *lock(&self.callback) = Some(Arc::from(callback));
    }
}

pub struct MockList {
    id: String,
    entries: Mutex<Vec<String>>,
}

impl MockList {
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }
}

impl Widget for MockList {
    fn id(&self) -> &str {
        &self.id
    }
}

impl List for MockList {
    fn clear(&self) {
        lock(&self.entries).clear();
    }

    fn add(&self, entry: &str) {
        lock(&self.entries).push(entry.to_string());
    }
}

pub struct MockKeyboard {
    id: String,
    target: Mutex<Arc<dyn TextArea>>,
}

impl MockKeyboard {
    /// Id of the text area the keyboard currently types into.
    pub fn target_id(&self) -> String {
        lock(&self.target).id().to_string()
    }

    /// Append `text` to the current target, key by key.
    pub fn type_text(&self, text: &str) {
        let target = Arc::clone(&*lock(&self.target));
        let mut current = target.text();
        current.push_str(text);
        target.set_text(&current);
    }
}

impl Widget for MockKeyboard {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyboard for MockKeyboard {
    fn set_target(&self, target: Arc<dyn TextArea>) {
        *lock(&self.target) = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn widgets_disappear_once_dropped() {
        let toolkit = MockToolkit::new();
        let label = toolkit.label("status", "Ready");
        assert_eq!(toolkit.label_text("status").as_deref(), Some("Ready"));

        label.set_text("Busy");
        assert_eq!(toolkit.label_text("status").as_deref(), Some("Busy"));

        drop(label);
        assert_eq!(toolkit.label_text("status"), None);
    }

    #[test]
    fn click_runs_button_callback() {
        let toolkit = MockToolkit::new();
        let clicks = Arc::new(AtomicUsize::new(0));
        let button = toolkit.button("go", "Go");
        let counter = Arc::clone(&clicks);
        button.set_callback(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(toolkit.click("go"));
        assert!(toolkit.click("go"));
        assert!(!toolkit.click("missing"));
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn deferred_tasks_run_when_pumped() {
        let toolkit = MockToolkit::new();
        let list = toolkit.list("lines");
        let weak = Arc::downgrade(&list);
        toolkit.execute_later(Box::new(move || {
            if let Some(list) = weak.upgrade() {
                list.add("hello");
            }
        }));

        assert_eq!(toolkit.list_entries("lines"), Some(vec![]));
        assert_eq!(toolkit.run_pending(), 1);
        let entries = toolkit.list_entries("lines").unwrap();
        assert_eq!(entries, vec!["hello"]);
        assert_eq!(toolkit.run_pending(), 0);
        assert!(!toolkit.wait_for_task(Duration::from_millis(10)));
    }

    #[test]
    fn timers_stop_when_tick_declines() {
        let toolkit = MockToolkit::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let _timer = toolkit.start_timer(
            Duration::from_secs(60),
            Box::new(move || counter.fetch_add(1, Ordering::SeqCst) < 1),
        );

        assert_eq!(toolkit.active_timers(), vec![Duration::from_secs(60)]);
        assert_eq!(toolkit.fire_timers(), 1);
        assert_eq!(toolkit.fire_timers(), 1);
        assert_eq!(toolkit.active_timers(), vec![]);
        assert_eq!(toolkit.fire_timers(), 0);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_timer_handle_stops_it() {
        let toolkit = MockToolkit::new();
        let interval = Duration::from_millis(500);
        let timer = toolkit.start_timer(interval, Box::new(|| true));
        assert_eq!(toolkit.active_timers().len(), 1);
        drop(timer);
        assert_eq!(toolkit.active_timers().len(), 0);
    }

    #[test]
    fn keyboard_types_into_current_target() {
        let toolkit = MockToolkit::new();
        let first = toolkit.text_area("first", "");
        let second = toolkit.text_area("second", "abc");
        let keyboard = toolkit.keyboard("kbd", Arc::clone(&first));
        let mock = toolkit.find_keyboard("kbd").unwrap();

        mock.type_text("hi");
        assert_eq!(first.text(), "hi");

        keyboard.set_target(Arc::clone(&second));
        assert_eq!(mock.target_id(), "second");
        mock.type_text("def");
        assert_eq!(second.text(), "abcdef");
    }
}
