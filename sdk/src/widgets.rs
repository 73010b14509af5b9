//! Widget handles handed out by a [`Toolkit`](crate::Toolkit).

use crate::Callback;
use std::sync::Arc;

/// Behavior shared by all widgets.
pub trait Widget: Send + Sync {
    /// The id the widget was created with.
    fn id(&self) -> &str;
}

/// A top-level window.
pub trait Window: Widget {
    /// Called when the user closes the window.
    fn set_on_close(&self, callback: Callback);
}

/// Read-only text.
pub trait Label: Widget {
    fn set_text(&self, text: &str);
}

/// Single-line editable text.
pub trait TextArea: Widget {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    /// Called when the user presses on the field.
    fn set_click_handler(&self, callback: Callback);
}

pub trait Button: Widget {
    fn set_text(&self, text: &str);
    fn set_callback(&self, callback: Callback);
}

/// A vertical list of text lines.
pub trait List: Widget {
    fn clear(&self);
    fn add(&self, entry: &str);
}

/// The on-screen keyboard, typing into one text area at a time.
pub trait Keyboard: Widget {
    fn set_target(&self, target: Arc<dyn TextArea>);
}
