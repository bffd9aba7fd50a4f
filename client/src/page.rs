//! The page port: everything the viewer does to the document goes through
//! [`Page`].
//!
//! The browser implementation lives in `dom`; tests drive the viewer with a
//! recording fake. Implementations treat a missing element as a no-op.

use crate::notification::{Notification, NotificationId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPosition {
    Top,
    Bottom,
}

/// Timers owned by the viewer. At most one timer of each kind is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    SearchDebounce,
    AutoRefresh,
    DismissNotification(NotificationId),
}

impl TimerKind {
    /// Repeating timers fire every period until cancelled.
    pub fn repeats(self) -> bool {
        matches!(self, TimerKind::AutoRefresh)
    }
}

pub trait Page {
    fn set_auto_scroll_label(&mut self, label: &str);

    fn scroll_log(&mut self, to: ScrollPosition);

    /// Submit the filter form as-is.
    fn submit_filter_form(&mut self);

    /// Copy `value` into the filter form's search field and submit the form.
    /// Returns `false` when the form or its search field is missing.
    fn submit_search(&mut self, value: &str) -> bool;

    /// Current value of the standalone search box, if present.
    fn search_input_value(&self) -> Option<String>;

    /// Empty the search box and submit the form it belongs to.
    fn clear_search_input_and_submit(&mut self);

    fn reload(&mut self);

    fn show_refresh_indicator(&mut self);

    fn hide_refresh_indicator(&mut self);

    fn show_notification(&mut self, id: NotificationId, notification: &Notification);

    fn remove_notification(&mut self, id: NotificationId);

    /// Replace each log message's markup with `rewrite(plain_text)`.
    fn rewrite_log_messages(&mut self, rewrite: &mut dyn FnMut(&str) -> String);

    /// Start an asynchronous clipboard write. The outcome comes back as
    /// `PageEvent::ClipboardWritten`.
    fn write_clipboard(&mut self, text: &str);

    /// Arm `timer`, replacing any live timer of the same kind. Completion
    /// comes back as `PageEvent::TimerFired`.
    fn start_timer(&mut self, timer: TimerKind, delay_ms: u32);

    fn cancel_timer(&mut self, timer: TimerKind);
}
