//! Page controller for the log viewer.
//!
//! [`LogViewer`] owns all viewer state and is the only consumer of page
//! events. It never touches the document directly: every effect goes
//! through the [`Page`] it is handed, which keeps it host-independent.

use std::collections::BTreeSet;

use crate::config::{
    COPY_FAILED_MESSAGE, COPY_SUCCEEDED_MESSAGE, DISABLE_AUTO_SCROLL_LABEL,
    ENABLE_AUTO_SCROLL_LABEL, ViewerOptions, auto_refresh_requested,
};
use crate::error::ViewerError;
use crate::highlight::Highlighter;
use crate::input::{KeyPress, Shortcut};
use crate::notification::{Notification, NotificationId, NotificationKind};
use crate::page::{Page, ScrollPosition, TimerKind};

/// Everything the page can tell the viewer.
#[derive(Debug)]
pub enum PageEvent {
    /// Click on `#auto-scroll-btn`.
    AutoScrollClicked,
    /// Click on `#scroll-bottom-btn`.
    ScrollBottomClicked,
    /// A `<select>` inside the filter form changed.
    FilterChanged,
    /// Keystroke in the search box, carrying its current value.
    SearchInput(String),
    Key(KeyPress),
    TimerFired(TimerKind),
    ClipboardWritten(Result<(), ViewerError>),
}

/// What the host should do with the originating DOM event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    PreventDefault,
}

pub struct LogViewer {
    options: ViewerOptions,
    auto_scroll: bool,
    /// Requested by the query string at mount time.
    auto_refresh: bool,
    refreshing: bool,
    pending_search: Option<String>,
    next_notification: u64,
    notifications: BTreeSet<NotificationId>,
}

impl LogViewer {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            options,
            auto_scroll: false,
            auto_refresh: false,
            refreshing: false,
            pending_search: None,
            next_notification: 0,
            notifications: BTreeSet::new(),
        }
    }

    /// Read the initial state from the page URL's query string and start
    /// auto-refresh when it was requested.
    pub fn mount(&mut self, page: &mut impl Page, query: &str) {
        self.auto_refresh = auto_refresh_requested(query);
        log::info!("Log viewer mounted (auto refresh: {})", self.auto_refresh);
        if self.auto_refresh {
            self.start_auto_refresh(page);
        }
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn auto_refresh_requested(&self) -> bool {
        self.auto_refresh
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn handle_event(&mut self, event: PageEvent, page: &mut impl Page) -> Propagation {
        match event {
            PageEvent::AutoScrollClicked => self.toggle_auto_scroll(page),
            PageEvent::ScrollBottomClicked => self.scroll_to_bottom(page),
            PageEvent::FilterChanged => {
                log::debug!("Filter changed, submitting form");
                page.submit_filter_form();
            }
            PageEvent::SearchInput(value) => {
                self.pending_search = Some(value);
                page.start_timer(TimerKind::SearchDebounce, self.options.search_debounce_ms);
            }
            PageEvent::Key(press) => return self.handle_key(&press, page),
            PageEvent::TimerFired(timer) => self.handle_timer(timer, page),
            PageEvent::ClipboardWritten(result) => self.handle_clipboard_result(result, page),
        }
        Propagation::Continue
    }

    fn handle_key(&mut self, press: &KeyPress, page: &mut impl Page) -> Propagation {
        let Some(shortcut) = Shortcut::from_key(press) else {
            return Propagation::Continue;
        };
        log::debug!("Shortcut {:?}", shortcut);

        match shortcut {
            Shortcut::Reload => page.reload(),
            Shortcut::ScrollToBottom => self.scroll_to_bottom(page),
            Shortcut::ScrollToTop => self.scroll_to_top(page),
            Shortcut::ClearSearch => self.clear_search(page),
        }

        if shortcut.prevents_default() {
            Propagation::PreventDefault
        } else {
            Propagation::Continue
        }
    }

    fn handle_timer(&mut self, timer: TimerKind, page: &mut impl Page) {
        match timer {
            TimerKind::SearchDebounce => {
                if let Some(term) = self.pending_search.take() {
                    self.perform_search(page, &term);
                }
            }
            TimerKind::AutoRefresh => {
                if self.refreshing {
                    page.reload();
                }
            }
            TimerKind::DismissNotification(id) => {
                if self.notifications.remove(&id) {
                    page.remove_notification(id);
                }
            }
        }
    }

    fn handle_clipboard_result(&mut self, result: Result<(), ViewerError>, page: &mut impl Page) {
        match result {
            Ok(()) => {
                self.show_notification(page, COPY_SUCCEEDED_MESSAGE, NotificationKind::Success);
            }
            Err(e) => {
                log::warn!("Clipboard write failed: {}", e);
                self.show_notification(page, COPY_FAILED_MESSAGE, NotificationKind::Error);
            }
        }
    }

    pub fn toggle_auto_scroll(&mut self, page: &mut impl Page) {
        self.auto_scroll = !self.auto_scroll;
        let label = if self.auto_scroll {
            DISABLE_AUTO_SCROLL_LABEL
        } else {
            ENABLE_AUTO_SCROLL_LABEL
        };
        page.set_auto_scroll_label(label);
    }

    pub fn scroll_to_bottom(&mut self, page: &mut impl Page) {
        page.scroll_log(ScrollPosition::Bottom);
    }

    pub fn scroll_to_top(&mut self, page: &mut impl Page) {
        page.scroll_log(ScrollPosition::Top);
    }

    /// Submit `term` through the filter form.
    pub fn perform_search(&mut self, page: &mut impl Page, term: &str) {
        if page.submit_search(term) {
            log::info!("Searching for {:?}", term);
        } else {
            log::debug!("Filter form has no search field; search skipped");
        }
    }

    fn clear_search(&mut self, page: &mut impl Page) {
        if page.search_input_value().is_some_and(|v| !v.is_empty()) {
            // The cleared box must not be resubmitted by a stale debounce.
            self.cancel_pending_search(page);
            page.clear_search_input_and_submit();
        }
    }

    fn cancel_pending_search(&mut self, page: &mut impl Page) {
        if self.pending_search.take().is_some() {
            page.cancel_timer(TimerKind::SearchDebounce);
        }
    }

    pub fn start_auto_refresh(&mut self, page: &mut impl Page) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        page.start_timer(TimerKind::AutoRefresh, self.options.auto_refresh_interval_ms);
        page.show_refresh_indicator();
        log::info!(
            "Auto refresh every {} ms",
            self.options.auto_refresh_interval_ms
        );
    }

    pub fn stop_auto_refresh(&mut self, page: &mut impl Page) {
        if self.refreshing {
            page.cancel_timer(TimerKind::AutoRefresh);
            self.refreshing = false;
            log::info!("Auto refresh stopped");
        }
        page.hide_refresh_indicator();
    }

    /// Wrap case-insensitive occurrences of `term` in every log message.
    pub fn highlight_search_terms(&mut self, page: &mut impl Page, term: &str) {
        let Some(highlighter) = Highlighter::new(term) else {
            return;
        };
        page.rewrite_log_messages(&mut |text: &str| highlighter.markup(text));
    }

    pub fn copy_to_clipboard(&mut self, page: &mut impl Page, text: &str) {
        page.write_clipboard(text);
    }

    /// Show a popup that removes itself after the notification timeout.
    pub fn show_notification(
        &mut self,
        page: &mut impl Page,
        message: &str,
        kind: NotificationKind,
    ) -> NotificationId {
        let id = NotificationId(self.next_notification);
        self.next_notification += 1;
        self.notifications.insert(id);
        page.show_notification(id, &Notification::new(message, kind));
        page.start_timer(
            TimerKind::DismissNotification(id),
            self.options.notification_timeout_ms,
        );
        id
    }

    /// Cancel every timer and remove everything the viewer added to the page.
    pub fn teardown(&mut self, page: &mut impl Page) {
        self.cancel_pending_search(page);
        if self.refreshing {
            self.stop_auto_refresh(page);
        }
        for id in std::mem::take(&mut self.notifications) {
            page.cancel_timer(TimerKind::DismissNotification(id));
            page.remove_notification(id);
        }
        log::info!("Log viewer torn down");
    }
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Action {
        Label(String),
        Scroll(ScrollPosition),
        SubmitFilter,
        SubmitSearch(String),
        ClearSearch,
        Reload,
        ShowIndicator,
        HideIndicator,
        ShowNotification(NotificationId, Notification),
        RemoveNotification(NotificationId),
        WriteClipboard(String),
    }

    /// Records page effects and keeps timers on a virtual clock.
    struct FakePage {
        actions: Vec<Action>,
        has_search_field: bool,
        search_value: Option<String>,
        messages: Vec<String>,
        indicator: bool,
        notifications: Vec<NotificationId>,
        scroll_top: u32,
        scroll_height: u32,
        timers: HashMap<TimerKind, (u64, u32)>,
        now: u64,
    }

    impl FakePage {
        fn new() -> Self {
            Self {
                actions: Vec::new(),
                has_search_field: true,
                search_value: Some(String::new()),
                messages: Vec::new(),
                indicator: false,
                notifications: Vec::new(),
                scroll_top: 120,
                scroll_height: 4000,
                timers: HashMap::new(),
                now: 0,
            }
        }

        fn count(&self, action: &Action) -> usize {
            self.actions.iter().filter(|a| *a == action).count()
        }

        fn searches(&self) -> Vec<String> {
            self.actions
                .iter()
                .filter_map(|a| match a {
                    Action::SubmitSearch(v) => Some(v.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Page for FakePage {
        fn set_auto_scroll_label(&mut self, label: &str) {
            self.actions.push(Action::Label(label.to_string()));
        }

        fn scroll_log(&mut self, to: ScrollPosition) {
            self.scroll_top = match to {
                ScrollPosition::Top => 0,
                ScrollPosition::Bottom => self.scroll_height,
            };
            self.actions.push(Action::Scroll(to));
        }

        fn submit_filter_form(&mut self) {
            self.actions.push(Action::SubmitFilter);
        }

        fn submit_search(&mut self, value: &str) -> bool {
            if !self.has_search_field {
                return false;
            }
            self.actions.push(Action::SubmitSearch(value.to_string()));
            true
        }

        fn search_input_value(&self) -> Option<String> {
            self.search_value.clone()
        }

        fn clear_search_input_and_submit(&mut self) {
            self.search_value = Some(String::new());
            self.actions.push(Action::ClearSearch);
        }

        fn reload(&mut self) {
            self.actions.push(Action::Reload);
        }

        fn show_refresh_indicator(&mut self) {
            self.indicator = true;
            self.actions.push(Action::ShowIndicator);
        }

        fn hide_refresh_indicator(&mut self) {
            self.indicator = false;
            self.actions.push(Action::HideIndicator);
        }

        fn show_notification(&mut self, id: NotificationId, notification: &Notification) {
            self.notifications.push(id);
            self.actions
                .push(Action::ShowNotification(id, notification.clone()));
        }

        fn remove_notification(&mut self, id: NotificationId) {
            self.notifications.retain(|n| *n != id);
            self.actions.push(Action::RemoveNotification(id));
        }

        fn rewrite_log_messages(&mut self, rewrite: &mut dyn FnMut(&str) -> String) {
            for message in &mut self.messages {
                *message = rewrite(message);
            }
        }

        fn write_clipboard(&mut self, text: &str) {
            self.actions.push(Action::WriteClipboard(text.to_string()));
        }

        fn start_timer(&mut self, timer: TimerKind, delay_ms: u32) {
            self.timers
                .insert(timer, (self.now + u64::from(delay_ms), delay_ms));
        }

        fn cancel_timer(&mut self, timer: TimerKind) {
            self.timers.remove(&timer);
        }
    }

    struct Harness {
        viewer: LogViewer,
        page: FakePage,
    }

    impl Harness {
        fn mounted(query: &str) -> Self {
            let mut harness = Self {
                viewer: LogViewer::default(),
                page: FakePage::new(),
            };
            harness.viewer.mount(&mut harness.page, query);
            harness
        }

        fn send(&mut self, event: PageEvent) -> Propagation {
            self.viewer.handle_event(event, &mut self.page)
        }

        fn key(&mut self, press: KeyPress) -> Propagation {
            self.send(PageEvent::Key(press))
        }

        /// Run the virtual clock forward, firing due timers in order.
        fn advance(&mut self, ms: u64) {
            let until = self.page.now + ms;
            loop {
                let next = self
                    .page
                    .timers
                    .iter()
                    .filter(|(_, (due, _))| *due <= until)
                    .min_by_key(|(_, (due, _))| *due)
                    .map(|(kind, (due, period))| (*kind, *due, *period));
                let Some((kind, due, period)) = next else {
                    break;
                };
                self.page.now = due;
                if kind.repeats() {
                    self.page
                        .timers
                        .insert(kind, (due + u64::from(period), period));
                } else {
                    self.page.timers.remove(&kind);
                }
                self.send(PageEvent::TimerFired(kind));
            }
            self.page.now = until;
        }

        /// Type `text` one character at a time, `gap_ms` apart.
        fn type_text(&mut self, text: &str, gap_ms: u64) {
            let mut value = self.page.search_value.clone().unwrap_or_default();
            for c in text.chars() {
                value.push(c);
                self.page.search_value = Some(value.clone());
                self.send(PageEvent::SearchInput(value.clone()));
                self.advance(gap_ms);
            }
        }
    }

    #[test]
    fn toggling_auto_scroll_twice_restores_label() {
        let mut h = Harness::mounted("");
        h.send(PageEvent::AutoScrollClicked);
        assert!(h.viewer.auto_scroll());
        h.send(PageEvent::AutoScrollClicked);
        assert!(!h.viewer.auto_scroll());
        assert_eq!(
            h.page.actions,
            vec![
                Action::Label("Disable Auto Scroll".to_string()),
                Action::Label("Enable Auto Scroll".to_string()),
            ]
        );
    }

    #[test]
    fn search_submits_once_after_pause() {
        let mut h = Harness::mounted("");
        h.type_text("disk", 100);
        assert!(h.page.searches().is_empty());
        h.advance(400);
        assert_eq!(h.page.searches(), vec!["disk".to_string()]);
        h.advance(5000);
        assert_eq!(h.page.searches().len(), 1);
    }

    #[test]
    fn continuous_typing_defers_submission() {
        let mut h = Harness::mounted("");
        // A keystroke every 100 ms for two seconds.
        h.type_text("abcdefghijklmnopqrst", 100);
        assert_eq!(h.page.now, 2000);
        assert!(h.page.searches().is_empty());
        h.advance(500);
        assert_eq!(h.page.searches(), vec!["abcdefghijklmnopqrst".to_string()]);
    }

    #[test]
    fn debounce_fires_exactly_at_timeout() {
        let mut h = Harness::mounted("");
        h.send(PageEvent::SearchInput("x".to_string()));
        h.advance(499);
        assert!(h.page.searches().is_empty());
        h.advance(1);
        assert_eq!(h.page.searches(), vec!["x".to_string()]);
    }

    #[test]
    fn search_without_form_field_submits_nothing() {
        let mut h = Harness::mounted("");
        h.page.has_search_field = false;
        h.type_text("oops", 10);
        h.advance(1000);
        assert!(h.page.searches().is_empty());
    }

    #[test]
    fn filter_change_submits_immediately() {
        let mut h = Harness::mounted("");
        h.send(PageEvent::FilterChanged);
        h.send(PageEvent::FilterChanged);
        assert_eq!(h.page.count(&Action::SubmitFilter), 2);
    }

    #[test]
    fn end_and_home_scroll_the_log() {
        let mut h = Harness::mounted("");
        assert_eq!(
            h.key(KeyPress::new("End")),
            Propagation::PreventDefault
        );
        assert_eq!(h.page.scroll_top, h.page.scroll_height);
        assert_eq!(
            h.key(KeyPress::new("Home")),
            Propagation::PreventDefault
        );
        assert_eq!(h.page.scroll_top, 0);

        h.send(PageEvent::ScrollBottomClicked);
        assert_eq!(h.page.scroll_top, h.page.scroll_height);
    }

    #[test]
    fn ctrl_or_cmd_r_reloads() {
        let mut h = Harness::mounted("");
        assert_eq!(
            h.key(KeyPress::new("r").with_ctrl()),
            Propagation::PreventDefault
        );
        assert_eq!(
            h.key(KeyPress::new("r").with_meta()),
            Propagation::PreventDefault
        );
        assert_eq!(h.key(KeyPress::new("r")), Propagation::Continue);
        assert_eq!(h.page.count(&Action::Reload), 2);
    }

    #[test]
    fn escape_clears_non_empty_search() {
        let mut h = Harness::mounted("");
        assert_eq!(h.key(KeyPress::new("Escape")), Propagation::Continue);
        assert_eq!(h.page.count(&Action::ClearSearch), 0);

        h.page.search_value = Some("timeout".to_string());
        h.key(KeyPress::new("Escape"));
        assert_eq!(h.page.count(&Action::ClearSearch), 1);
        assert_eq!(h.page.search_value.as_deref(), Some(""));
    }

    #[test]
    fn escape_cancels_pending_search() {
        let mut h = Harness::mounted("");
        h.type_text("abc", 50);
        h.key(KeyPress::new("Escape"));
        h.advance(2000);
        assert_eq!(h.page.count(&Action::ClearSearch), 1);
        assert!(h.page.searches().is_empty());
    }

    #[test]
    fn escape_without_search_box_is_ignored() {
        let mut h = Harness::mounted("");
        h.page.search_value = None;
        h.key(KeyPress::new("Escape"));
        assert!(h.page.actions.is_empty());
    }

    #[test]
    fn auto_refresh_from_query_reloads_until_stopped() {
        let mut h = Harness::mounted("?level=ERROR&auto_refresh=true");
        assert!(h.viewer.auto_refresh_requested());
        assert!(h.page.indicator);

        h.advance(4999);
        assert_eq!(h.page.count(&Action::Reload), 0);
        h.advance(1);
        assert_eq!(h.page.count(&Action::Reload), 1);
        h.advance(5000);
        assert_eq!(h.page.count(&Action::Reload), 2);

        h.viewer.stop_auto_refresh(&mut h.page);
        assert!(!h.page.indicator);
        assert!(!h.viewer.is_refreshing());
        h.advance(20_000);
        assert_eq!(h.page.count(&Action::Reload), 2);
    }

    #[test]
    fn no_auto_refresh_without_flag() {
        let mut h = Harness::mounted("?auto_refresh=false");
        h.advance(30_000);
        assert!(!h.page.indicator);
        assert_eq!(h.page.count(&Action::Reload), 0);
    }

    #[test]
    fn starting_auto_refresh_twice_keeps_one_timer() {
        let mut h = Harness::mounted("");
        h.viewer.start_auto_refresh(&mut h.page);
        h.viewer.start_auto_refresh(&mut h.page);
        assert_eq!(h.page.count(&Action::ShowIndicator), 1);
        h.advance(5000);
        assert_eq!(h.page.count(&Action::Reload), 1);
    }

    #[test]
    fn rejected_clipboard_write_shows_error_for_three_seconds() {
        let mut h = Harness::mounted("");
        h.viewer.copy_to_clipboard(&mut h.page, "line 42");
        assert_eq!(
            h.page.actions,
            vec![Action::WriteClipboard("line 42".to_string())]
        );

        h.send(PageEvent::ClipboardWritten(Err(
            ViewerError::ClipboardUnavailable,
        )));
        let id = NotificationId(0);
        assert!(h.page.actions.contains(&Action::ShowNotification(
            id,
            Notification::new("Failed to copy to clipboard", NotificationKind::Error),
        )));
        assert_eq!(h.page.notifications, vec![id]);

        h.advance(2999);
        assert_eq!(h.page.notifications, vec![id]);
        h.advance(1);
        assert!(h.page.notifications.is_empty());
        assert_eq!(h.page.count(&Action::RemoveNotification(id)), 1);
    }

    #[test]
    fn successful_clipboard_write_shows_success() {
        let mut h = Harness::mounted("");
        h.send(PageEvent::ClipboardWritten(Ok(())));
        assert!(h.page.actions.contains(&Action::ShowNotification(
            NotificationId(0),
            Notification::new("Copied to clipboard!", NotificationKind::Success),
        )));
    }

    #[test]
    fn notifications_expire_independently() {
        let mut h = Harness::mounted("");
        let first = h
            .viewer
            .show_notification(&mut h.page, "one", NotificationKind::Info);
        h.advance(1000);
        let second = h
            .viewer
            .show_notification(&mut h.page, "two", NotificationKind::Info);
        assert_ne!(first, second);
        h.advance(2000);
        assert_eq!(h.page.notifications, vec![second]);
        h.advance(1000);
        assert!(h.page.notifications.is_empty());
    }

    #[test]
    fn highlight_rewrites_every_message() {
        let mut h = Harness::mounted("");
        h.page.messages = vec!["Disk full".to_string(), "all good".to_string()];
        h.viewer.highlight_search_terms(&mut h.page, "DISK");
        assert_eq!(
            h.page.messages,
            vec![
                r#"<span class="search-highlight">Disk</span> full"#.to_string(),
                "all good".to_string(),
            ]
        );

        h.viewer.highlight_search_terms(&mut h.page, "");
        assert_eq!(h.page.messages[1], "all good");
    }

    #[test]
    fn teardown_cancels_timers_and_cleans_page() {
        let mut h = Harness::mounted("?auto_refresh=true");
        h.viewer
            .show_notification(&mut h.page, "hello", NotificationKind::Info);
        h.type_text("q", 10);

        h.viewer.teardown(&mut h.page);
        assert!(h.page.timers.is_empty());
        assert!(!h.page.indicator);
        assert!(h.page.notifications.is_empty());

        h.advance(60_000);
        assert_eq!(h.page.count(&Action::Reload), 0);
        assert!(h.page.searches().is_empty());
    }
}
