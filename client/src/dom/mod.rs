//! Browser shell for the log viewer.
//!
//! This module adapts the host-independent [`LogViewer`] to a real page:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  LogViewerApp (app.rs)                  │
//! │  - wasm-bindgen handle kept by the page │
//! └───────────────────┬─────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────┐
//! │  Dispatcher<WebPage> (dispatch.rs)      │
//! │  - Single owner of viewer + page        │
//! │  - Queues re-entrant events             │
//! └───────────────────┬─────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────┐
//! │  WebPage                                │
//! │  - web-sys implementation of `Page`     │
//! │  - Timers (timers.rs), clipboard        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! DOM listeners (listeners.rs) hold only weak references to the
//! dispatcher, so dropping the app handle releases everything.

mod app;
mod listeners;
mod timers;

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement, KeyboardEvent, Window};

use crate::config::{
    AUTO_SCROLL_BUTTON_ID, FILTER_FORM_ID, FORM_SEARCH_FIELD_SELECTOR, LOG_CONTAINER_SELECTOR,
    LOG_MESSAGE_SELECTOR, REFRESH_INDICATOR_CLASS, REFRESH_INDICATOR_ID,
    REFRESH_INDICATOR_MARKUP, REFRESH_INDICATOR_STYLE, SCROLL_BOTTOM_BUTTON_ID, SEARCH_INPUT_ID,
    ViewerOptions,
};
use crate::dispatch::Dispatcher;
use crate::error::ViewerError;
use crate::input::KeyPress;
use crate::notification::{Notification, NotificationId};
use crate::page::{Page, ScrollPosition, TimerKind};
use crate::viewer::{LogViewer, PageEvent, Propagation};

pub use app::{LogViewerApp, format_file_size_js, format_timestamp_js, start};

use listeners::Listeners;
use timers::Timers;

pub(crate) type WebDispatcher = Dispatcher<WebPage>;

fn new_dispatcher(window: Window, document: Document, options: ViewerOptions) -> Rc<WebDispatcher> {
    Dispatcher::new_cyclic(LogViewer::new(options), |weak| {
        WebPage::new(window, document, weak)
    })
}

fn dispatch(dispatcher: &Weak<WebDispatcher>, event: PageEvent) -> Propagation {
    match dispatcher.upgrade() {
        Some(dispatcher) => dispatcher.dispatch(event),
        None => Propagation::Continue,
    }
}

/// Attach the viewer's listeners to the elements the template provides.
/// Absent elements are skipped.
fn bind(
    dispatcher: &Rc<WebDispatcher>,
    document: &Document,
    listeners: &mut Listeners,
) -> Result<(), ViewerError> {
    if let Some(button) = document.get_element_by_id(AUTO_SCROLL_BUTTON_ID) {
        let weak = Rc::downgrade(dispatcher);
        listeners.add(&button, "click", move |_| {
            dispatch(&weak, PageEvent::AutoScrollClicked);
        })?;
    }

    if let Some(button) = document.get_element_by_id(SCROLL_BOTTOM_BUTTON_ID) {
        let weak = Rc::downgrade(dispatcher);
        listeners.add(&button, "click", move |_| {
            dispatch(&weak, PageEvent::ScrollBottomClicked);
        })?;
    }

    if let Some(form) = document.get_element_by_id(FILTER_FORM_ID) {
        let selects = form.query_selector_all("select")?;
        for i in 0..selects.length() {
            let Some(select) = selects.get(i) else {
                continue;
            };
            let weak = Rc::downgrade(dispatcher);
            listeners.add(&select, "change", move |_| {
                dispatch(&weak, PageEvent::FilterChanged);
            })?;
        }
    }

    if let Some(input) = document.get_element_by_id(SEARCH_INPUT_ID) {
        let weak = Rc::downgrade(dispatcher);
        listeners.add(&input, "input", move |event: Event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            dispatch(&weak, PageEvent::SearchInput(value));
        })?;
    }

    let weak = Rc::downgrade(dispatcher);
    listeners.add(document, "keydown", move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let press = KeyPress {
            key: key.key(),
            ctrl: key.ctrl_key(),
            meta: key.meta_key(),
        };
        if dispatch(&weak, PageEvent::Key(press)) == Propagation::PreventDefault {
            event.prevent_default();
        }
    })?;

    log::debug!("Bound {} listeners", listeners.len());
    Ok(())
}

/// `Page` backed by the live document.
pub(crate) struct WebPage {
    window: Window,
    document: Document,
    dispatcher: Weak<WebDispatcher>,
    timers: Timers,
    notifications: HashMap<NotificationId, Element>,
}

impl WebPage {
    fn new(window: Window, document: Document, dispatcher: Weak<WebDispatcher>) -> Self {
        Self {
            window,
            document,
            dispatcher,
            timers: Timers::default(),
            notifications: HashMap::new(),
        }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn filter_form(&self) -> Option<HtmlFormElement> {
        self.document
            .get_element_by_id(FILTER_FORM_ID)?
            .dyn_into()
            .ok()
    }

    fn search_input(&self) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(SEARCH_INPUT_ID)?
            .dyn_into()
            .ok()
    }

    fn append_to_body(&self, element: &Element) {
        if let Some(body) = self.document.body()
            && let Err(e) = body.append_child(element)
        {
            log::error!("Failed to append element: {:?}", e);
        }
    }

    fn cancel_all_timers(&mut self) {
        self.timers.cancel_all();
    }
}

fn submit(form: &HtmlFormElement) {
    if let Err(e) = form.submit() {
        log::error!("Form submit failed: {:?}", e);
    }
}

impl Page for WebPage {
    fn set_auto_scroll_label(&mut self, label: &str) {
        if let Some(button) = self.document.get_element_by_id(AUTO_SCROLL_BUTTON_ID) {
            button.set_text_content(Some(label));
        }
    }

    fn scroll_log(&mut self, to: ScrollPosition) {
        if let Some(container) = self.query(LOG_CONTAINER_SELECTOR) {
            let top = match to {
                ScrollPosition::Top => 0,
                ScrollPosition::Bottom => container.scroll_height(),
            };
            container.set_scroll_top(top);
        }
    }

    fn submit_filter_form(&mut self) {
        if let Some(form) = self.filter_form() {
            submit(&form);
        }
    }

    fn submit_search(&mut self, value: &str) -> bool {
        let Some(form) = self.filter_form() else {
            return false;
        };
        let Some(field) = form
            .query_selector(FORM_SEARCH_FIELD_SELECTOR)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        else {
            return false;
        };
        field.set_value(value);
        submit(&form);
        true
    }

    fn search_input_value(&self) -> Option<String> {
        self.search_input().map(|input| input.value())
    }

    fn clear_search_input_and_submit(&mut self) {
        if let Some(input) = self.search_input() {
            input.set_value("");
            if let Some(form) = input.form() {
                submit(&form);
            }
        }
    }

    fn reload(&mut self) {
        if let Err(e) = self.window.location().reload() {
            log::error!("Reload failed: {:?}", e);
        }
    }

    fn show_refresh_indicator(&mut self) {
        let Ok(indicator) = self.document.create_element("div") else {
            return;
        };
        indicator.set_id(REFRESH_INDICATOR_ID);
        indicator.set_class_name(REFRESH_INDICATOR_CLASS);
        indicator.set_inner_html(REFRESH_INDICATOR_MARKUP);
        let _ = indicator.set_attribute("style", REFRESH_INDICATOR_STYLE);
        self.append_to_body(&indicator);
    }

    fn hide_refresh_indicator(&mut self) {
        if let Some(indicator) = self.document.get_element_by_id(REFRESH_INDICATOR_ID) {
            indicator.remove();
        }
    }

    fn show_notification(&mut self, id: NotificationId, notification: &Notification) {
        let Ok(popup) = self.document.create_element("div") else {
            return;
        };
        popup.set_class_name(&notification.class_name());
        popup.set_text_content(Some(&notification.message));
        let _ = popup.set_attribute("style", &notification.css_text());
        self.append_to_body(&popup);
        self.notifications.insert(id, popup);
    }

    fn remove_notification(&mut self, id: NotificationId) {
        if let Some(popup) = self.notifications.remove(&id) {
            popup.remove();
        }
    }

    fn rewrite_log_messages(&mut self, rewrite: &mut dyn FnMut(&str) -> String) {
        let Ok(messages) = self.document.query_selector_all(LOG_MESSAGE_SELECTOR) else {
            return;
        };
        for i in 0..messages.length() {
            let Some(message) = messages.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let text = message.text_content().unwrap_or_default();
            message.set_inner_html(&rewrite(&text));
        }
    }

    fn write_clipboard(&mut self, text: &str) {
        let navigator = self.window.navigator();
        let available = js_sys::Reflect::get(&navigator, &"clipboard".into())
            .map(|clipboard| !clipboard.is_undefined())
            .unwrap_or(false);
        let dispatcher = self.dispatcher.clone();
        let text = text.to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let result = if available {
                JsFuture::from(navigator.clipboard().write_text(&text))
                    .await
                    .map(|_| ())
                    .map_err(ViewerError::from)
            } else {
                Err(ViewerError::ClipboardUnavailable)
            };
            dispatch(&dispatcher, PageEvent::ClipboardWritten(result));
        });
    }

    fn start_timer(&mut self, timer: TimerKind, delay_ms: u32) {
        self.timers.start(timer, delay_ms, self.dispatcher.clone());
    }

    fn cancel_timer(&mut self, timer: TimerKind) {
        self.timers.cancel(timer);
    }
}
