//! `wasm-bindgen` exports.
//!
//! The page creates one [`LogViewerApp`] at startup and keeps the handle;
//! nothing is stored on `window` by this crate.
//!
//! ```js
//! import init, { LogViewerApp } from "./log_viewer_client.js";
//! await init();
//! const viewer = LogViewerApp.mount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::listeners::Listeners;
use super::{WebDispatcher, bind, new_dispatcher};
use crate::config::ViewerOptions;
use crate::error::ViewerError;
use crate::format::{format_file_size, format_timestamp, locale_from_tag};
use crate::notification::NotificationKind;

#[wasm_bindgen(start)]
pub fn start() {
    std::panic::set_hook(Box::new(|info| {
        web_sys::console::error_1(&info.to_string().into())
    }));
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
    }
}

/// Handle to a mounted log viewer.
#[wasm_bindgen]
pub struct LogViewerApp {
    dispatcher: Rc<WebDispatcher>,
    listeners: Rc<RefCell<Listeners>>,
}

#[wasm_bindgen]
impl LogViewerApp {
    /// Mount with default timings. Wiring is deferred to
    /// `DOMContentLoaded` when the document is still loading.
    pub fn mount() -> Result<LogViewerApp, JsValue> {
        Ok(Self::mount_with(ViewerOptions::default())?)
    }

    /// Mount with timings overridden by a JSON object, e.g.
    /// `{"search_debounce_ms": 300}`.
    #[wasm_bindgen(js_name = mountWithOptions)]
    pub fn mount_with_options(options: &str) -> Result<LogViewerApp, JsValue> {
        let options = ViewerOptions::from_json(options)?;
        Ok(Self::mount_with(options)?)
    }

    #[wasm_bindgen(js_name = toggleAutoScroll)]
    pub fn toggle_auto_scroll(&self) {
        self.dispatcher
            .with(|viewer, page| viewer.toggle_auto_scroll(page));
    }

    #[wasm_bindgen(js_name = isAutoScroll)]
    pub fn is_auto_scroll(&self) -> bool {
        self.dispatcher
            .with(|viewer, _| viewer.auto_scroll())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = scrollToBottom)]
    pub fn scroll_to_bottom(&self) {
        self.dispatcher
            .with(|viewer, page| viewer.scroll_to_bottom(page));
    }

    #[wasm_bindgen(js_name = scrollToTop)]
    pub fn scroll_to_top(&self) {
        self.dispatcher
            .with(|viewer, page| viewer.scroll_to_top(page));
    }

    #[wasm_bindgen(js_name = performSearch)]
    pub fn perform_search(&self, term: &str) {
        self.dispatcher
            .with(|viewer, page| viewer.perform_search(page, term));
    }

    #[wasm_bindgen(js_name = startAutoRefresh)]
    pub fn start_auto_refresh(&self) {
        self.dispatcher
            .with(|viewer, page| viewer.start_auto_refresh(page));
    }

    #[wasm_bindgen(js_name = stopAutoRefresh)]
    pub fn stop_auto_refresh(&self) {
        self.dispatcher
            .with(|viewer, page| viewer.stop_auto_refresh(page));
    }

    #[wasm_bindgen(js_name = isAutoRefreshing)]
    pub fn is_auto_refreshing(&self) -> bool {
        self.dispatcher
            .with(|viewer, _| viewer.is_refreshing())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = highlightSearchTerms)]
    pub fn highlight_search_terms(&self, term: &str) {
        self.dispatcher
            .with(|viewer, page| viewer.highlight_search_terms(page, term));
    }

    #[wasm_bindgen(js_name = copyToClipboard)]
    pub fn copy_to_clipboard(&self, text: &str) {
        self.dispatcher
            .with(|viewer, page| viewer.copy_to_clipboard(page, text));
    }

    /// `kind` is `"info"` (default), `"success"` or `"error"`.
    #[wasm_bindgen(js_name = showNotification)]
    pub fn show_notification(&self, message: &str, kind: Option<String>) {
        let kind = kind
            .as_deref()
            .map(NotificationKind::from_name)
            .unwrap_or_default();
        self.dispatcher
            .with(|viewer, page| viewer.show_notification(page, message, kind));
    }

    /// Unregister every listener, cancel timers and remove the elements the
    /// viewer added. Later calls on this handle do nothing.
    pub fn destroy(&self) {
        self.listeners.borrow_mut().clear();
        self.dispatcher.with(|viewer, page| {
            viewer.teardown(page);
            page.cancel_all_timers();
        });
        self.dispatcher.close();
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> bool {
        self.dispatcher.is_closed()
    }
}

impl LogViewerApp {
    fn mount_with(options: ViewerOptions) -> Result<Self, ViewerError> {
        let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
        let document = window.document().ok_or(ViewerError::NoDocument)?;
        let query = window.location().search()?;

        let dispatcher = new_dispatcher(window, document.clone(), options);
        let listeners = Rc::new(RefCell::new(Listeners::default()));

        if document.ready_state() == "loading" {
            let weak_dispatcher = Rc::downgrade(&dispatcher);
            let weak_listeners = Rc::downgrade(&listeners);
            let ready_document = document.clone();
            listeners
                .borrow_mut()
                .add(&document, "DOMContentLoaded", move |_| {
                    let (Some(dispatcher), Some(listeners)) =
                        (weak_dispatcher.upgrade(), weak_listeners.upgrade())
                    else {
                        return;
                    };
                    if dispatcher.is_closed() {
                        return;
                    }
                    if let Err(e) = wire(&dispatcher, &ready_document, &listeners, &query) {
                        log::error!("Failed to mount log viewer: {}", e);
                    }
                })?;
        } else {
            wire(&dispatcher, &document, &listeners, &query)?;
        }

        Ok(Self {
            dispatcher,
            listeners,
        })
    }
}

fn wire(
    dispatcher: &Rc<WebDispatcher>,
    document: &web_sys::Document,
    listeners: &RefCell<Listeners>,
    query: &str,
) -> Result<(), ViewerError> {
    bind(dispatcher, document, &mut listeners.borrow_mut())?;
    dispatcher.with(|viewer, page| viewer.mount(page, query));
    Ok(())
}

/// Byte count as a human-readable size. Negative or non-finite input
/// formats as `"0 B"`.
#[wasm_bindgen(js_name = formatFileSize)]
pub fn format_file_size_js(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes as u64
    } else {
        0
    };
    format_file_size(bytes)
}

/// Millisecond Unix timestamp as local date and time, laid out for the
/// browser's language.
#[wasm_bindgen(js_name = formatTimestamp)]
pub fn format_timestamp_js(millis: f64) -> String {
    if !millis.is_finite() {
        return "Invalid Date".to_string();
    }
    let language = web_sys::window()
        .and_then(|w| w.navigator().language())
        .unwrap_or_default();
    format_timestamp(millis as i64, locale_from_tag(&language))
}
