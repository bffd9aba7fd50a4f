use serde::Deserialize;

use crate::error::ViewerError;

// Timing (milliseconds)
pub const SEARCH_DEBOUNCE_MS: u32 = 500;
pub const AUTO_REFRESH_INTERVAL_MS: u32 = 5000;
pub const NOTIFICATION_TIMEOUT_MS: u32 = 3000;

// Elements provided by the server template
pub const AUTO_SCROLL_BUTTON_ID: &str = "auto-scroll-btn";
pub const SCROLL_BOTTOM_BUTTON_ID: &str = "scroll-bottom-btn";
pub const FILTER_FORM_ID: &str = "filter-form";
pub const SEARCH_INPUT_ID: &str = "search-input";
pub const FORM_SEARCH_FIELD_SELECTOR: &str = r#"input[name="search"]"#;
pub const LOG_CONTAINER_SELECTOR: &str = ".log-container";
pub const LOG_MESSAGE_SELECTOR: &str = ".log-entry .log-message";

// Elements created by the viewer
pub const REFRESH_INDICATOR_ID: &str = "auto-refresh-indicator";
pub const REFRESH_INDICATOR_CLASS: &str = "auto-refresh-indicator";
pub const REFRESH_INDICATOR_MARKUP: &str =
    r#"<div class="auto-refresh-dot"></div> Auto Refresh Active"#;
pub const REFRESH_INDICATOR_STYLE: &str = "position: fixed; top: 1rem; right: 1rem; z-index: 1000;";
pub const HIGHLIGHT_CLASS: &str = "search-highlight";

// Labels
pub const ENABLE_AUTO_SCROLL_LABEL: &str = "Enable Auto Scroll";
pub const DISABLE_AUTO_SCROLL_LABEL: &str = "Disable Auto Scroll";
pub const COPY_SUCCEEDED_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard";

/// Query parameter that turns on periodic reloading.
pub const AUTO_REFRESH_PARAM: &str = "auto_refresh";

/// Runtime-tunable timings, passed as JSON by the page when mounting.
///
/// Every field is optional; omitted fields keep the compiled-in defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerOptions {
    pub search_debounce_ms: u32,
    pub auto_refresh_interval_ms: u32,
    pub notification_timeout_ms: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            auto_refresh_interval_ms: AUTO_REFRESH_INTERVAL_MS,
            notification_timeout_ms: NOTIFICATION_TIMEOUT_MS,
        }
    }
}

impl ViewerOptions {
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let options: ViewerOptions = serde_json::from_str(json)?;
        // A zero-length refresh period would reload in a tight loop.
        if options.auto_refresh_interval_ms == 0 {
            return Err(ViewerError::InvalidOptions(
                "auto_refresh_interval_ms must be positive".to_string(),
            ));
        }
        Ok(options)
    }
}

/// Look up the first value of `name` in a URL query string.
///
/// Follows `URLSearchParams` decoding: the leading `?` is optional, `+`
/// stands for a space and percent escapes are decoded.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == name).then(|| decode_component(value))
        })
}

/// Whether the page was loaded with `auto_refresh=true`.
pub fn auto_refresh_requested(query: &str) -> bool {
    query_param(query, AUTO_REFRESH_PARAM).as_deref() == Some("true")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
