use thiserror::Error;

/// Failures surfaced by the browser shell.
///
/// Missing page elements are not errors: the feature bound to them is
/// simply skipped.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("clipboard API unavailable")]
    ClipboardUnavailable,
    #[error("invalid viewer options: {0}")]
    InvalidOptions(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::InvalidOptions(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ViewerError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ViewerError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<ViewerError> for wasm_bindgen::JsValue {
    fn from(err: ViewerError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
