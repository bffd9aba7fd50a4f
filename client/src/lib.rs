//! Client-side controller for the server-rendered log viewer page.
//!
//! The server owns log retrieval, filtering and rendering; this crate only
//! adds interactivity on top of the rendered page: auto-scroll toggle, log
//! pane scrolling, filter auto-submit, debounced search, keyboard
//! shortcuts, periodic auto-refresh and transient notifications.
//!
//! Everything except the `dom` shell is host-independent and unit-tested
//! natively; `dom` is compiled for `wasm32` only.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod highlight;
pub mod input;
pub mod notification;
pub mod page;
pub mod queue;
pub mod schedule;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{LogViewerApp, format_file_size_js, format_timestamp_js, start};

pub use dispatch::Dispatcher;
pub use error::ViewerError;
pub use format::{format_file_size, format_timestamp, locale_from_tag};
pub use viewer::{LogViewer, PageEvent, Propagation};
