/// A `keydown` as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Page-wide keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd + R
    Reload,
    /// End
    ScrollToBottom,
    /// Home
    ScrollToTop,
    /// Escape
    ClearSearch,
}

impl Shortcut {
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        match press.key.as_str() {
            "r" if press.ctrl || press.meta => Some(Shortcut::Reload),
            "End" => Some(Shortcut::ScrollToBottom),
            "Home" => Some(Shortcut::ScrollToTop),
            "Escape" => Some(Shortcut::ClearSearch),
            _ => None,
        }
    }

    /// Escape keeps the browser default; the others replace it.
    pub fn prevents_default(self) -> bool {
        !matches!(self, Shortcut::ClearSearch)
    }
}
