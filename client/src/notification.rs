/// Identifies a live notification popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    /// Unknown names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => NotificationKind::Success,
            "error" => NotificationKind::Error,
            _ => NotificationKind::Info,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            NotificationKind::Info => "#3b82f6",
            NotificationKind::Success => "#10b981",
            NotificationKind::Error => "#ef4444",
        }
    }
}

/// A transient popup message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.kind.name())
    }

    /// Inline style: fixed, centred at the top, coloured by kind.
    pub fn css_text(&self) -> String {
        format!(
            "position: fixed; top: 1rem; left: 50%; transform: translateX(-50%); \
             background: {}; color: white; padding: 0.75rem 1.5rem; \
             border-radius: 0.5rem; z-index: 1000; \
             box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);",
            self.kind.background()
        )
    }
}
