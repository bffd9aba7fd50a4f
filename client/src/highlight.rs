//! Search term highlighting for rendered log messages.
//!
//! Message markup is rebuilt from the element's plain text, so any markup
//! in the text is escaped before highlight spans are inserted.

use regex::{Regex, RegexBuilder};

use crate::config::HIGHLIGHT_CLASS;

/// Case-insensitive matcher for a literal search term.
pub struct Highlighter {
    pattern: Regex,
}

impl Highlighter {
    /// Returns `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }
        let pattern = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map_err(|e| log::warn!("Cannot highlight {:?}: {}", term, e))
            .ok()?;
        Some(Self { pattern })
    }

    /// Escaped markup for `text` with every match wrapped in a highlight span.
    pub fn markup(&self, text: &str) -> String {
        let mut html = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.pattern.find_iter(text) {
            html.push_str(&escape_html(&text[last..m.start()]));
            html.push_str(&format!(
                r#"<span class="{}">{}</span>"#,
                HIGHLIGHT_CLASS,
                escape_html(m.as_str())
            ));
            last = m.end();
        }
        html.push_str(&escape_html(&text[last..]));
        html
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
