//! Markup fragment builder
//!
//! All HTML produced by the crate goes through [`Markup`]. Dataset values are
//! trusted build-time data and are written as-is, with one exception: text
//! destined for an attribute through [`Attr::quoted`] has its double quotes
//! escaped. Text that does not come from the dataset (page title, failure
//! reason) goes through [`Markup::escaped_text`]. Those two calls are the only
//! escaping in the crate.

use std::borrow::Cow;
use std::fmt;

/// A finished, self-contained piece of markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `name="value"` pair on an element.
#[derive(Debug, Clone, Copy)]
pub struct Attr<'a> {
    name: &'static str,
    value: &'a str,
    quoted: bool,
}

impl<'a> Attr<'a> {
    /// Attribute whose value is written verbatim.
    pub fn trusted(name: &'static str, value: &'a str) -> Self {
        Attr {
            name,
            value,
            quoted: false,
        }
    }

    /// Attribute whose value has its double quotes escaped.
    pub fn quoted(name: &'static str, value: &'a str) -> Self {
        Attr {
            name,
            value,
            quoted: true,
        }
    }
}

/// Escape `"` so the value can sit inside a double-quoted attribute.
pub fn escape_quotes(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(s.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Append-only builder for a [`Fragment`].
#[derive(Debug, Default)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Markup::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Markup {
            buf: String::with_capacity(capacity),
        }
    }

    pub fn open(&mut self, tag: &str, attrs: &[Attr<'_>]) -> &mut Self {
        self.start_tag(tag, attrs);
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Element with no content and no closing tag, e.g. `<br>`.
    pub fn void(&mut self, tag: &str, attrs: &[Attr<'_>]) -> &mut Self {
        self.start_tag(tag, attrs);
        self
    }

    /// `<tag attrs>text</tag>` with `text` written verbatim.
    pub fn element(&mut self, tag: &str, attrs: &[Attr<'_>], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    /// Trusted text, written verbatim.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Text from outside the dataset, fully HTML-escaped.
    pub fn escaped_text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html(text));
        self
    }

    pub fn fragment(&mut self, fragment: &Fragment) -> &mut Self {
        self.buf.push_str(fragment.as_str());
        self
    }

    pub fn finish(self) -> Fragment {
        Fragment(self.buf)
    }

    fn start_tag(&mut self, tag: &str, attrs: &[Attr<'_>]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for attr in attrs {
            self.buf.push(' ');
            self.buf.push_str(attr.name);
            self.buf.push_str("=\"");
            if attr.quoted {
                self.buf.push_str(&escape_quotes(attr.value));
            } else {
                self.buf.push_str(attr.value);
            }
            self.buf.push('"');
        }
        self.buf.push('>');
    }
}
