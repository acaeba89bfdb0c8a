//! Escaping helpers for generated view markup.

use std::borrow::Cow;

/// Escape text content.
pub(crate) fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape a double-quoted attribute value.
pub(crate) fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
