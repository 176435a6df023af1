//! Markdown normalization for notification text.
//!
//! Converted Moodle messages frequently embed images hosted behind the LMS
//! (often with `pluginfile` or other non-web protocols) that the chat client
//! cannot render inline. These helpers turn such images into clickable links
//! and keep HTML entities from visually fusing with neighbouring text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Label used when an embedded image carries no alt text
pub const VIEW_IMAGE_LABEL: &str = "view image";

/// Token placed on both sides of an HTML entity
pub const ENTITY_SPACER: &str = " ";

static EMBEDDED_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[(?P<text>.*?)\]\((?P<protocol>\w+):(?P<host>[^\n)]+)?\)")
        .expect("embedded image pattern is valid")
});

static HTML_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});")
        .expect("html entity pattern is valid")
});

/// Rewrites every markdown image `![alt](protocol:host)` into the link form
/// `[\[alt\]](protocol:host)`.
///
/// Empty alt text is replaced with [`VIEW_IMAGE_LABEL`]. Text outside of image
/// references is returned unchanged.
pub fn replace_embedded_images(markdown: &str) -> String {
    EMBEDDED_IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let text = caps
                .name("text")
                .map(|m| m.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(VIEW_IMAGE_LABEL);
            let protocol = &caps["protocol"];
            let host = caps.name("host").map_or("", |m| m.as_str());

            format!(r"[\[{text}\]]({protocol}:{host})")
        })
        .into_owned()
}

/// Surrounds named (`&nbsp;`), decimal (`&#160;`) and hex (`&#xA0;`) entity
/// references with [`ENTITY_SPACER`].
///
/// Single pass only: running it twice wraps the entities again.
pub fn normalize_html_entities(text: &str) -> String {
    HTML_ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            format!("{ENTITY_SPACER}{}{ENTITY_SPACER}", &caps[0])
        })
        .into_owned()
}
