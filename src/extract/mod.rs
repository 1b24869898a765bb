//! Article content extraction.
//!
//! [`primary`] does full-document analysis (boilerplate removal, main-content
//! detection, extractive summary, image choice). [`fallback`] runs a
//! readability pass when the primary analysis finds nothing. [`poster`] scans
//! page metadata for an image when neither extractor supplied one.

pub mod text;
pub mod summarize;
pub mod primary;
pub mod fallback;
pub mod poster;

pub use fallback::extract_fallback;
pub use poster::find_poster;
pub use primary::extract_primary_from_html;
pub use text::{truncate_summary, SUMMARY_MAX_CHARS};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parse a selector known at compile time
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// First non-empty `attr` of the first element matching `css`
pub(crate) fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    document
        .select(&selector(css))
        .next()
        .and_then(|el| attr_value(el, attr))
}

pub(crate) fn attr_value(element: ElementRef<'_>, attr: &str) -> Option<String> {
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve `src` against the page URL; data URIs are rejected
pub(crate) fn resolve_url(base: &str, src: &str) -> Option<String> {
    if src.starts_with("data:") {
        return None;
    }

    match Url::parse(base).and_then(|b| b.join(src)) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(src).ok().map(|u| u.to_string()),
    }
}
