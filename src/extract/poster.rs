use scraper::Html;

use crate::extract::{attr_value, resolve_url, selector};

/// Representative image of a page, in strict priority order:
/// Open Graph image, Twitter card image, then the first `<img>`.
///
/// Only the first element of each kind is consulted. Relative URLs are
/// resolved against `page_url`; a candidate that does not resolve (such as a
/// `data:` placeholder) falls through to the next kind.
pub fn find_poster(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let candidates = [
        ("meta[property='og:image']", "content"),
        ("meta[property='twitter:image'], meta[name='twitter:image']", "content"),
        ("img", "src"),
    ];

    candidates
        .iter()
        .find_map(|(css, attr)| {
            document
                .select(&selector(css))
                .next()
                .and_then(|el| attr_value(el, attr))
                .and_then(|src| resolve_url(page_url, &src))
        })
}
