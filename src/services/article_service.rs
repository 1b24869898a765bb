use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{Clock, TtlCache};
use crate::domain::ExtractedArticle;
use crate::extract::{extract_fallback, extract_primary_from_html, find_poster};
use crate::http::{FetchResult, HttpFetch, Identity};

type ExtractionKey = (String, Option<String>);

/// Page fetch, extraction and poster lookup for article pages.
///
/// Primary extraction and poster resolution are cached per argument tuple.
pub struct ArticleService<F: HttpFetch> {
    fetcher: Arc<F>,
    page_timeout: Duration,
    poster_timeout: Duration,
    extractions: TtlCache<ExtractionKey, Option<ExtractedArticle>>,
    posters: TtlCache<String, Option<String>>,
}

impl<F: HttpFetch> ArticleService<F> {
    pub fn new(
        fetcher: Arc<F>,
        page_timeout: Duration,
        poster_timeout: Duration,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            page_timeout,
            poster_timeout,
            extractions: TtlCache::with_clock("extractions", ttl, clock.clone()),
            posters: TtlCache::with_clock("posters", ttl, clock),
        }
    }

    /// GET an article page with the browser identity
    pub fn fetch_page(&self, url: &str) -> FetchResult {
        self.fetcher.fetch(url, self.page_timeout, Identity::Browser)
    }

    /// Structured extraction. Uses `html` when given, otherwise fetches `url`.
    ///
    /// `None` means nothing usable was found and the fallback should run.
    pub fn extract_primary(&self, url: &str, html: Option<&str>) -> Option<ExtractedArticle> {
        let key = (url.to_string(), html.map(str::to_string));

        self.extractions.get_or_compute(key, || match html {
            Some(html) => extract_primary_from_html(html, url),
            None => match self.fetch_page(url) {
                Ok(page) => extract_primary_from_html(&page.html, &page.final_url),
                Err(e) => {
                    warn!(reason = %e.reason(), "Error parsing article: {}", e);
                    None
                }
            },
        })
    }

    /// Readability pass over already fetched HTML
    pub fn extract_fallback(&self, html: &str, url: &str) -> ExtractedArticle {
        extract_fallback(html, Some(url))
    }

    /// Representative image for `final_url`, read from a fresh fetch of the page.
    pub fn resolve_poster(&self, final_url: &str) -> Option<String> {
        self.posters.get_or_compute(final_url.to_string(), || {
            match self
                .fetcher
                .fetch(final_url, self.poster_timeout, Identity::Browser)
            {
                Ok(page) => find_poster(&page.html, &page.final_url),
                Err(e) => {
                    debug!("Error fetching poster: {}", e);
                    None
                }
            }
        })
    }
}
