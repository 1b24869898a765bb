use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cache::{Clock, SystemClock};
use crate::config::Config;
use crate::domain::{DisplayRecord, FeedItem, Notice};
use crate::errors::ExtractionFailure;
use crate::http::HttpFetch;
use crate::services::{ArticleService, FeedService};

/// Outcome of one [`Pipeline::run`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Number of feed items the run looked at
    pub requested: usize,
    pub records: Vec<DisplayRecord>,
    pub notices: Vec<Notice>,
}

/// Feed item to display record, one item at a time.
///
/// Items are processed sequentially in feed order. A failing item produces a
/// [`Notice`] and is skipped; it never stops the batch.
pub struct Pipeline<F: HttpFetch> {
    feeds: FeedService<F>,
    articles: ArticleService<F>,
}

impl<F: HttpFetch> Pipeline<F> {
    pub fn new(fetcher: Arc<F>, config: &Config) -> Self {
        Self::with_clock(fetcher, config, Arc::new(SystemClock))
    }

    pub fn with_clock(fetcher: Arc<F>, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            feeds: FeedService::new(
                fetcher.clone(),
                config.feed_timeout,
                config.cache_ttl,
                clock.clone(),
            ),
            articles: ArticleService::new(
                fetcher,
                config.page_timeout,
                config.poster_timeout,
                config.cache_ttl,
                clock,
            ),
        }
    }

    pub fn feeds(&self) -> &FeedService<F> {
        &self.feeds
    }

    pub fn articles(&self) -> &ArticleService<F> {
        &self.articles
    }

    /// Process at most `max_count` items, in order.
    pub fn run(&self, items: &[FeedItem], max_count: usize) -> RunReport {
        let selected = &items[..items.len().min(max_count)];
        let mut report = RunReport {
            requested: selected.len(),
            ..Default::default()
        };

        for (idx, item) in selected.iter().enumerate() {
            let position = idx + 1;
            match self.process(position, item) {
                Ok(record) => report.records.push(record),
                Err(notice) => report.notices.push(notice),
            }
        }

        info!(
            "Processed {} items: {} records, {} skipped",
            report.requested,
            report.records.len(),
            report.notices.len()
        );

        report
    }

    fn process(&self, position: usize, item: &FeedItem) -> Result<DisplayRecord, Notice> {
        debug!(position, link = %item.link, "processing item");

        let page = self.articles.fetch_page(&item.link).map_err(|e| {
            warn!(position, reason = %e.reason(), "Failed to open link: {}", e);
            Notice::warning(position, &item.title, format!("Failed to open link: {}", e))
        })?;

        let mut article = match self
            .articles
            .extract_primary(&page.final_url, Some(page.html.as_str()))
        {
            Some(article) => article,
            None => {
                debug!(position, url = %page.final_url, "primary extraction empty, using fallback");
                let article = self.articles.extract_fallback(&page.html, &page.final_url);
                if article.is_empty() {
                    let failure = ExtractionFailure {
                        url: page.final_url.clone(),
                    };
                    error!(position, "Failed to parse article: {}", failure);
                    return Err(Notice::error(
                        position,
                        &item.title,
                        format!("Failed to parse article: {}", failure),
                    ));
                }
                article
            }
        };

        if article.top_image.is_none() {
            article.top_image = self.articles.resolve_poster(&page.final_url);
        }

        Ok(DisplayRecord::new(item.clone(), page.final_url, article))
    }
}
