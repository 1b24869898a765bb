use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{Clock, TtlCache};
use crate::domain::{FeedItem, FeedQuery};
use crate::http::{HttpFetch, Identity};
use crate::sources::parse_feed;

/// Cached feed retrieval keyed by the full [`FeedQuery`].
pub struct FeedService<F: HttpFetch> {
    fetcher: Arc<F>,
    timeout: Duration,
    cache: TtlCache<FeedQuery, Vec<FeedItem>>,
}

impl<F: HttpFetch> FeedService<F> {
    pub fn new(fetcher: Arc<F>, timeout: Duration, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            timeout,
            cache: TtlCache::with_clock("feeds", ttl, clock),
        }
    }

    /// Items for `query`. A failed fetch yields an empty list, which is
    /// cached like any other result.
    pub fn fetch(&self, query: &FeedQuery) -> Vec<FeedItem> {
        self.cache
            .get_or_compute(query.clone(), || self.fetch_uncached(query))
    }

    fn fetch_uncached(&self, query: &FeedQuery) -> Vec<FeedItem> {
        let url = query.url();
        info!("Fetching feed {} from {}", query, url);

        match self.fetcher.fetch(&url, self.timeout, Identity::Library) {
            Ok(page) => {
                let items = parse_feed(page.html.as_bytes());
                info!("Feed {} returned {} items", query, items.len());
                items
            }
            Err(e) => {
                warn!(reason = %e.reason(), "Error fetching news: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, DEFAULT_TTL};
    use crate::errors::NetworkFailure;
    use crate::http::{FetchedPage, MockHttpFetch};
    use chrono::Utc;
    use mockall::predicate::{always, eq};

    fn rss_with_items(count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| {
                format!(
                    "<item><title>Story {i}</title><link>https://news.google.com/articles/{i}</link>\
                     <pubDate>Mon, 13 Oct 2025 0{}:00:00 GMT</pubDate><source url=\"https://s.example\">Source {i}</source>\
                     <description>Desc {i}</description></item>",
                    i % 10
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>News</title>\
             <link>https://news.google.com</link><description>d</description>{}</channel></rss>",
            items
        )
    }

    fn service(mock: MockHttpFetch) -> (Arc<ManualClock>, FeedService<MockHttpFetch>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = FeedService::new(Arc::new(mock), Duration::from_secs(30), DEFAULT_TTL, clock.clone());
        (clock, service)
    }

    #[test]
    fn test_identical_query_fetched_once_within_ttl() {
        let query = FeedQuery::top(Some("TECHNOLOGY"), "US").unwrap();
        let body = rss_with_items(10);

        let mut mock = MockHttpFetch::new();
        mock.expect_fetch()
            .with(eq(query.url()), always(), eq(Identity::Library))
            .times(1)
            .returning(move |url, _, _| {
                Ok(FetchedPage {
                    final_url: url.to_string(),
                    html: body.clone(),
                })
            });

        let (_, service) = service(mock);

        assert_eq!(service.fetch(&query).len(), 10);
        assert_eq!(service.fetch(&query).len(), 10);
    }

    #[test]
    fn test_query_refetched_after_ttl() {
        let query = FeedQuery::top(Some("TECHNOLOGY"), "US").unwrap();
        let body = rss_with_items(3);

        let mut mock = MockHttpFetch::new();
        mock.expect_fetch().times(2).returning(move |url, _, _| {
            Ok(FetchedPage {
                final_url: url.to_string(),
                html: body.clone(),
            })
        });

        let (clock, service) = service(mock);

        service.fetch(&query);
        clock.advance(chrono::Duration::seconds(3600));
        assert_eq!(service.fetch(&query).len(), 3);
    }

    #[test]
    fn test_failed_fetch_cached_as_empty() {
        let query = FeedQuery::search("nothing").unwrap();

        let mut mock = MockHttpFetch::new();
        mock.expect_fetch().times(1).returning(|url, _, _| {
            Err(NetworkFailure::Timeout {
                url: url.to_string(),
            })
        });

        let (_, service) = service(mock);

        assert!(service.fetch(&query).is_empty());
        assert!(service.fetch(&query).is_empty());
    }

    #[test]
    fn test_different_countries_are_different_keys() {
        let us = FeedQuery::top(None, "US").unwrap();
        let gb = FeedQuery::top(None, "GB").unwrap();
        let body = rss_with_items(1);

        let mut mock = MockHttpFetch::new();
        mock.expect_fetch().times(2).returning(move |url, _, _| {
            Ok(FetchedPage {
                final_url: url.to_string(),
                html: body.clone(),
            })
        });

        let (_, service) = service(mock);
        service.fetch(&us);
        service.fetch(&gb);
        service.fetch(&us);
    }
}
