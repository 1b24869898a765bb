use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::{FeedItem, FeedQuery};
use crate::errors::NewsResult;
use crate::http::HttpFetch;
use crate::services::FeedService;

/// Per-user browsing state: the active query, when it was last fetched, and
/// the items that fetch returned.
#[derive(Debug, Clone)]
pub struct Session {
    refresh_after: Duration,
    current_query: Option<FeedQuery>,
    last_fetch: Option<DateTime<Utc>>,
    items: Vec<FeedItem>,
    search_text: String,
}

impl Session {
    /// A fresh session; nothing is loaded until the first [`Session::load`]
    pub fn new(refresh_after: Duration) -> Self {
        Self {
            refresh_after,
            current_query: None,
            last_fetch: None,
            items: Vec::new(),
            search_text: String::new(),
        }
    }

    /// True if never fetched, the refresh window has passed, or the query changed
    pub fn needs_refresh(&self, query: &FeedQuery, now: DateTime<Utc>) -> bool {
        match self.last_fetch {
            None => true,
            Some(last) => now - last > self.refresh_after || self.current_query.as_ref() != Some(query),
        }
    }

    /// Items for `query`, refetching through `feeds` only when needed
    pub fn load<F: HttpFetch>(
        &mut self,
        feeds: &FeedService<F>,
        query: &FeedQuery,
        now: DateTime<Utc>,
    ) -> &[FeedItem] {
        if self.needs_refresh(query, now) {
            debug!("Session refreshing {}", query);
            self.items = feeds.fetch(query);
            self.last_fetch = Some(now);
            self.current_query = Some(query.clone());
        }

        &self.items
    }

    /// Force the next load to refetch
    pub fn request_refresh(&mut self) {
        self.last_fetch = None;
    }

    /// Switch to search mode. Topic filters are dropped and the next load refetches.
    pub fn enter_search(&mut self, text: &str) -> NewsResult<FeedQuery> {
        let query = FeedQuery::search(text)?;
        self.search_text = text.trim().to_string();
        self.current_query = None;
        self.last_fetch = None;
        Ok(query)
    }

    /// Back to filter mode; the search text is cleared
    pub fn leave_search(&mut self) {
        self.search_text.clear();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }

    pub fn current_query(&self) -> Option<&FeedQuery> {
        self.current_query.as_ref()
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Duration::hours(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{SystemClock, DEFAULT_TTL};
    use crate::http::{FetchedPage, MockHttpFetch};
    use std::sync::Arc;

    const ONE_ITEM: &str = r#"<rss version="2.0"><channel><title>t</title><link>https://l.example</link><description>d</description>
        <item><title>Only story</title><link>https://news.google.com/articles/1</link></item></channel></rss>"#;

    // Zero TTL so every session refresh reaches the fetcher
    fn feeds(expected_fetches: usize) -> FeedService<MockHttpFetch> {
        let mut mock = MockHttpFetch::new();
        mock.expect_fetch()
            .times(expected_fetches)
            .returning(|url, _, _| {
                Ok(FetchedPage {
                    final_url: url.to_string(),
                    html: ONE_ITEM.to_string(),
                })
            });
        FeedService::new(
            Arc::new(mock),
            std::time::Duration::from_secs(30),
            std::time::Duration::ZERO,
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn test_first_load_fetches_then_reuses() {
        let feeds = feeds(1);
        let mut session = Session::default();
        let query = FeedQuery::top(None, "US").unwrap();
        let now = Utc::now();

        assert_eq!(session.load(&feeds, &query, now).len(), 1);
        assert_eq!(session.load(&feeds, &query, now + Duration::minutes(30)).len(), 1);
        assert_eq!(session.last_fetch(), Some(now));
        assert_eq!(session.current_query(), Some(&query));
    }

    #[test]
    fn test_reload_after_window_or_filter_change() {
        let feeds = feeds(3);
        let mut session = Session::default();
        let us = FeedQuery::top(None, "US").unwrap();
        let gb = FeedQuery::top(None, "GB").unwrap();
        let now = Utc::now();

        session.load(&feeds, &us, now);
        session.load(&feeds, &us, now + Duration::minutes(61));
        session.load(&feeds, &gb, now + Duration::minutes(62));
    }

    #[test]
    fn test_request_refresh_forces_fetch() {
        let feeds = feeds(2);
        let mut session = Session::default();
        let query = FeedQuery::top(Some("SPORTS"), "IN").unwrap();
        let now = Utc::now();

        session.load(&feeds, &query, now);
        session.request_refresh();
        assert!(session.needs_refresh(&query, now));
        session.load(&feeds, &query, now);
    }

    #[test]
    fn test_search_mode_resets_filters() {
        let mut session = Session::default();
        let feeds = feeds(1);
        let topic = FeedQuery::top(Some("HEALTH"), "US").unwrap();
        session.load(&feeds, &topic, Utc::now());

        let query = session.enter_search("  solar eclipse ").unwrap();
        assert_eq!(query, FeedQuery::search("solar eclipse").unwrap());
        assert_eq!(session.search_text(), "solar eclipse");
        assert_eq!(session.current_query(), None);
        assert_eq!(session.last_fetch(), None);

        session.leave_search();
        assert_eq!(session.search_text(), "");
        assert!(session.enter_search("   ").is_err());
    }

    #[test]
    fn test_default_window_matches_cache_ttl() {
        let session = Session::default();
        assert_eq!(
            session.refresh_after.num_seconds() as u64,
            DEFAULT_TTL.as_secs()
        );
    }
}
