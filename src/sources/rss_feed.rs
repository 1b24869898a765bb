use feed_rs::parser;
use tracing::{debug, warn};

use crate::domain::FeedItem;
use crate::errors::ParseFailure;

/// Parse a feed payload into items, in document order.
///
/// Malformed input yields an empty list; the failure is logged, not returned.
pub fn parse_feed(bytes: &[u8]) -> Vec<FeedItem> {
    match try_parse_feed(bytes) {
        Ok(items) => items,
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    }
}

/// RSS 2.0 first, then Atom / JSON Feed via feed-rs.
pub fn try_parse_feed(bytes: &[u8]) -> Result<Vec<FeedItem>, ParseFailure> {
    match rss::Channel::read_from(bytes) {
        Ok(channel) => Ok(items_from_channel(&channel)),
        Err(rss_err) => {
            debug!("not an RSS document ({}), trying feed-rs", rss_err);
            parser::parse(bytes)
                .map(items_from_feed)
                .map_err(|e| ParseFailure(format!("{}; {}", rss_err, e)))
        }
    }
}

fn items_from_channel(channel: &rss::Channel) -> Vec<FeedItem> {
    channel
        .items()
        .iter()
        .map(|item| {
            let source = item
                .source()
                .and_then(|s| s.title())
                .unwrap_or_default()
                .to_string();

            FeedItem::new(
                item.title().unwrap_or_default().to_string(),
                item.link().unwrap_or_default().trim().to_string(),
            )
            .with_published_at(item.pub_date().unwrap_or_default().to_string())
            .with_source(source)
            .with_description(item.description().unwrap_or_default().to_string())
        })
        .collect()
}

fn items_from_feed(feed: feed_rs::model::Feed) -> Vec<FeedItem> {
    let source = feed.title.map(|t| t.content).unwrap_or_default();

    feed.entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .into_iter()
                .next()
                .map(|l| l.href)
                .unwrap_or_default();
            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default();

            FeedItem::new(entry.title.map(|t| t.content).unwrap_or_default(), link)
                .with_published_at(published_at)
                .with_source(source.clone())
                .with_description(entry.summary.map(|s| s.content).unwrap_or_default())
        })
        .collect()
}
