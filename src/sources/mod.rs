pub mod rss_feed;

pub use rss_feed::{parse_feed, try_parse_feed};
