pub mod feed;
pub mod article;
pub mod notice;

pub use feed::{FeedItem, FeedQuery, KNOWN_COUNTRIES, KNOWN_TOPICS};
pub use article::{DisplayRecord, ExtractedArticle};
pub use notice::{Notice, NoticeLevel};
