use serde::{Deserialize, Serialize};

use super::FeedItem;

/// Readable content pulled out of one article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub summary: String,
    pub top_image: Option<String>,
}

impl ExtractedArticle {
    pub fn new(title: String, summary: String) -> Self {
        Self {
            title,
            summary,
            top_image: None,
        }
    }

    pub fn with_top_image(mut self, top_image: Option<String>) -> Self {
        self.top_image = top_image;
        self
    }

    /// True when neither a title nor a summary survived extraction
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.summary.trim().is_empty()
    }
}

/// One feed item ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub feed_item: FeedItem,
    pub final_url: String,
    pub article: ExtractedArticle,
}

impl DisplayRecord {
    pub fn new(feed_item: FeedItem, final_url: String, article: ExtractedArticle) -> Self {
        Self {
            feed_item,
            final_url,
            article,
        }
    }

    /// Extracted title, or the feed title when the page had none
    pub fn headline(&self) -> &str {
        if self.article.title.trim().is_empty() {
            &self.feed_item.title
        } else {
            &self.article.title
        }
    }
}
