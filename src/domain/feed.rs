use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::errors::{NewsError, NewsResult};

const GOOGLE_NEWS_RSS: &str = "https://news.google.com/rss";

/// Topics Google News exposes as sections
pub const KNOWN_TOPICS: &[&str] = &[
    "WORLD",
    "NATION",
    "BUSINESS",
    "TECHNOLOGY",
    "ENTERTAINMENT",
    "SPORTS",
    "SCIENCE",
    "HEALTH",
];

/// (name, code) pairs offered by the country selector
pub const KNOWN_COUNTRIES: &[(&str, &str)] = &[
    ("United States", "US"),
    ("United Kingdom", "GB"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("Japan", "JP"),
    ("India", "IN"),
    ("Brazil", "BR"),
    ("South Africa", "ZA"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Raw `<pubDate>` text, not parsed
    pub published_at: String,
    pub source: String,
    pub description: String,
}

impl FeedItem {
    pub fn new(title: String, link: String) -> Self {
        Self {
            title,
            link,
            published_at: String::new(),
            source: String::new(),
            description: String::new(),
        }
    }

    pub fn with_published_at(mut self, published_at: String) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn with_source(mut self, source: String) -> Self {
        self.source = source;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }
}

/// Identifies one feed request. Doubles as the feed cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedQuery {
    TopicCountry {
        topic: Option<String>,
        country: String,
    },
    Search {
        query: String,
    },
}

impl FeedQuery {
    /// Trending (no topic) or topic news for a country
    pub fn top(topic: Option<&str>, country: &str) -> NewsResult<Self> {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase);

        Ok(FeedQuery::TopicCountry {
            topic,
            country: normalize_country(country)?,
        })
    }

    pub fn search(query: &str) -> NewsResult<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NewsError::Config("Search query is empty".to_string()));
        }

        Ok(FeedQuery::Search {
            query: query.to_string(),
        })
    }

    /// Google News RSS endpoint for this query
    pub fn url(&self) -> String {
        match self {
            FeedQuery::TopicCountry {
                topic: Some(topic),
                country,
            } => format!(
                "{}/search?q={}&hl=en-{cc}&gl={cc}&ceid={cc}:en",
                GOOGLE_NEWS_RSS,
                encode(topic),
                cc = country
            ),
            FeedQuery::TopicCountry {
                topic: None,
                country,
            } => format!(
                "{}?hl=en-{cc}&gl={cc}&ceid={cc}:en",
                GOOGLE_NEWS_RSS,
                cc = country
            ),
            FeedQuery::Search { query } => {
                format!("{}/search?q={}", GOOGLE_NEWS_RSS, encode(query))
            }
        }
    }

    /// Human label used in headings and "no news" messages
    pub fn label(&self) -> String {
        match self {
            FeedQuery::TopicCountry {
                topic: Some(topic),
                country,
            } => format!("{} ({})", topic, country),
            FeedQuery::TopicCountry {
                topic: None,
                country,
            } => format!("Trending ({})", country),
            FeedQuery::Search { query } => format!("'{}'", query),
        }
    }
}

impl std::fmt::Display for FeedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

pub fn normalize_country(country: &str) -> NewsResult<String> {
    let code = country.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(NewsError::InvalidCountry(country.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}
