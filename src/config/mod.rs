use std::time::Duration;

use crate::domain::feed::normalize_country;
use crate::errors::{NewsError, NewsResult};
use crate::http::DEFAULT_BROWSER_USER_AGENT;

/// Bounds of the article-count selector
pub const MIN_COUNT: usize = 5;
pub const MAX_COUNT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub country: String,
    pub count: usize,
    pub feed_timeout: Duration,
    pub page_timeout: Duration,
    pub poster_timeout: Duration,
    pub cache_ttl: Duration,
    pub user_agent: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            count: 10,
            feed_timeout: Duration::from_secs(30),
            page_timeout: Duration::from_secs(10),
            poster_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(3600),
            user_agent: DEFAULT_BROWSER_USER_AGENT.to_string(),
            log_filter: "newstrackr=info".to_string(),
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> NewsResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup<L>(lookup: L) -> NewsResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let country = match lookup("NEWSTRACKR_COUNTRY") {
            Some(value) => normalize_country(&value)?,
            None => defaults.country,
        };

        let count = parse_number(&lookup, "NEWSTRACKR_COUNT")?
            .map(|n| clamp_count(n as usize))
            .unwrap_or(defaults.count);

        let secs = |name: &str, default: Duration| -> NewsResult<Duration> {
            Ok(parse_number(&lookup, name)?
                .map(Duration::from_secs)
                .unwrap_or(default))
        };

        let feed_timeout = secs("NEWSTRACKR_FEED_TIMEOUT_SECS", defaults.feed_timeout)?;
        let page_timeout = secs("NEWSTRACKR_PAGE_TIMEOUT_SECS", defaults.page_timeout)?;
        let poster_timeout = secs("NEWSTRACKR_POSTER_TIMEOUT_SECS", defaults.poster_timeout)?;
        let cache_ttl = secs("NEWSTRACKR_CACHE_TTL_SECS", defaults.cache_ttl)?;

        if feed_timeout.is_zero() || page_timeout.is_zero() || poster_timeout.is_zero() {
            return Err(NewsError::Config("Timeouts must be at least one second".to_string()));
        }

        let user_agent = lookup("NEWSTRACKR_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let log_filter = lookup("NEWSTRACKR_LOG")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            country,
            count,
            feed_timeout,
            page_timeout,
            poster_timeout,
            cache_ttl,
            user_agent,
            log_filter,
        })
    }

    /// One `key = value` line per setting
    pub fn describe(&self) -> String {
        format!(
            "country = {}\ncount = {}\nfeed_timeout_secs = {}\npage_timeout_secs = {}\nposter_timeout_secs = {}\ncache_ttl_secs = {}\nuser_agent = {}\nlog = {}",
            self.country,
            self.count,
            self.feed_timeout.as_secs(),
            self.page_timeout.as_secs(),
            self.poster_timeout.as_secs(),
            self.cache_ttl.as_secs(),
            self.user_agent,
            self.log_filter,
        )
    }
}

pub fn clamp_count(count: usize) -> usize {
    count.clamp(MIN_COUNT, MAX_COUNT)
}

fn parse_number<L>(lookup: &L, name: &str) -> NewsResult<Option<u64>>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| NewsError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
    }
}
