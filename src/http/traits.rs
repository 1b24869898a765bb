use std::time::Duration;

use crate::errors::NetworkFailure;

/// Which user agent a request presents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The HTTP library's own default; used for feed requests
    Library,
    /// A desktop browser string; used for article pages
    Browser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL reached after following every redirect
    pub final_url: String,
    pub html: String,
}

pub type FetchResult = Result<FetchedPage, NetworkFailure>;

#[cfg_attr(test, mockall::automock)]
pub trait HttpFetch: Send + Sync {
    /// GET `url`, following redirects. Failures are returned, never panicked.
    fn fetch(&self, url: &str, timeout: Duration, identity: Identity) -> FetchResult;
}
