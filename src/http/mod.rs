pub mod traits;
pub mod client;

pub use traits::{FetchResult, FetchedPage, HttpFetch, Identity};
pub use client::{ReqwestFetcher, DEFAULT_BROWSER_USER_AGENT};

#[cfg(test)]
pub use traits::MockHttpFetch;
