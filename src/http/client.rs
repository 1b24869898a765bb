use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::errors::{NetworkFailure, NewsResult};
use crate::http::traits::{FetchResult, FetchedPage, HttpFetch, Identity};

pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

const MAX_REDIRECTS: usize = 10;

/// Blocking reqwest client. Timeouts are applied per request.
pub struct ReqwestFetcher {
    client: Client,
    browser_user_agent: String,
}

impl ReqwestFetcher {
    pub fn new(browser_user_agent: &str) -> NewsResult<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            browser_user_agent: browser_user_agent.to_string(),
        })
    }

    fn classify(url: &str, err: reqwest::Error) -> NetworkFailure {
        if err.is_timeout() {
            NetworkFailure::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            NetworkFailure::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            NetworkFailure::Connection {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl HttpFetch for ReqwestFetcher {
    fn fetch(&self, url: &str, timeout: Duration, identity: Identity) -> FetchResult {
        let mut request = self.client.get(url).timeout(timeout);
        if identity == Identity::Browser {
            request = request.header(USER_AGENT, self.browser_user_agent.as_str());
        }

        let response = request.send().map_err(|e| Self::classify(url, e))?;

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            debug!(url, %final_url, status = status.as_u16(), "non-success status");
            return Err(NetworkFailure::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().map_err(|e| Self::classify(url, e))?;
        debug!(url, %final_url, bytes = html.len(), "fetched");

        Ok(FetchedPage { final_url, html })
    }
}
