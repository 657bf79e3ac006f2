//! Search-engine sitemap notification for smap.
//!
//! After a sitemap is regenerated, search engines can be told to re-fetch it
//! by requesting a well-known "ping" endpoint with the sitemap location in the
//! query string. Notification is strictly best-effort: one request, a bounded
//! timeout, no retry, and a boolean outcome instead of an error.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 10;

/// Path of the published sitemap below a site's base URL.
const SITEMAP_PATH: &str = "/sitemap.xml";

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Something that can tell a search engine a site's sitemap changed.
pub trait Notifier {
    /// Notify about the sitemap of the site at `site_base_url`
    /// (e.g. `https://example.com`).
    ///
    /// Returns `true` if the notification was accepted. Never fails.
    fn notify(&self, site_base_url: &str) -> bool;
}

/// Reason a ping was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Endpoint answered with a non-success status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

/// [`Notifier`] that issues a single GET to a ping endpoint.
pub struct PingNotifier {
    agent: Agent,
    endpoint: String,
}

impl PingNotifier {
    /// Create a notifier for `endpoint` with the given request timeout.
    #[must_use]
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            endpoint: endpoint.to_owned(),
        }
    }

    /// Create a notifier with the default 10 second timeout.
    #[must_use]
    pub fn with_default_timeout(endpoint: &str) -> Self {
        Self::new(endpoint, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Full ping URL for a site, with the sitemap location URL-encoded.
    #[must_use]
    pub fn ping_url(&self, site_base_url: &str) -> String {
        let sitemap_url = format!("{}{SITEMAP_PATH}", site_base_url.trim_end_matches('/'));
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}sitemap={}",
            self.endpoint,
            percent_encode(sitemap_url.as_bytes(), QUERY_ENCODE_SET)
        )
    }

    /// Send the ping and return the response status.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] on transport failure or a non-2xx status.
    pub fn ping(&self, site_base_url: &str) -> Result<u16, NotifyError> {
        let url = self.ping_url(site_base_url);
        tracing::debug!(url = %url, "Pinging search engine");

        let response = self.agent.get(&url).call()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}

impl Notifier for PingNotifier {
    fn notify(&self, site_base_url: &str) -> bool {
        match self.ping(site_base_url) {
            Ok(status) => {
                tracing::info!(site = site_base_url, status, "Search engine notified");
                true
            }
            Err(e) => {
                tracing::warn!(site = site_base_url, error = %e, "Search engine not notified");
                false
            }
        }
    }
}
