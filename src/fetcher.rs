use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::redirect;
use tracing::{debug, warn};

use crate::config::{CrawlConfig, RetryPolicy};
use crate::error::{FetchError, Result, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A single GET, no retries.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError> {
        (**self).get(url)
    }
}

/// Blocking reqwest client that sends the configured header set on every request.
pub struct HttpTransport {
    client: Client,
    headers: Vec<(&'static str, &'static str)>,
}

impl HttpTransport {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(10))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            headers: config.headers.clone(),
        })
    }

    /// A GET for `url` carrying the fixed header set.
    pub fn request(&self, url: &str) -> RequestBuilder {
        self.headers
            .iter()
            .fold(self.client.get(url), |request, (name, value)| {
                request.header(*name, *value)
            })
    }
}

/// Connect failures and timeouts become [`TransportError::Connection`].
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_connect() || e.is_timeout() {
        TransportError::Connection(e.to_string())
    } else {
        TransportError::Http(e)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError> {
        let resp = self.request(url).send().map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(RawResponse { status, body })
    }
}

/// GET `url`, retrying transport failures per `policy` and pausing through
/// `sleep` between attempts.
///
/// Only HTTP 200 counts as success. Any other status is returned immediately
/// as [`FetchError::Status`]; running out of attempts yields
/// [`FetchError::TransportExhausted`].
pub fn fetch_with_retry<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    policy: RetryPolicy,
    sleep: &dyn Fn(Duration),
) -> Result<String> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match transport.get(url) {
            Ok(resp) if resp.status == 200 => {
                debug!(url, attempt, "fetched");
                return Ok(resp.body);
            }
            Ok(resp) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: resp.status,
                });
            }
            Err(e) => {
                warn!(url, attempt, error = %e, "request failed, retrying");
                last_error = e.to_string();
                if attempt < attempts {
                    sleep(policy.backoff);
                }
            }
        }
    }

    Err(FetchError::TransportExhausted {
        url: url.to_string(),
        attempts,
        last_error,
    })
}
