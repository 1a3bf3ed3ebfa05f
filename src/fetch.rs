//! Page fetching.
//!
//! Drivers only see the [`Fetcher`] trait, so they run unchanged against
//! the network or against canned pages in tests.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::encoding::decode_body;
use crate::options::Options;
use crate::{Error, Result};

/// Source of page bodies.
pub trait Fetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the request fails and
    /// [`Error::HttpStatus`] for a non-success response.
    fn fetch_text(&self, url: &str) -> Result<String>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch_text(&self, url: &str) -> Result<String> {
        (**self).fetch_text(url)
    }
}

/// Blocking HTTP fetcher with a courtesy delay between requests.
///
/// Requests are strictly sequential: each one waits until `delay` has
/// passed since the previous one started.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl HttpFetcher {
    /// Build a fetcher from the user agent, timeout and delay in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the HTTP client cannot be initialized.
    pub fn new(options: &Options) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| Error::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            delay: options.request_delay,
            last_request: Cell::new(None),
        })
    }

    fn wait_turn(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        self.wait_turn();
        debug!(url, "fetching");

        let fetch_error = |e: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(fetch_error)?;

        debug!(url, bytes = body.len(), "fetched");
        Ok(decode_body(&body, content_type.as_deref()))
    }
}
