use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::{error::Error as _, fmt::Debug};
use tracing::{debug, warn};

use crate::{
    accumulator::{ResponseAccumulator, ResponseBody},
    config::{Config, HttpSettings},
    error::FetchError,
};

/// Issues one GET request and returns the complete body.
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<ResponseBody, FetchError>;
}

/// `Fetcher` backed by reqwest.
///
/// Only the request policy is kept between calls; every `get` builds its own
/// client so a failed request leaves nothing behind for the next one.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    settings: HttpSettings,
    progress: bool,
}

impl HttpFetcher {
    pub fn new(settings: HttpSettings) -> Self {
        Self { settings, progress: false }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.http.clone()).with_progress(config.progress)
    }

    /// Print a notice on stdout for every received chunk.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn client(&self) -> Result<Client, FetchError> {
        Client::builder()
            .timeout(self.settings.timeout())
            .redirect(Policy::limited(self.settings.max_redirects))
            .user_agent(self.settings.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(describe(&e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<ResponseBody, FetchError> {
        let client = self.client()?;

        let mut response = client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "request rejected by server");
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let mut acc = match self.settings.max_body_bytes {
            Some(limit) => ResponseAccumulator::with_limit(limit),
            None => ResponseAccumulator::new(),
        };
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if self.progress {
                println!("Received data chunk of size: {} bytes", chunk.len());
            }
            if acc.append(&chunk) != chunk.len() {
                warn!(received = acc.len(), "response body abandoned");
                return Err(FetchError::Accumulate { received: acc.len() });
            }
        }

        debug!(bytes = acc.len(), "response complete");
        Ok(acc.finish())
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    let reason = describe(&err);

    if err.is_timeout() {
        FetchError::Timeout(reason)
    } else if err.is_redirect() {
        FetchError::Redirect(reason)
    } else if err.is_connect() {
        FetchError::Connect(reason)
    } else if err.is_body() || err.is_decode() {
        FetchError::Body(reason)
    } else {
        FetchError::Request(reason)
    }
}

// reqwest's Display stops at the outermost error; the useful part is usually
// further down the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
