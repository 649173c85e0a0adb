//! Shared HTTP transport
//!
//! One `reqwest::Client` with a per-request timeout, wrapped in the bounded
//! retry policy. Both remote clients go through `get_json`, so neither the
//! extractor nor the resolver ever retries on its own.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::config::{HttpSettings, RetryPolicy};
use crate::error::TransportError;

/// Longest slice of an error body kept in error messages
const BODY_PREVIEW_CHARS: usize = 200;

pub struct HttpTransport {
    client: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("paysage-ror/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout: settings.timeout,
            retry: settings.retry,
        })
    }

    /// GET `url` and decode the JSON body, retrying transient failures.
    ///
    /// Header values are never logged; the Paysage key travels this way.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
    ) -> std::result::Result<T, TransportError> {
        with_retry(&self.retry, url.path(), || self.get_once(url, headers)).await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
    ) -> std::result::Result<T, TransportError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        debug!("GET {}", url.path());
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
                body: body.chars().take(BODY_PREVIEW_CHARS).collect(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url.as_str(), self.timeout, e))?;

        serde_json::from_str(&text).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: format!(
                "{}. First {} chars: {}",
                e,
                BODY_PREVIEW_CHARS,
                text.chars().take(BODY_PREVIEW_CHARS).collect::<String>()
            ),
        })
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's retry budget is spent. Retry `n` waits `policy.delay_for(n)`.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> std::result::Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, TransportError>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retry < policy.max_retries => {
                retry += 1;
                let delay = policy.delay_for(retry);
                warn!(
                    "{} failed: {}. Retry attempt {} of {} in {:?}",
                    label, err, retry, policy.max_retries, delay
                );
                sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
