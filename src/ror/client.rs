//! ROR API client
//!
//! Queries the affiliation matching endpoint. Pacing is not handled here;
//! callers hold a `RateLimiter` permit around each lookup.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use super::types::{AffiliationItem, AffiliationResponse};
use crate::config::RorSettings;
use crate::sources::AffiliationLookup;
use crate::transport::HttpTransport;

pub struct RorClient {
    transport: Arc<HttpTransport>,
    base_url: Url,
}

impl RorClient {
    pub fn new(transport: Arc<HttpTransport>, settings: &RorSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid ROR API URL '{}'", settings.base_url))?;

        Ok(Self {
            transport,
            base_url,
        })
    }

    /// `{base}/organizations?affiliation=<form-encoded name>`
    pub fn affiliation_url(&self, affiliation: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("ROR API URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push("organizations");
        url.query_pairs_mut().append_pair("affiliation", affiliation);
        Ok(url)
    }
}

#[async_trait]
impl AffiliationLookup for RorClient {
    async fn match_affiliation(&self, affiliation: &str) -> Result<Vec<AffiliationItem>> {
        let url = self.affiliation_url(affiliation)?;
        let response: AffiliationResponse = self
            .transport
            .get_json(&url, &[("Accept", "application/json")])
            .await
            .with_context(|| format!("Failed to match affiliation '{}'", affiliation))?;

        Ok(response.into_items())
    }
}
