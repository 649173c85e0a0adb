//! Paysage API client
//!
//! Reads the structures of one geographical category with skip/limit paging.
//! Authentication is the `X-API-KEY` header.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use super::types::{PaysageResponse, Structure};
use crate::config::PaysageSettings;
use crate::sources::StructureSource;
use crate::transport::HttpTransport;

const API_KEY_HEADER: &str = "X-API-KEY";

/// Paysage structures client
pub struct PaysageClient {
    transport: Arc<HttpTransport>,
    base_url: Url,
    category: String,
    api_key: String,
}

impl PaysageClient {
    pub fn new(transport: Arc<HttpTransport>, settings: &PaysageSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid Paysage API URL '{}'", settings.base_url))?;

        Ok(Self {
            transport,
            base_url,
            category: settings.category.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// URL of one page of the category's structures
    pub fn page_url(&self, limit: usize, skip: usize) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Paysage API URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(["geographical-categories", self.category.as_str(), "structures"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());
        Ok(url)
    }
}

#[async_trait]
impl StructureSource for PaysageClient {
    async fn fetch_page(&self, limit: usize, skip: usize) -> Result<Vec<Structure>> {
        let url = self.page_url(limit, skip)?;
        let response: PaysageResponse<Structure> = self
            .transport
            .get_json(&url, &[(API_KEY_HEADER, self.api_key.as_str())])
            .await
            .with_context(|| format!("Failed to fetch Paysage structures (skip={})", skip))?;

        Ok(response.into_items())
    }
}
