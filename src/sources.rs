//! Seams between the reconciliation core and the remote services
//!
//! The extractor reads through `StructureSource` and the resolver through
//! `AffiliationLookup`. The HTTP clients implement both for production; tests
//! drive the core with in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::paysage::Structure;
use crate::ror::AffiliationItem;

/// Paged read access to the source collection
#[async_trait]
pub trait StructureSource: Send + Sync {
    /// Fetch up to `limit` structures starting at offset `skip`.
    ///
    /// A missing collection in the response is an empty page, not an error.
    async fn fetch_page(&self, limit: usize, skip: usize) -> Result<Vec<Structure>>;
}

/// Free-text affiliation matching against the registry
#[async_trait]
pub trait AffiliationLookup: Send + Sync {
    /// Match one affiliation string and return the registry's items in its order.
    async fn match_affiliation(&self, affiliation: &str) -> Result<Vec<AffiliationItem>>;
}
