//! Name-ordered resolution
//!
//! Each candidate's name variants are tried in order against the affiliation
//! lookup. The first item the registry flags as `chosen` wins and no further
//! variant is queried. No scoring happens here.

use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::candidate::{Candidate, RorMatch};
use crate::rate_limit::RateLimiter;
use crate::ror::AffiliationItem;
use crate::sources::AffiliationLookup;

/// First chosen item carrying an organization id
pub fn chosen_match(items: &[AffiliationItem]) -> Option<RorMatch> {
    items
        .iter()
        .filter(|item| item.is_chosen())
        .find_map(|item| {
            let organization = item.organization.as_ref()?;
            let id = organization.id.as_deref().filter(|id| !id.is_empty())?;
            Some(RorMatch {
                id: id.to_string(),
                name: organization.display_name().unwrap_or_default().to_string(),
            })
        })
}

pub struct Resolver<L: ?Sized> {
    lookup: Arc<L>,
    limiter: Arc<RateLimiter>,
    max_concurrent: usize,
}

impl<L> Resolver<L>
where
    L: AffiliationLookup + ?Sized,
{
    pub fn new(lookup: Arc<L>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            lookup,
            limiter,
            max_concurrent: 1,
        }
    }

    /// Allow up to `n` candidates to be resolved at the same time
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Try each name variant in order; stop at the first chosen match.
    pub async fn resolve(&self, candidate: &Candidate) -> Result<Option<RorMatch>> {
        for name in &candidate.name_variants {
            let items = {
                let _permit = self.limiter.acquire().await?;
                self.lookup.match_affiliation(name).await?
            };
            if let Some(found) = chosen_match(&items) {
                debug!("{}: '{}' -> {}", candidate.source_id, name, found.id);
                return Ok(Some(found));
            }
            debug!("{}: no chosen match for '{}'", candidate.source_id, name);
        }
        Ok(None)
    }

    pub async fn resolve_candidate(&self, candidate: Candidate) -> Result<Candidate> {
        let resolution = self.resolve(&candidate).await?;
        Ok(candidate.with_resolution(resolution))
    }

    /// Resolve every candidate, output in input order.
    ///
    /// Up to `max_concurrent` candidates are in flight; the first lookup
    /// failure aborts the whole batch.
    pub async fn resolve_all(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let total = candidates.len();
        info!(
            "Resolving {} candidates against ROR ({} at a time, {:?} between lookups)",
            total,
            self.max_concurrent,
            self.limiter.interval()
        );

        stream::iter(candidates.into_iter().enumerate())
            .map(|(index, candidate)| async move {
                let resolved = self.resolve_candidate(candidate).await?;
                debug!(
                    "[{}/{}] {} {}",
                    index + 1,
                    total,
                    resolved.source_id,
                    resolved.resolved_id().unwrap_or("unmatched")
                );
                Ok::<_, anyhow::Error>(resolved)
            })
            .buffered(self.max_concurrent)
            .try_collect()
            .await
    }
}
