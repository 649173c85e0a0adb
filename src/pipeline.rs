//! Reconciliation run
//!
//! ```text
//! Paysage pages ──► extract ──► candidates
//!                                  │
//!                                  ▼
//!                   resolve (name variants in order, paced)
//!                                  │
//!                                  ▼
//!                   partition ──► matched.csv / unmatched.csv
//! ```
//!
//! Stages run strictly one after the other. A failure in any stage aborts the
//! run before either report is written.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{ReconcileConfig, ReportMode, ReportSettings};
use crate::extract::{extract, Extraction, PageSettings};
use crate::partition::{partition, ReconciliationResult};
use crate::paysage::PaysageClient;
use crate::rate_limit::RateLimiter;
use crate::report::{write_matched, write_unmatched};
use crate::resolve::Resolver;
use crate::ror::RorClient;
use crate::sources::{AffiliationLookup, StructureSource};
use crate::transport::HttpTransport;

/// Counters and output locations of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub pages_fetched: usize,
    pub records_seen: usize,
    pub already_linked: usize,
    pub skipped_without_id: usize,
    pub processed: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub matched_report: Option<PathBuf>,
    pub unmatched_report: Option<PathBuf>,
}

pub struct Reconciler<S: ?Sized, L: ?Sized> {
    source: Arc<S>,
    resolver: Resolver<L>,
    pages: PageSettings,
    report: ReportSettings,
}

/// The production wiring: HTTP clients for both services sharing one transport
pub type HttpReconciler = Reconciler<PaysageClient, RorClient>;

impl HttpReconciler {
    pub fn from_config(config: &ReconcileConfig) -> Result<Self> {
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(&config.http)?);
        let source = Arc::new(PaysageClient::new(Arc::clone(&transport), &config.paysage)?);
        let lookup = Arc::new(RorClient::new(transport, &config.ror)?);
        let limiter = Arc::new(RateLimiter::from_settings(&config.ror));

        Ok(Self::new(source, lookup, limiter, config))
    }
}

impl<S, L> Reconciler<S, L>
where
    S: StructureSource + ?Sized,
    L: AffiliationLookup + ?Sized,
{
    pub fn new(
        source: Arc<S>,
        lookup: Arc<L>,
        limiter: Arc<RateLimiter>,
        config: &ReconcileConfig,
    ) -> Self {
        Self {
            source,
            resolver: Resolver::new(lookup, limiter).with_max_concurrent(config.ror.max_concurrent),
            pages: PageSettings::from(&config.paysage),
            report: config.report.clone(),
        }
    }

    /// Extract, resolve and partition without writing anything
    pub async fn reconcile(&self) -> Result<(Extraction, ReconciliationResult)> {
        info!("01 _ Collect structures from Paysage");
        let mut extraction = extract(self.source.as_ref(), self.pages)
            .await
            .context("Paysage extraction failed")?;

        info!("02 _ For structures, guess ROR from the ROR affiliation API");
        let candidates = std::mem::take(&mut extraction.candidates);
        let resolved = self
            .resolver
            .resolve_all(candidates)
            .await
            .context("ROR resolution failed")?;

        let result = partition(resolved);
        info!(
            "{} candidates processed: {} matched, {} unmatched",
            result.total(),
            result.matched.len(),
            result.unmatched.len()
        );

        Ok((extraction, result))
    }

    /// Full run: reconcile, then write the reports selected by the report mode
    pub async fn run(&self) -> Result<RunSummary> {
        let (extraction, result) = self.reconcile().await?;

        info!("03 _ Write results in CSV");
        let mut summary = RunSummary {
            pages_fetched: extraction.pages_fetched,
            records_seen: extraction.records_seen,
            already_linked: extraction.already_linked,
            skipped_without_id: extraction.skipped_without_id,
            processed: result.total(),
            matched: result.matched.len(),
            unmatched: result.unmatched.len(),
            ..Default::default()
        };

        let matched_path = self.report.matched_path();
        write_matched(&matched_path, &result.matched)?;
        summary.matched_report = Some(matched_path);

        match self.report.mode {
            ReportMode::Retain => {
                let unmatched_path = self.report.unmatched_path();
                write_unmatched(&unmatched_path, &result.unmatched)?;
                summary.unmatched_report = Some(unmatched_path);
            }
            ReportMode::MatchedOnly => {
                info!(
                    "Report mode {}: {} unmatched candidates not written",
                    self.report.mode,
                    result.unmatched.len()
                );
            }
        }

        info!("Done !");
        Ok(summary)
    }
}
