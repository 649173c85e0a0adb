//! Paysage → ROR reconciliation
//!
//! Collects the French structures in Paysage that have no ROR identifier,
//! asks the ROR affiliation matcher about each of their names and writes the
//! matched and unmatched reports.
//!
//! Every option has an environment variable and a default, so the usual
//! invocation needs only the API key in `.env`:
//!
//!   XAPIKEY=... cargo run --release --bin paysage_ror
//!
//! Examples:
//!   # Quick check on the first page, no pacing
//!   cargo run --bin paysage_ror -- --page-limit 1 --request-delay-secs 0
//!
//!   # Whole category, two lookups in flight, reports under out/
//!   cargo run --release --bin paysage_ror -- \
//!     --page-limit 0 --max-concurrent 2 --output-dir out

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use paysage_ror::config::{
    HttpSettings, PaysageSettings, ReportSettings, RorSettings, DEFAULT_LOOKUP_DELAY_SECS,
    DEFAULT_MAX_RETRIES, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_TIMEOUT_SECS, PAYSAGE_API_BASE, PAYSAGE_FRANCE_CATEGORY, ROR_API_BASE,
};
use paysage_ror::{HttpReconciler, ReconcileConfig, ReportMode, RetryPolicy};

/// Reconcile Paysage structures with ROR
#[derive(Parser, Debug)]
#[command(name = "paysage_ror")]
#[command(about = "Guess ROR identifiers for Paysage structures that lack one")]
struct Args {
    /// Paysage API key, sent as X-API-KEY
    #[arg(long, env = "XAPIKEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "PAYSAGE_API_URL", default_value = PAYSAGE_API_BASE)]
    paysage_url: String,

    /// Geographical category whose structures are reconciled
    #[arg(long, env = "PAYSAGE_CATEGORY", default_value = PAYSAGE_FRANCE_CATEGORY)]
    category: String,

    #[arg(long, env = "PAYSAGE_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Maximum pages to fetch, 0 for all
    #[arg(long, env = "PAYSAGE_PAGE_LIMIT", default_value_t = DEFAULT_PAGE_LIMIT)]
    page_limit: usize,

    #[arg(long, env = "ROR_API_URL", default_value = ROR_API_BASE)]
    ror_url: String,

    /// Minimum seconds between two ROR lookups
    #[arg(long, env = "ROR_REQUEST_DELAY_SECS", default_value_t = DEFAULT_LOOKUP_DELAY_SECS)]
    request_delay_secs: u64,

    /// ROR lookups allowed in flight at once
    #[arg(long, env = "ROR_MAX_CONCURRENT", default_value_t = 1)]
    max_concurrent: usize,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "HTTP_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Base retry delay; retry n waits n times this
    #[arg(long, env = "HTTP_RETRY_DELAY_SECS", default_value_t = DEFAULT_RETRY_DELAY_SECS)]
    retry_delay_secs: u64,

    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// "retain" writes both reports, "matched-only" skips the unmatched one
    #[arg(long, env = "REPORT_MODE", default_value = "retain")]
    report_mode: ReportMode,
}

impl Args {
    fn into_config(self) -> ReconcileConfig {
        let defaults = ReconcileConfig::default();
        ReconcileConfig {
            paysage: PaysageSettings {
                base_url: self.paysage_url,
                category: self.category,
                api_key: self.api_key,
                page_size: self.page_size,
                page_limit: self.page_limit,
            },
            ror: RorSettings {
                base_url: self.ror_url,
                request_interval: Duration::from_secs(self.request_delay_secs),
                max_concurrent: self.max_concurrent,
            },
            http: HttpSettings {
                timeout: Duration::from_secs(self.timeout_secs),
                retry: RetryPolicy::new(
                    self.max_retries,
                    Duration::from_secs(self.retry_delay_secs),
                ),
            },
            report: ReportSettings {
                output_dir: self.output_dir,
                mode: self.report_mode,
                ..defaults.report
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ReconcileConfig) -> anyhow::Result<()> {
    let reconciler = HttpReconciler::from_config(&config)?;
    let summary = reconciler.run().await?;

    info!(
        "Processed {} structures ({} matched, {} unmatched) from {} records on {} pages",
        summary.processed,
        summary.matched,
        summary.unmatched,
        summary.records_seen,
        summary.pages_fetched
    );
    Ok(())
}
