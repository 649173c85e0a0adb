//! Run configuration
//!
//! Plain structs with defaults matching the production pace of the two
//! services. The binary fills them from environment-backed arguments.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};

pub const PAYSAGE_API_BASE: &str = "https://api.paysage.dataesr.ovh";
/// Geographical category "France"
pub const PAYSAGE_FRANCE_CATEGORY: &str = "4d6le";
pub const ROR_API_BASE: &str = "https://api.ror.org";

pub const DEFAULT_PAGE_SIZE: usize = 200;
pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const DEFAULT_LOOKUP_DELAY_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 180;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub paysage: PaysageSettings,
    pub ror: RorSettings,
    pub http: HttpSettings,
    pub report: ReportSettings,
}

/// Source collection access and paging
#[derive(Debug, Clone)]
pub struct PaysageSettings {
    pub base_url: String,
    pub category: String,
    pub api_key: String,
    pub page_size: usize,
    /// Maximum number of pages to request, 0 for no ceiling
    pub page_limit: usize,
}

/// Affiliation lookup pacing
#[derive(Debug, Clone)]
pub struct RorSettings {
    pub base_url: String,
    /// Minimum spacing between the start of two lookups
    pub request_interval: Duration,
    pub max_concurrent: usize,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Bounded retry with linearly increasing delay: attempt `n` waits `n * base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub matched_file: String,
    pub unmatched_file: String,
    pub mode: ReportMode,
}

impl ReportSettings {
    pub fn matched_path(&self) -> PathBuf {
        self.output_dir.join(&self.matched_file)
    }

    pub fn unmatched_path(&self) -> PathBuf {
        self.output_dir.join(&self.unmatched_file)
    }
}

/// Which reports a run emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Matched and unmatched reports
    #[default]
    Retain,
    /// Only the matched report; unresolved candidates are dropped from output
    MatchedOnly,
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" | "all" => Ok(Self::Retain),
            "matched-only" | "matched_only" | "drop-unmatched" => Ok(Self::MatchedOnly),
            other => Err(format!(
                "Unknown report mode '{}', expected 'retain' or 'matched-only'",
                other
            )),
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::MatchedOnly => write!(f, "matched-only"),
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            paysage: PaysageSettings {
                base_url: PAYSAGE_API_BASE.to_string(),
                category: PAYSAGE_FRANCE_CATEGORY.to_string(),
                api_key: String::new(),
                page_size: DEFAULT_PAGE_SIZE,
                page_limit: DEFAULT_PAGE_LIMIT,
            },
            ror: RorSettings {
                base_url: ROR_API_BASE.to_string(),
                request_interval: Duration::from_secs(DEFAULT_LOOKUP_DELAY_SECS),
                max_concurrent: 1,
            },
            http: HttpSettings {
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                retry: RetryPolicy::default(),
            },
            report: ReportSettings {
                output_dir: PathBuf::from("."),
                matched_file: "paysage_ror_matched.csv".to_string(),
                unmatched_file: "paysage_ror_unmatched.csv".to_string(),
                mode: ReportMode::Retain,
            },
        }
    }
}

impl ReconcileConfig {
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.report.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Reject settings that would make the run loop forever or never start
    pub fn validate(&self) -> Result<()> {
        if self.paysage.api_key.trim().is_empty() {
            bail!("Paysage API key is empty (set XAPIKEY)");
        }
        if self.paysage.page_size == 0 {
            bail!("Paysage page size must be at least 1");
        }
        if self.ror.max_concurrent == 0 {
            bail!("ROR max concurrent lookups must be at least 1");
        }
        if self.http.timeout.is_zero() {
            bail!("HTTP timeout must be greater than zero");
        }
        if self.report.matched_file.trim().is_empty() {
            bail!("Matched report file name is empty");
        }
        if self.report.mode == ReportMode::Retain && self.report.unmatched_file.trim().is_empty()
        {
            bail!("Unmatched report file name is empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> ReconcileConfig {
        let mut config = ReconcileConfig::default();
        config.paysage.api_key = "key".to_string();
        config
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = keyed();
        assert!(config.validate().is_ok());
        assert_eq!(config.paysage.page_size, 200);
        assert_eq!(config.paysage.page_limit, 10);
        assert_eq!(config.ror.max_concurrent, 1);
        assert_eq!(config.report.mode, ReportMode::Retain);
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let mut config = keyed();
        config.paysage.api_key = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("API key"));
        assert!(ReconcileConfig::default().validate().is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = keyed();
        config.paysage.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = keyed();
        config.ror.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_grows_linearly() {
        let policy = RetryPolicy::new(5, Duration::from_secs(3));
        assert_eq!(policy.delay_for(1), Duration::from_secs(3));
        assert_eq!(policy.delay_for(2), Duration::from_secs(6));
        assert_eq!(policy.delay_for(5), Duration::from_secs(15));
    }

    #[test]
    fn test_report_mode_parse() {
        assert_eq!("retain".parse::<ReportMode>(), Ok(ReportMode::Retain));
        assert_eq!(
            "Matched-Only".parse::<ReportMode>(),
            Ok(ReportMode::MatchedOnly)
        );
        assert!("everything".parse::<ReportMode>().is_err());
        assert_eq!(ReportMode::MatchedOnly.to_string(), "matched-only");
    }

    #[test]
    fn test_report_paths_join_output_dir() {
        let config = ReconcileConfig::default().with_output_dir("/tmp/out");
        assert_eq!(
            config.report.matched_path(),
            PathBuf::from("/tmp/out/paysage_ror_matched.csv")
        );
        assert_eq!(
            config.report.unmatched_path(),
            PathBuf::from("/tmp/out/paysage_ror_unmatched.csv")
        );
    }
}
