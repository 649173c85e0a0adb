//! `paysage-ror` — reconcile Paysage structures with ROR identifiers.
//!
//! Structures without a ROR identifier are extracted page by page, each of
//! their names is submitted in turn to the ROR affiliation matcher, and the
//! registry's `chosen` item is taken as the match. Results are split into a
//! matched and an unmatched CSV report.

pub mod candidate;
pub mod config;
pub mod error;
pub mod extract;
pub mod partition;
pub mod paysage;
pub mod pipeline;
pub mod rate_limit;
pub mod report;
pub mod resolve;
pub mod ror;
pub mod sources;
pub mod transport;

pub use candidate::{Candidate, RorMatch};
pub use config::{ReconcileConfig, ReportMode, RetryPolicy};
pub use error::TransportError;
pub use extract::{extract, Extraction, PageSettings};
pub use partition::{partition, ReconciliationResult};
pub use pipeline::{HttpReconciler, Reconciler, RunSummary};
pub use rate_limit::RateLimiter;
pub use resolve::Resolver;
pub use sources::{AffiliationLookup, StructureSource};
