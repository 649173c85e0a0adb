//! Matched / unmatched split of resolved candidates

use crate::candidate::Candidate;

#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub matched: Vec<Candidate>,
    pub unmatched: Vec<Candidate>,
}

impl ReconciliationResult {
    pub fn total(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }
}

/// Stable partition on `resolution`. Relative order is kept on both sides.
pub fn partition(candidates: Vec<Candidate>) -> ReconciliationResult {
    let (matched, unmatched) = candidates.into_iter().partition(Candidate::is_resolved);
    ReconciliationResult { matched, unmatched }
}
