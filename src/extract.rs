//! Paginated extraction
//!
//! Walks the source collection page by page and keeps every structure that
//! is not yet linked to ROR. Paging stops at the first short page or at the
//! configured page ceiling, whichever comes first.

use anyhow::Result;
use tracing::{info, warn};

use crate::candidate::Candidate;
use crate::config::PaysageSettings;
use crate::sources::StructureSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub page_size: usize,
    /// 0 for no ceiling
    pub page_limit: usize,
}

impl PageSettings {
    pub fn new(page_size: usize, page_limit: usize) -> Self {
        Self {
            page_size,
            page_limit,
        }
    }

    fn allows_page(&self, page: usize) -> bool {
        self.page_limit == 0 || page <= self.page_limit
    }
}

impl From<&PaysageSettings> for PageSettings {
    fn from(settings: &PaysageSettings) -> Self {
        Self::new(settings.page_size, settings.page_limit)
    }
}

/// Candidates in source order plus extraction counters
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub candidates: Vec<Candidate>,
    pub pages_fetched: usize,
    pub records_seen: usize,
    pub already_linked: usize,
    pub skipped_without_id: usize,
}

pub async fn extract<S>(source: &S, settings: PageSettings) -> Result<Extraction>
where
    S: StructureSource + ?Sized,
{
    anyhow::ensure!(settings.page_size > 0, "Page size must be at least 1");

    let mut extraction = Extraction::default();
    let mut page = 1;

    while settings.allows_page(page) {
        let skip = (page - 1) * settings.page_size;
        info!("Page {} of Paysage (skip={})", page, skip);

        let structures = source.fetch_page(settings.page_size, skip).await?;
        extraction.pages_fetched += 1;
        extraction.records_seen += structures.len();

        for structure in &structures {
            if structure.has_ror() {
                extraction.already_linked += 1;
                continue;
            }
            match Candidate::from_structure(structure) {
                Some(candidate) => extraction.candidates.push(candidate),
                None => {
                    extraction.skipped_without_id += 1;
                    warn!(
                        "Skipping structure without id (display name: {:?})",
                        structure.display_name
                    );
                }
            }
        }

        if structures.len() != settings.page_size {
            break;
        }
        page += 1;
    }

    info!(
        "Extracted {} candidates from {} records over {} pages ({} already linked to ROR)",
        extraction.candidates.len(),
        extraction.records_seen,
        extraction.pages_fetched,
        extraction.already_linked
    );

    Ok(extraction)
}
