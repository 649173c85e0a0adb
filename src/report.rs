//! CSV reports
//!
//! Two fixed schemas: matched candidates in the shape of a Paysage identifier
//! import, and unmatched candidates for manual review. Each file is written
//! to a temporary sibling and renamed into place once complete.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::candidate::Candidate;
use crate::paysage::ROR_IDENTIFIER_TYPE;
use crate::ror::bare_ror_id;

/// Value of the `active` column for freshly proposed identifiers
pub const ACTIVE_SENTINEL: &str = "active";
/// Separator between name variants in the `paysageNames` column
pub const NAME_SEPARATOR: &str = ",";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MatchedRow<'a> {
    #[serde(rename = "paysageId")]
    pub paysage_id: &'a str,
    #[serde(rename = "paysageUrl")]
    pub paysage_url: &'a str,
    #[serde(rename = "paysageNames")]
    pub paysage_names: String,
    pub ror: &'a str,
    #[serde(rename = "rorName")]
    pub ror_name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: &'a str,
    #[serde(rename = "startDate")]
    pub start_date: &'static str,
    #[serde(rename = "endDate")]
    pub end_date: &'static str,
    pub active: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UnmatchedRow<'a> {
    #[serde(rename = "paysageId")]
    pub paysage_id: &'a str,
    #[serde(rename = "paysageUrl")]
    pub paysage_url: &'a str,
    #[serde(rename = "paysageNames")]
    pub paysage_names: String,
}

pub const MATCHED_HEADERS: [&str; 10] = [
    "paysageId",
    "paysageUrl",
    "paysageNames",
    "ror",
    "rorName",
    "type",
    "value",
    "startDate",
    "endDate",
    "active",
];

pub const UNMATCHED_HEADERS: [&str; 3] = ["paysageId", "paysageUrl", "paysageNames"];

fn joined_names(candidate: &Candidate) -> String {
    candidate.name_variants.join(NAME_SEPARATOR)
}

impl<'a> MatchedRow<'a> {
    /// `None` for a candidate without a resolution
    pub fn from_candidate(candidate: &'a Candidate) -> Option<Self> {
        let resolution = candidate.resolution.as_ref()?;
        Some(Self {
            paysage_id: &candidate.source_id,
            paysage_url: &candidate.source_url,
            paysage_names: joined_names(candidate),
            ror: &resolution.id,
            ror_name: &resolution.name,
            kind: ROR_IDENTIFIER_TYPE,
            value: bare_ror_id(&resolution.id),
            start_date: "",
            end_date: "",
            active: ACTIVE_SENTINEL,
        })
    }
}

impl<'a> UnmatchedRow<'a> {
    pub fn from_candidate(candidate: &'a Candidate) -> Self {
        Self {
            paysage_id: &candidate.source_id,
            paysage_url: &candidate.source_url,
            paysage_names: joined_names(candidate),
        }
    }
}

/// Write the matched report. Candidates without a resolution are skipped.
pub fn write_matched(path: &Path, candidates: &[Candidate]) -> Result<usize> {
    let rows: Vec<_> = candidates
        .iter()
        .filter_map(MatchedRow::from_candidate)
        .collect();
    write_atomically(path, &MATCHED_HEADERS, &rows)?;
    info!("Wrote {} matched rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

pub fn write_unmatched(path: &Path, candidates: &[Candidate]) -> Result<usize> {
    let rows: Vec<_> = candidates.iter().map(UnmatchedRow::from_candidate).collect();
    write_atomically(path, &UNMATCHED_HEADERS, &rows)?;
    info!("Wrote {} unmatched rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Header row is written explicitly so an empty report still has one.
fn write_atomically<R: Serialize>(path: &Path, headers: &[&str], rows: &[R]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(temp.as_file()));
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("Failed to move report into place at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::RorMatch;

    fn matched(id: &str, ror: &str) -> Candidate {
        Candidate::new(id, ["Université A", "UA"]).with_resolution(Some(RorMatch {
            id: ror.to_string(),
            name: "University A".to_string(),
        }))
    }

    #[test]
    fn test_bare_identifier_column() {
        let candidate = matched("s1", "https://ror.org/05dxjsc12");
        let row = MatchedRow::from_candidate(&candidate).unwrap();
        assert_eq!(row.value, "05dxjsc12");
        assert_eq!(row.ror, "https://ror.org/05dxjsc12");
        assert_eq!(row.kind, "ror");
        assert_eq!(row.active, "active");
        assert_eq!(row.start_date, "");
        assert_eq!(row.paysage_names, "Université A,UA");
    }

    #[test]
    fn test_unresolved_candidate_has_no_matched_row() {
        let candidate = Candidate::new("s2", ["B"]);
        assert!(MatchedRow::from_candidate(&candidate).is_none());
    }

    #[test]
    fn test_matched_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matched.csv");

        let written = write_matched(
            &path,
            &[matched("s1", "https://ror.org/05dxjsc12"), Candidate::new("s2", ["B"])],
        )
        .unwrap();
        assert_eq!(written, 1);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "paysageId,paysageUrl,paysageNames,ror,rorName,type,value,startDate,endDate,active"
        );
        assert_eq!(
            lines[1],
            "s1,https://paysage.enseignementsup-recherche.gouv.fr/structures/s1/presentation,\"Université A,UA\",https://ror.org/05dxjsc12,University A,ror,05dxjsc12,,,active"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_unmatched_report_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("unmatched.csv");

        write_unmatched(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "paysageId,paysageUrl,paysageNames");
    }

    #[test]
    fn test_rewrite_replaces_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unmatched.csv");
        fs::write(&path, "stale").unwrap();

        write_unmatched(&path, &[Candidate::new("s9", ["Nine"])]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("s9"));
        // only the report is left behind, no temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
