//! Reconciliation candidates
//!
//! A candidate is a Paysage structure without a ROR identifier, reduced to
//! what the resolver and the reports need.

use crate::paysage::Structure;

const PAYSAGE_STRUCTURE_URL_PREFIX: &str =
    "https://paysage.enseignementsup-recherche.gouv.fr/structures/";

/// Public presentation page of a structure
pub fn structure_url(id: &str) -> String {
    format!("{}{}/presentation", PAYSAGE_STRUCTURE_URL_PREFIX, id)
}

/// Drop blank names and repeats, keeping first-seen order
pub fn dedupe_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    for name in names {
        if name.trim().is_empty() || variants.iter().any(|seen| seen == name) {
            continue;
        }
        variants.push(name.to_string());
    }
    variants
}

/// The registry's chosen organization for a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RorMatch {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source_id: String,
    pub source_url: String,
    pub name_variants: Vec<String>,
    pub resolution: Option<RorMatch>,
}

impl Candidate {
    pub fn new<'a>(source_id: impl Into<String>, names: impl IntoIterator<Item = &'a str>) -> Self {
        let source_id = source_id.into();
        Self {
            source_url: structure_url(&source_id),
            source_id,
            name_variants: dedupe_names(names),
            resolution: None,
        }
    }

    /// `None` for structures already linked to ROR or without an id
    pub fn from_structure(structure: &Structure) -> Option<Self> {
        if structure.has_ror() {
            return None;
        }
        let id = structure.id.as_deref().filter(|id| !id.trim().is_empty())?;
        Some(Self::new(id, structure.raw_names()))
    }

    /// Record the resolver's outcome. Only the first resolution sticks.
    pub fn with_resolution(mut self, resolution: Option<RorMatch>) -> Self {
        if self.resolution.is_none() {
            self.resolution = resolution;
        }
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn resolved_id(&self) -> Option<&str> {
        self.resolution.as_ref().map(|m| m.id.as_str())
    }

    pub fn resolved_name(&self) -> Option<&str> {
        self.resolution.as_ref().map(|m| m.name.as_str())
    }
}
