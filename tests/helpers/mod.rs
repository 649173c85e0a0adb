//! In-memory stand-ins for the Paysage and ROR services

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use paysage_ror::paysage::{CurrentName, Structure, StructureIdentifier};
use paysage_ror::ror::{AffiliationItem, Organization};
use paysage_ror::{AffiliationLookup, StructureSource};

/// Serves a fixed collection with skip/limit semantics
pub struct InMemoryPaysage {
    structures: Vec<Structure>,
    fail_at_skip: Option<usize>,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl InMemoryPaysage {
    pub fn new(structures: Vec<Structure>) -> Self {
        Self {
            structures,
            fail_at_skip: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Simulate retries exhausted on the page starting at `skip`
    pub fn failing_at(mut self, skip: usize) -> Self {
        self.fail_at_skip = Some(skip);
        self
    }

    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructureSource for InMemoryPaysage {
    async fn fetch_page(&self, limit: usize, skip: usize) -> Result<Vec<Structure>> {
        self.requests.lock().unwrap().push((limit, skip));
        if self.fail_at_skip == Some(skip) {
            anyhow::bail!("Paysage API error 503 at skip={}", skip);
        }
        Ok(self
            .structures
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Answers affiliation queries from a table; unknown names get no items
#[derive(Default)]
pub struct InMemoryRor {
    answers: HashMap<String, Vec<AffiliationItem>>,
    queries: Mutex<Vec<String>>,
}

impl InMemoryRor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chosen(mut self, affiliation: &str, ror_id: &str, ror_name: &str) -> Self {
        self.answers
            .insert(affiliation.to_string(), vec![item(true, ror_id, ror_name)]);
        self
    }

    pub fn not_chosen(mut self, affiliation: &str, ror_id: &str, ror_name: &str) -> Self {
        self.answers
            .insert(affiliation.to_string(), vec![item(false, ror_id, ror_name)]);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AffiliationLookup for InMemoryRor {
    async fn match_affiliation(&self, affiliation: &str) -> Result<Vec<AffiliationItem>> {
        self.queries.lock().unwrap().push(affiliation.to_string());
        Ok(self.answers.get(affiliation).cloned().unwrap_or_default())
    }
}

pub fn item(chosen: bool, ror_id: &str, ror_name: &str) -> AffiliationItem {
    AffiliationItem {
        chosen: Some(chosen),
        score: Some(if chosen { 1.0 } else { 0.5 }),
        matching_type: Some("PHRASE".to_string()),
        substring: None,
        organization: Some(Organization {
            id: Some(ror_id.to_string()),
            name: Some(ror_name.to_string()),
            names: None,
        }),
    }
}

pub fn structure(id: &str, display: &str, official: Option<&str>, usual: Option<&str>) -> Structure {
    Structure {
        id: Some(id.to_string()),
        identifiers: Some(vec![StructureIdentifier {
            kind: Some("siret".to_string()),
            value: Some(format!("siret-{}", id)),
        }]),
        display_name: Some(display.to_string()),
        current_name: Some(CurrentName {
            official_name: official.map(String::from),
            usual_name: usual.map(String::from),
        }),
    }
}

pub fn linked_structure(id: &str, display: &str, ror: &str) -> Structure {
    let mut linked = structure(id, display, None, None);
    linked
        .identifiers
        .get_or_insert_with(Vec::new)
        .push(StructureIdentifier {
            kind: Some("ror".to_string()),
            value: Some(ror.to_string()),
        });
    linked
}
