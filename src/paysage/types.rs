//! Paysage API response types
//!
//! Only the fields reconciliation reads. Every field is optional on the wire;
//! absent values deserialize to `None` or an empty collection.
//!
//! Reference: https://api.paysage.dataesr.ovh/docs

use serde::{Deserialize, Serialize};

/// Identifier kind carried by structures already linked to ROR
pub const ROR_IDENTIFIER_TYPE: &str = "ror";

/// Paged collection wrapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaysageResponse<T> {
    #[serde(default)]
    pub data: Option<Vec<T>>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

impl<T> PaysageResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// A research structure as returned by the structures endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Structure {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub identifiers: Option<Vec<StructureIdentifier>>,

    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "currentName", default)]
    pub current_name: Option<CurrentName>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StructureIdentifier {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CurrentName {
    #[serde(rename = "officialName", default)]
    pub official_name: Option<String>,
    #[serde(rename = "usualName", default)]
    pub usual_name: Option<String>,
}

impl Structure {
    /// True if any identifier is of kind "ror"
    pub fn has_ror(&self) -> bool {
        self.identifiers
            .iter()
            .flatten()
            .any(|identifier| identifier.kind.as_deref() == Some(ROR_IDENTIFIER_TYPE))
    }

    /// Display, official and usual names in that order, absent ones omitted
    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        let official = self
            .current_name
            .as_ref()
            .and_then(|name| name.official_name.as_deref());
        let usual = self
            .current_name
            .as_ref()
            .and_then(|name| name.usual_name.as_deref());

        [self.display_name.as_deref(), official, usual]
            .into_iter()
            .flatten()
    }
}
