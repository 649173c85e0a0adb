//! ROR affiliation matching response types
//!
//! Reference: https://api.ror.org/organizations?affiliation=

use serde::{Deserialize, Serialize};

/// URL prefix of every ROR identifier
pub const ROR_ID_PREFIX: &str = "https://ror.org/";

/// Top-level affiliation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliationResponse {
    #[serde(default)]
    pub number_of_results: Option<u64>,
    #[serde(default)]
    pub items: Option<Vec<AffiliationItem>>,
}

impl AffiliationResponse {
    pub fn into_items(self) -> Vec<AffiliationItem> {
        self.items.unwrap_or_default()
    }
}

/// One candidate organization for the queried affiliation
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AffiliationItem {
    /// Set by the registry on its single best candidate
    #[serde(default)]
    pub chosen: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub matching_type: Option<String>,
    #[serde(default)]
    pub substring: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,
    /// v1 schema
    #[serde(default)]
    pub name: Option<String>,
    /// v2 schema
    #[serde(default)]
    pub names: Option<Vec<OrganizationName>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrganizationName {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub lang: Option<String>,
}

impl AffiliationItem {
    pub fn is_chosen(&self) -> bool {
        self.chosen.unwrap_or(false)
    }
}

impl Organization {
    /// The v1 `name`, or the v2 name typed `ror_display`
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| {
            self.names
                .iter()
                .flatten()
                .find(|name| name.types.iter().flatten().any(|t| t == "ror_display"))
                .and_then(|name| name.value.as_deref())
        })
    }
}

/// Local part of a ROR id: `https://ror.org/05dxjsc12` -> `05dxjsc12`.
///
/// Ids without the prefix are returned unchanged.
pub fn bare_ror_id(id: &str) -> &str {
    id.strip_prefix(ROR_ID_PREFIX).unwrap_or(id)
}
