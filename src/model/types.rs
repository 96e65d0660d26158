//! Normalized entity structs shared by the catalog client and the search bar.

use serde::{Deserialize, Deserializer, Serialize};

/// One drug/brand record returned by a catalog lookup.
///
/// Field names follow the catalog API (`brand_name`, `salt_signature`, ...);
/// the Rust-side names describe what the search bar does with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "brand_name")]
    pub display_name: String,
    #[serde(rename = "manufacturer", default)]
    pub organization: Option<String>,
    #[serde(rename = "mrp_inr", default)]
    pub price_hint: Option<f64>,
    #[serde(rename = "salt_signature", default)]
    pub signature: Option<String>,
    #[serde(rename = "salts", default, deserialize_with = "salt_names")]
    pub aux_tags: Vec<String>,
}

/// `/search` sends salts as plain names, `/resolve` as `{ salt_pos, salt_name }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaltTag {
    Name(String),
    Entry { salt_name: String },
}

fn salt_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<SaltTag>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(tags
        .into_iter()
        .map(|tag| match tag {
            SaltTag::Name(name) | SaltTag::Entry { salt_name: name } => name,
        })
        .collect())
}

impl Candidate {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            organization: None,
            price_hint: None,
            signature: None,
            aux_tags: Vec::new(),
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_price_hint(mut self, price: f64) -> Self {
        self.price_hint = Some(price);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aux_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Signature usable for direct navigation; blank strings count as absent.
    pub fn usable_signature(&self) -> Option<&str> {
        self.signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// `GET /search` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub hits: Vec<Candidate>,
}

/// `GET /resolve` answers with `{ "matches": [...] }`, a bare array, or
/// `{ "items": [...] }` depending on the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    List(Vec<Candidate>),
    Matches { matches: Vec<Candidate> },
    Wrapped { items: Vec<Candidate> },
}

impl ResolveResponse {
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            ResolveResponse::List(items)
            | ResolveResponse::Matches { matches: items }
            | ResolveResponse::Wrapped { items } => items,
        }
    }
}
