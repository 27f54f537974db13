//! Type (category) membership and the full name listing.

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// Response of the category endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeResponse {
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedResource,
}

/// Response of the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NameListingResponse {
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

impl NameListingResponse {
    pub fn into_names(self) -> Vec<String> {
        self.results.into_iter().map(|r| r.name).collect()
    }
}

/// A named group of records sharing a trait, with its ordered member names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub name: String,
    pub members: Vec<String>,
}

impl CategoryListing {
    pub fn from_response(name: &str, response: TypeResponse) -> Self {
        Self {
            name: name.to_string(),
            members: response
                .pokemon
                .into_iter()
                .map(|m| m.pokemon.name)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
