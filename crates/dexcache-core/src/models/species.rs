//! Species metadata: flavor text and genus, tagged by language.

use serde::{Deserialize, Serialize};

use super::NamedResource;
use crate::utils::clean_flavor_text;

/// Language used when picking flavor text and genus.
pub const DISPLAY_LANGUAGE: &str = "en";

/// Placeholder shown when the genus is unknown.
const NO_GENUS: &str = "—";

const NO_FLAVOR_TEXT: &str = "No flavor text available.";

const NO_SPECIES_INFO: &str = "No species/flavor info available.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesInfo {
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub genera: Vec<GenusEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenusEntry {
    pub genus: String,
    pub language: NamedResource,
}

impl SpeciesInfo {
    /// First flavor text in `language`, with control line breaks flattened.
    pub fn flavor_text(&self, language: &str) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|e| e.language.name == language)
            .map(|e| clean_flavor_text(&e.flavor_text))
    }

    pub fn genus(&self, language: &str) -> Option<&str> {
        self.genera
            .iter()
            .find(|g| g.language.name == language)
            .map(|g| g.genus.as_str())
            .filter(|g| !g.is_empty())
    }
}

/// Display-ready description of a species. Never an error: resolution
/// failures degrade to `SpeciesSummary::unavailable()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesSummary {
    Described { genus: String, flavor_text: String },
    Unavailable,
}

impl SpeciesSummary {
    pub fn from_species(info: &SpeciesInfo) -> Self {
        SpeciesSummary::Described {
            genus: info.genus(DISPLAY_LANGUAGE).unwrap_or(NO_GENUS).to_string(),
            flavor_text: info
                .flavor_text(DISPLAY_LANGUAGE)
                .unwrap_or_else(|| NO_FLAVOR_TEXT.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        SpeciesSummary::Unavailable
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SpeciesSummary::Described { .. })
    }

    /// Single-block text for display.
    pub fn display_text(&self) -> String {
        match self {
            SpeciesSummary::Described { genus, flavor_text } => {
                format!("Genus: {}\n\n{}", genus, flavor_text)
            }
            SpeciesSummary::Unavailable => NO_SPECIES_INFO.to_string(),
        }
    }
}
