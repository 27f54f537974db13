//! The creature record as returned by the record endpoint.

use serde::{Deserialize, Serialize};

/// Highest base stat value the stat bar is scaled against.
pub const MAX_BASE_STAT: u32 = 255;

/// Number of moves shown on a card.
pub const DISPLAYED_MOVES: usize = 8;

/// A `{name, url}` reference as used throughout the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

impl AbilitySlot {
    /// Ability name, marked when it is a hidden ability.
    pub fn label(&self) -> String {
        if self.is_hidden {
            format!("{} (hidden)", self.ability.name)
        } else {
            self.ability.name.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEntry {
    pub stat: NamedResource,
    pub base_stat: u32,
}

impl StatEntry {
    /// Fill fraction of the stat bar in `[0.0, 1.0]`.
    pub fn bar_fraction(&self) -> f64 {
        f64::from(self.base_stat.min(MAX_BASE_STAT)) / f64::from(MAX_BASE_STAT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
}

impl Pokemon {
    /// Preferred image: official artwork, then the default front sprite.
    pub fn image_url(&self) -> Option<&str> {
        let artwork = self
            .sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .filter(|url| !url.is_empty());

        artwork.or_else(|| {
            self.sprites
                .front_default
                .as_deref()
                .filter(|url| !url.is_empty())
        })
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.as_str()).collect()
    }

    pub fn ability_labels(&self) -> Vec<String> {
        self.abilities.iter().map(AbilitySlot::label).collect()
    }

    /// The moves shown on a card, in API order.
    pub fn displayed_moves(&self) -> impl Iterator<Item = &str> {
        self.moves
            .iter()
            .take(DISPLAYED_MOVES)
            .map(|m| m.move_ref.name.as_str())
    }
}
